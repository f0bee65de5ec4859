use std::{collections::BTreeMap, time::SystemTime};

use crate::logging::{EventSpan, LogEvent};
use tracing::{info, Level};
use tracing_subscriber::Layer;

/// Gathers the `LogEvent`s emitted inside INFO-level spans into an
/// `EventSpan` tree and logs the tree with its latency once the top-level
/// span closes.
#[derive(Default)]
pub struct TrackerLogsLayer;

impl<S> Layer<S> for TrackerLogsLayer
where
    S: tracing::Subscriber,
    S: for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        _attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if *span.metadata().level() > Level::INFO {
            return;
        }

        let mut extensions = span.extensions_mut();
        extensions.insert(EventSpan::new(span.name()));
        extensions.insert(StartTime(SystemTime::now()));
    }

    fn on_close(&self, id: tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };

        let mut extensions = span.extensions_mut();
        let Some(mut event_span) = extensions.remove::<EventSpan>() else {
            return;
        };
        event_span.latency = match extensions.remove::<StartTime>() {
            Some(start) => SystemTime::now()
                .duration_since(start.0)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
            None => 0,
        };
        drop(extensions);

        match span.scope().nth(1) {
            Some(parent) => {
                let mut extensions = parent.extensions_mut();
                if let Some(parent_event_span) = extensions.get_mut::<EventSpan>() {
                    parent_event_span.children.push(event_span);
                }
            }
            None => {
                if !(event_span.children.is_empty() && event_span.events.is_empty()) {
                    info!(
                        "'{}' log entry ==> {}",
                        span.name(),
                        serde_json::to_string(&event_span).unwrap_or_default(),
                    )
                }
            }
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let Some(scope) = ctx.event_scope(event) else {
            return;
        };
        // Events land on the innermost span that is collecting.
        for span in scope {
            let mut extensions = span.extensions_mut();
            if let Some(event_span) = extensions.get_mut::<EventSpan>() {
                let collector = FieldCollector::new(event);
                if let Some(encoded) = collector.fields.get("event") {
                    if let Ok(log) = serde_json::from_str::<LogEvent>(encoded) {
                        event_span.events.push(log);
                    }
                }
                return;
            }
        }
    }
}

struct StartTime(SystemTime);

#[derive(Default)]
struct FieldCollector {
    fields: BTreeMap<&'static str, String>,
}

impl FieldCollector {
    fn new(event: &tracing::Event<'_>) -> Self {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);
        collector
    }
}

impl tracing::field::Visit for FieldCollector {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.insert(field.name(), value.to_owned());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.fields.insert(field.name(), format!("{:?}", value));
    }
}
