use serde::{Deserialize, Serialize};
use valuable::Valuable;

use super::LogEvent;

/// Collects the structured events emitted while a span was open.
#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct EventSpan {
    pub name: String,

    #[serde(default)]
    pub latency: u64,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LogEvent>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<EventSpan>,
}

impl EventSpan {
    pub fn new(name: &str) -> Self {
        EventSpan {
            name: name.to_owned(),
            ..Default::default()
        }
    }
}
