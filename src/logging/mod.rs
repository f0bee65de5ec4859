mod event_span;
mod events;
mod log_event;
mod logs_layer;

pub use event_span::EventSpan;
pub use events::*;
pub use log_event::*;
pub use logs_layer::TrackerLogsLayer;
