use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{log_event, logging::LogEvent};

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub struct StoreEvent {
    op: Op,
    doc: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub enum Op {
    Read,
    ReadDefault,
    Write,
}

impl StoreEvent {
    pub fn read(doc: &str) {
        Self::log(Op::Read, doc, None);
    }

    /// The document was missing or unreadable and its default was used.
    pub fn read_default(doc: &str, error: Option<String>) {
        Self::log(Op::ReadDefault, doc, error);
    }

    pub fn write(doc: &str, error: Option<String>) {
        Self::log(Op::Write, doc, error);
    }

    fn log(op: Op, doc: &str, error: Option<String>) {
        log_event!(LogEvent::Store(StoreEvent {
            op,
            doc: doc.to_owned(),
            error,
        }));
    }
}
