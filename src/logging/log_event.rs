use serde::{Deserialize, Serialize};
use tracing::warn;
use valuable::Valuable;

use super::{StoreEvent, SteamEvent, SyncEvent};

#[derive(Serialize, Deserialize, Valuable, Clone, Debug)]
pub enum LogEvent {
    Steam(SteamEvent),
    Store(StoreEvent),
    Sync(SyncEvent),
}

impl LogEvent {
    pub fn encode(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                warn!("{}", e);
                String::default()
            }
        }
    }
}

#[macro_export]
macro_rules! log_event {
    ($event:expr) => {
        ::tracing::debug!(event = $event.encode())
    };
}
