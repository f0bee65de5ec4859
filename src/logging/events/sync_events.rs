use serde::{Deserialize, Serialize};
use valuable::Valuable;

use crate::{log_event, logging::LogEvent};

#[derive(Serialize, Deserialize, Valuable, Default, Clone, Debug)]
pub struct SyncEvent {
    steam_id: String,
    game_count: usize,
    dlc_pending: usize,
    dlc_attempted: usize,
    dlc_checked: usize,
    dlc_cache_saved: bool,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SyncEvent {
    pub fn new(steam_id: &str) -> Self {
        SyncEvent {
            steam_id: steam_id.to_owned(),
            ..Default::default()
        }
    }

    pub fn games(&mut self, game_count: usize, dlc_pending: usize) {
        self.game_count = game_count;
        self.dlc_pending = dlc_pending;
    }

    pub fn dlc(&mut self, attempted: usize, checked: usize, cache_saved: bool) {
        self.dlc_attempted = attempted;
        self.dlc_checked = checked;
        self.dlc_cache_saved = cache_saved;
    }

    pub fn log(self) {
        log_event!(LogEvent::Sync(self));
    }

    pub fn log_error(mut self, error: String) {
        self.error = Some(error);
        log_event!(LogEvent::Sync(self));
    }
}
