use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::appid;

/// Document type under 'data/library.json' that mirrors the games owned by
/// the configured Steam account.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct LibraryCache {
    /// Epoch seconds of the last successful refresh, 0 if never refreshed.
    #[serde(default)]
    pub last_updated: i64,

    /// Count reported upstream. Derived counts use `games.len()` instead.
    #[serde(default)]
    pub game_count: u64,

    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

impl LibraryCache {
    pub fn new(games: Vec<OwnedGame>, total_count: u64) -> Self {
        LibraryCache {
            last_updated: Utc::now().timestamp(),
            game_count: total_count,
            games,
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        match self.last_updated {
            0 => None,
            ts => DateTime::from_timestamp(ts, 0),
        }
    }

    pub fn total_playtime(&self) -> u64 {
        self.games.iter().map(|game| game.playtime_forever).sum()
    }
}

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Eq, Debug)]
pub struct OwnedGame {
    #[serde(deserialize_with = "appid::deserialize")]
    pub appid: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Total minutes played.
    #[serde(default)]
    pub playtime_forever: u64,
}

impl OwnedGame {
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_GAME)
    }
}

/// Sorts games by name, case-insensitive, with unnamed entries last.
pub fn sort_by_name(games: &mut [OwnedGame]) {
    games.sort_by_cached_key(|game| match &game.name {
        Some(name) => (false, name.to_lowercase()),
        None => (true, String::new()),
    });
}

const UNKNOWN_GAME: &str = "Unknown Game";
