use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, sync::Arc};

use crate::{
    api::DocumentStore,
    documents::{CompletionEntry, CompletionLog, DlcCache, DlcEntry, LibraryCache},
};

use super::store;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct GameMatch {
    pub appid: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct LibraryGame {
    pub appid: String,
    pub name: String,
    pub playtime_forever: u64,
    pub is_completed: bool,
}

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct CompletionStats {
    pub total_games: usize,
    pub completed_count: usize,
}

#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
pub struct LibraryStatus {
    pub total_games: usize,
    pub total_playtime_minutes: u64,

    /// `None` if the library was never refreshed.
    pub last_updated: Option<DateTime<Utc>>,
}

impl LibraryStatus {
    pub fn last_updated_display(&self) -> String {
        match self.last_updated {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => String::from("Never"),
        }
    }

    /// True if the library was never refreshed or is older than `max_age`.
    pub fn is_stale(&self, now: DateTime<Utc>, max_age: TimeDelta) -> bool {
        match self.last_updated {
            Some(ts) => now - ts > max_age,
            None => true,
        }
    }
}

/// Case-insensitive substring search over game names, in library order.
pub fn search_games(library: &LibraryCache, query: &str, limit: usize) -> Vec<GameMatch> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return vec![];
    }

    library
        .games
        .iter()
        .filter(|game| {
            game.name
                .as_ref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .take(limit)
        .map(|game| GameMatch {
            appid: game.appid.clone(),
            name: game.title().to_owned(),
        })
        .collect()
}

/// Case-insensitive substring search over the DLC descriptions recorded for
/// `parent_appid`.
pub fn search_dlc(dlc: &DlcCache, parent_appid: &str, query: &str) -> Vec<DlcEntry> {
    let query = query.trim().to_lowercase();
    dlc.get(parent_appid)
        .iter()
        .filter(|entry| entry.description.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Library games annotated with whether any log entry names them.
pub fn library_with_completion_status(
    library: &LibraryCache,
    log: &CompletionLog,
) -> Vec<LibraryGame> {
    let completed = completed_appids(log, |_| true);
    library
        .games
        .iter()
        .map(|game| LibraryGame {
            appid: game.appid.clone(),
            name: game.title().to_owned(),
            playtime_forever: game.playtime_forever,
            is_completed: completed.contains(game.appid.as_str()),
        })
        .collect()
}

/// Counts library games with a main (non-expansion) completion entry.
pub fn completion_stats(library: &LibraryCache, log: &CompletionLog) -> CompletionStats {
    let completed = completed_appids(log, |entry| !entry.is_dlc_expansion);
    CompletionStats {
        total_games: library.games.len(),
        completed_count: library
            .games
            .iter()
            .filter(|game| completed.contains(game.appid.as_str()))
            .count(),
    }
}

pub fn library_status(library: &LibraryCache) -> LibraryStatus {
    LibraryStatus {
        total_games: library.games.len(),
        total_playtime_minutes: library.total_playtime(),
        last_updated: library.last_updated(),
    }
}

fn completed_appids(
    log: &CompletionLog,
    include: impl Fn(&CompletionEntry) -> bool,
) -> HashSet<&str> {
    log.entries
        .iter()
        .filter(|entry| include(*entry))
        .map(|entry| entry.appid.as_str())
        .collect()
}

/// Read-only views over the persisted documents.
pub struct LibraryQueries {
    store: Arc<DocumentStore>,
}

impl LibraryQueries {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        LibraryQueries { store }
    }

    pub async fn get_library(&self) -> LibraryCache {
        store::library::read(&self.store).await
    }

    pub async fn search_games(&self, query: &str, limit: usize) -> Vec<GameMatch> {
        search_games(&self.get_library().await, query, limit)
    }

    pub async fn search_dlc(&self, parent_appid: &str, query: &str) -> Vec<DlcEntry> {
        search_dlc(&store::dlc::read(&self.store).await, parent_appid, query)
    }

    pub async fn library_with_completion_status(&self) -> Vec<LibraryGame> {
        let log = store::completed::read(&self.store).await;
        library_with_completion_status(&self.get_library().await, &log)
    }

    pub async fn completion_stats(&self) -> CompletionStats {
        let log = store::completed::read(&self.store).await;
        completion_stats(&self.get_library().await, &log)
    }

    pub async fn library_status(&self) -> LibraryStatus {
        library_status(&self.get_library().await)
    }

    /// The completion log, most recent completion first.
    pub async fn completion_log(&self) -> Vec<CompletionEntry> {
        store::completed::read(&self.store).await.sorted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{NewCompletion, OwnedGame};

    fn library(names: &[(&str, Option<&str>)]) -> LibraryCache {
        LibraryCache {
            last_updated: 0,
            game_count: names.len() as u64,
            games: names
                .iter()
                .map(|(appid, name)| OwnedGame {
                    appid: appid.to_string(),
                    name: name.map(str::to_owned),
                    playtime_forever: 30,
                })
                .collect(),
        }
    }

    fn log(entries: &[(&str, bool)]) -> CompletionLog {
        let mut log = CompletionLog::default();
        for (appid, is_dlc_expansion) in entries {
            log.add(
                CompletionEntry::new(NewCompletion {
                    appid: appid.to_string(),
                    game_name: "Some game".to_owned(),
                    is_dlc_expansion: *is_dlc_expansion,
                    ..Default::default()
                })
                .unwrap(),
            )
            .unwrap();
        }
        log
    }

    #[test]
    fn search_games_by_substring() {
        let library = library(&[("220", Some("Half-Life 2")), ("620", Some("Portal 2"))]);

        assert_eq!(
            search_games(&library, "half", 10),
            vec![GameMatch {
                appid: "220".to_owned(),
                name: "Half-Life 2".to_owned()
            }]
        );
        assert!(search_games(&library, "zz", 10).is_empty());
    }

    #[test]
    fn search_games_keeps_order_and_limit() {
        let library = library(&[
            ("1", Some("Portal")),
            ("2", None),
            ("3", Some("Portal 2")),
            ("4", Some("Portal Stories")),
        ]);

        let matches = search_games(&library, "PORTAL", 2);
        assert_eq!(
            matches.iter().map(|m| m.appid.as_str()).collect::<Vec<_>>(),
            vec!["1", "3"]
        );
        assert!(search_games(&library, "  ", 10).is_empty());
    }

    #[test]
    fn search_dlc_for_parent() {
        let mut dlc = DlcCache::default();
        dlc.dlc.insert(
            "620".to_owned(),
            vec![
                DlcEntry::new("1", "Portal 2 Soundtrack"),
                DlcEntry::new("2", "Peer Review"),
            ],
        );

        assert_eq!(
            search_dlc(&dlc, "620", "soundtrack"),
            vec![DlcEntry::new("1", "Portal 2 Soundtrack")]
        );
        assert_eq!(search_dlc(&dlc, "620", "").len(), 2);
        assert!(search_dlc(&dlc, "440", "soundtrack").is_empty());
    }

    #[test]
    fn completion_status_join() {
        let library = library(&[("220", Some("Half-Life 2")), ("620", None)]);
        let games = library_with_completion_status(&library, &log(&[("620", false)]));

        assert_eq!(
            games,
            vec![
                LibraryGame {
                    appid: "220".to_owned(),
                    name: "Half-Life 2".to_owned(),
                    playtime_forever: 30,
                    is_completed: false,
                },
                LibraryGame {
                    appid: "620".to_owned(),
                    name: "Unknown Game".to_owned(),
                    playtime_forever: 30,
                    is_completed: true,
                },
            ]
        );
    }

    #[test]
    fn stats_count_owned_main_completions() {
        let library = library(&[("220", Some("Half-Life 2")), ("620", Some("Portal 2"))]);
        let log = log(&[("220", false), ("999", false), ("620", true)]);

        assert_eq!(
            completion_stats(&library, &log),
            CompletionStats {
                total_games: 2,
                completed_count: 1,
            }
        );
    }

    #[test]
    fn status_of_never_refreshed_library() {
        let status = library_status(&LibraryCache::default());

        assert_eq!(status.last_updated_display(), "Never");
        assert!(status.is_stale(Utc::now(), TimeDelta::hours(24)));
    }

    #[test]
    fn status_staleness() {
        let mut library = library(&[("220", Some("Half-Life 2"))]);
        library.last_updated = 1_700_000_000;
        let status = library_status(&library);

        assert_eq!(status.total_playtime_minutes, 30);
        assert_eq!(status.last_updated_display(), "2023-11-14 22:13:20 UTC");

        let refreshed = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert!(!status.is_stale(refreshed + TimeDelta::hours(1), TimeDelta::hours(24)));
        assert!(status.is_stale(refreshed + TimeDelta::hours(25), TimeDelta::hours(24)));
    }
}
