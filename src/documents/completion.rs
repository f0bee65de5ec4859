use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Reverse;
use uuid::Uuid;

use super::appid;
use crate::Status;

/// Document type under 'data/completed.json' that logs the games and DLC the
/// user has finished.
#[derive(Serialize, Deserialize, Default, Clone, PartialEq, Debug)]
#[serde(transparent)]
pub struct CompletionLog {
    pub entries: Vec<CompletionEntry>,
}

/// A logged completion. Older clients stored fields verbatim, so text fields
/// accept `null` and `completion_date` is kept as written (it may be empty).
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CompletionEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(deserialize_with = "appid::deserialize")]
    pub appid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub game_name: String,

    /// `YYYY-MM-DD` for entries logged by this crate.
    #[serde(default, deserialize_with = "null_as_default")]
    pub completion_date: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_dlc_expansion: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,

    #[serde(default)]
    pub collection_name: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub logged_at: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// User input for a new completion entry.
#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct NewCompletion {
    #[serde(default)]
    pub appid: String,

    #[serde(default)]
    pub game_name: String,

    #[serde(default)]
    pub completion_date: Option<NaiveDate>,

    #[serde(default)]
    pub is_dlc_expansion: bool,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub collection_name: Option<String>,
}

impl CompletionEntry {
    /// Validates user input and stamps it with a fresh id and log time.
    pub fn new(input: NewCompletion) -> Result<Self, Status> {
        let appid = input.appid.trim();
        let game_name = input.game_name.trim();
        if appid.is_empty() || game_name.is_empty() {
            return Err(Status::invalid_argument("Missing game name or AppID."));
        }

        let now = Utc::now();
        Ok(CompletionEntry {
            id: Uuid::new_v4().to_string(),
            appid: appid.to_owned(),
            game_name: game_name.to_owned(),
            completion_date: input
                .completion_date
                .unwrap_or(now.date_naive())
                .format("%Y-%m-%d")
                .to_string(),
            is_dlc_expansion: input.is_dlc_expansion,
            notes: input.notes,
            collection_name: input.collection_name.filter(|name| !name.is_empty()),
            logged_at: now.to_rfc3339(),
        })
    }

    /// The completion date, if the stored text is a valid `YYYY-MM-DD` date.
    pub fn completed_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.completion_date.trim(), "%Y-%m-%d").ok()
    }
}

impl CompletionLog {
    /// Adds `entry` to the log. A game can only be logged once as a main
    /// (non-expansion) completion.
    pub fn add(&mut self, entry: CompletionEntry) -> Result<(), Status> {
        if !entry.is_dlc_expansion
            && self
                .entries
                .iter()
                .any(|e| !e.is_dlc_expansion && e.appid == entry.appid)
        {
            return Err(Status::already_exists(format!(
                "Game with AppID {} is already in the completed log.",
                entry.appid
            )));
        }
        if self.entries.iter().any(|e| e.id == entry.id) {
            return Err(Status::already_exists(format!(
                "Log entry '{}' already exists.",
                entry.id
            )));
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Removes the entry with `id`.
    pub fn remove(&mut self, id: &str) -> Result<CompletionEntry, Status> {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => Ok(self.entries.remove(pos)),
            None => Err(Status::not_found("Log entry not found.")),
        }
    }

    /// Entries ordered by completion date, most recent first. Entries without
    /// a valid date go last.
    pub fn sorted(&self) -> Vec<CompletionEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| Reverse(e.completed_on()));
        entries
    }
}
