use tracing::instrument;

use crate::{
    api::{DocKind, DocumentStore},
    documents::{CompletionEntry, CompletionLog, NewCompletion},
    Status,
};

use super::utils;

/// Returns the user's completion log.
///
/// Reads `data/completed.json`.
#[instrument(name = "completed::read", level = "trace", skip(store))]
pub async fn read(store: &DocumentStore) -> CompletionLog {
    utils::read(store, DocKind::Completed).await
}

/// Returns the user's completion log, or an error if the log exists but cannot
/// be parsed. Used before rewriting the log so unreadable entries are never
/// replaced.
#[instrument(name = "completed::try_read", level = "trace", skip(store))]
pub async fn try_read(store: &DocumentStore) -> Result<CompletionLog, Status> {
    utils::try_read(store, DocKind::Completed).await
}

/// Writes `data/completed.json`.
#[instrument(
    name = "completed::write",
    level = "trace",
    skip(store, log),
    fields(entries_len = %log.entries.len()),
)]
pub async fn write(store: &DocumentStore, log: &CompletionLog) -> Result<(), Status> {
    utils::write(store, DocKind::Completed, log).await
}

/// Logs a new completion and returns the stored entry.
///
/// Reads/Writes `data/completed.json`.
#[instrument(name = "completed::add_entry", level = "trace", skip(store))]
pub async fn add_entry(
    store: &DocumentStore,
    input: NewCompletion,
) -> Result<CompletionEntry, Status> {
    let entry = CompletionEntry::new(input)?;
    let mut log = try_read(store).await?;
    log.add(entry.clone())?;
    write(store, &log).await?;
    Ok(entry)
}

/// Deletes the completion entry with `id`.
///
/// Reads/Writes `data/completed.json`.
#[instrument(name = "completed::remove_entry", level = "trace", skip(store))]
pub async fn remove_entry(store: &DocumentStore, id: &str) -> Result<CompletionEntry, Status> {
    let mut log = try_read(store).await?;
    let entry = log.remove(id)?;
    write(store, &log).await?;
    Ok(entry)
}
