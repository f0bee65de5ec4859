use tracing::instrument;

use crate::{
    api::{DocKind, DocumentStore},
    documents::LibraryCache,
    Status,
};

use super::utils;

/// Returns the cached owned-games library.
///
/// Reads `data/library.json`.
#[instrument(name = "library::read", level = "trace", skip(store))]
pub async fn read(store: &DocumentStore) -> LibraryCache {
    utils::read(store, DocKind::Library).await
}

/// Replaces the cached owned-games library.
///
/// Writes `data/library.json`.
#[instrument(
    name = "library::write",
    level = "trace",
    skip(store, library),
    fields(games_len = %library.games.len()),
)]
pub async fn write(store: &DocumentStore, library: &LibraryCache) -> Result<(), Status> {
    utils::write(store, DocKind::Library, library).await
}
