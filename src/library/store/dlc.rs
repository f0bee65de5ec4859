use tracing::instrument;

use crate::{
    api::{DocKind, DocumentStore},
    documents::DlcCache,
    Status,
};

use super::utils;

/// Returns the DLC lists checked so far, keyed by parent app id.
///
/// Reads `data/dlc.json`.
#[instrument(name = "dlc::read", level = "trace", skip(store))]
pub async fn read(store: &DocumentStore) -> DlcCache {
    utils::read(store, DocKind::Dlc).await
}

/// Writes `data/dlc.json`.
#[instrument(name = "dlc::write", level = "trace", skip(store, dlc))]
pub async fn write(store: &DocumentStore, dlc: &DlcCache) -> Result<(), Status> {
    utils::write(store, DocKind::Dlc, dlc).await
}
