use tracing::instrument;

use crate::{
    api::{DocKind, DocumentStore},
    documents::Credentials,
    Status,
};

use super::utils;

/// Returns the stored Steam credentials, empty if setup never ran.
///
/// Reads `config/config.json`.
#[instrument(name = "credentials::read", level = "trace", skip(store))]
pub async fn read(store: &DocumentStore) -> Credentials {
    utils::read(store, DocKind::Credentials).await
}

/// Writes the Steam credentials.
///
/// Writes `config/config.json`.
#[instrument(name = "credentials::write", level = "trace", skip_all)]
pub async fn write(store: &DocumentStore, credentials: &Credentials) -> Result<(), Status> {
    utils::write(store, DocKind::Credentials, credentials).await
}
