pub mod completed;
pub mod credentials;
pub mod dlc;
pub mod library;
mod utils;

use crate::{
    api::{DocKind, DocumentStore},
    documents::{CompletionLog, Credentials, DlcCache, LibraryCache},
    Status,
};

/// Creates the config and data documents that do not exist yet.
pub async fn init(store: &DocumentStore) -> Result<(), Status> {
    utils::init::<Credentials>(store, DocKind::Credentials).await?;
    utils::init::<LibraryCache>(store, DocKind::Library).await?;
    utils::init::<DlcCache>(store, DocKind::Dlc).await?;
    utils::init::<CompletionLog>(store, DocKind::Completed).await
}
