mod document_store;
mod error;
mod steam;

pub use document_store::{DocKind, DocumentStore};
pub use error::CatalogError;
pub use steam::*;
