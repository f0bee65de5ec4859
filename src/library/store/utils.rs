use serde::{de::DeserializeOwned, Serialize};
use std::{io::ErrorKind, path::Path};
use tracing::warn;

use crate::{
    api::{DocKind, DocumentStore},
    logging::StoreEvent,
    Status,
};

// Reads a document from the store. Returns the default doc if it is missing or
// cannot be parsed.
pub async fn read<Document: DeserializeOwned + Default>(
    store: &DocumentStore,
    kind: DocKind,
) -> Document {
    match try_read(store, kind).await {
        Ok(doc) => doc,
        Err(status) => {
            warn!("{status}, using defaults");
            StoreEvent::read_default(kind.relative_path(), Some(status.to_string()));
            Document::default()
        }
    }
}

/// Reads a document from the store. A missing document reads as the default,
/// but a document that exists and cannot be read or parsed is an error.
pub async fn try_read<Document: DeserializeOwned + Default>(
    store: &DocumentStore,
    kind: DocKind,
) -> Result<Document, Status> {
    let path = store.path(kind);
    let doc_name = kind.relative_path();

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            StoreEvent::read_default(doc_name, None);
            return Ok(Document::default());
        }
        Err(e) => {
            return Err(Status::new(
                &format!("Failed to read '{}'", path.display()),
                e,
            ))
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(doc) => {
            StoreEvent::read(doc_name);
            Ok(doc)
        }
        Err(e) => Err(Status::new(
            &format!("Document '{}' is corrupt", path.display()),
            e,
        )),
    }
}

// Replaces a document in the store. The new contents are written next to the
// target and renamed over it.
pub async fn write<Document: Serialize>(
    store: &DocumentStore,
    kind: DocKind,
    doc: &Document,
) -> Result<(), Status> {
    let path = store.path(kind);
    let result = write_file(&path, doc).await;
    StoreEvent::write(
        kind.relative_path(),
        result.as_ref().err().map(|e| e.to_string()),
    );
    result
}

async fn write_file<Document: Serialize>(path: &Path, doc: &Document) -> Result<(), Status> {
    let json = serde_json::to_vec_pretty(doc)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Status::new(
            &format!("Failed to write '{}'", path.display()),
            e,
        ));
    }
    Ok(())
}

/// Creates any missing document with its default contents.
pub async fn init<Document: Serialize + Default>(
    store: &DocumentStore,
    kind: DocKind,
) -> Result<(), Status> {
    match tokio::fs::try_exists(store.path(kind)).await? {
        true => Ok(()),
        false => write(store, kind, &Document::default()).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{DlcCache, LibraryCache};
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_document_reads_default() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());

        let library: LibraryCache = read(&store, DocKind::Library).await;
        assert_eq!(library, LibraryCache::default());
    }

    #[tokio::test]
    async fn corrupt_document_reads_default() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(store.path(DocKind::Dlc), "{not json").unwrap();

        let dlc: DlcCache = read(&store, DocKind::Dlc).await;
        assert!(dlc.dlc.is_empty());
    }

    #[tokio::test]
    async fn try_read_reports_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());

        let missing = try_read::<DlcCache>(&store, DocKind::Dlc).await;
        assert_eq!(missing, Ok(DlcCache::default()));

        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(store.path(DocKind::Dlc), "{not json").unwrap();
        let corrupt = try_read::<DlcCache>(&store, DocKind::Dlc).await;
        assert!(matches!(corrupt, Err(Status::Internal(_))));
    }

    #[tokio::test]
    async fn write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        let mut dlc = DlcCache::default();
        dlc.dlc.insert("440".to_owned(), vec![]);

        write(&store, DocKind::Dlc, &dlc).await.unwrap();

        assert_eq!(read::<DlcCache>(&store, DocKind::Dlc).await, dlc);
        assert!(!store.path(DocKind::Dlc).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        // A directory in place of the document makes the rename fail.
        std::fs::create_dir_all(store.path(DocKind::Dlc)).unwrap();

        let result = write(&store, DocKind::Dlc, &DlcCache::default()).await;
        assert!(matches!(result, Err(Status::Internal(_))));
    }

    #[tokio::test]
    async fn init_keeps_existing_documents() {
        let dir = TempDir::new().unwrap();
        let store = DocumentStore::open(dir.path());
        let library = LibraryCache {
            last_updated: 42,
            ..Default::default()
        };
        write(&store, DocKind::Library, &library).await.unwrap();

        init::<LibraryCache>(&store, DocKind::Library).await.unwrap();
        init::<DlcCache>(&store, DocKind::Dlc).await.unwrap();

        assert_eq!(read::<LibraryCache>(&store, DocKind::Library).await, library);
        assert!(store.path(DocKind::Dlc).exists());
    }
}
