use std::path::{Path, PathBuf};

/// The four documents the tracker persists.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DocKind {
    Credentials,
    Library,
    Dlc,
    Completed,
}

impl DocKind {
    /// Path of the document relative to the store root.
    pub fn relative_path(&self) -> &'static str {
        match self {
            DocKind::Credentials => "config/config.json",
            DocKind::Library => "data/library.json",
            DocKind::Dlc => "data/dlc.json",
            DocKind::Completed => "data/completed.json",
        }
    }
}

/// Handle on the directory that holds the tracker's JSON documents.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        DocumentStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, kind: DocKind) -> PathBuf {
        self.root.join(kind.relative_path())
    }
}
