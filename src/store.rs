use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    manifest::MANIFEST_FILENAME,
};

/// File name of the persisted vector index inside the watched folder.
pub const INDEX_FILENAME: &str = "semantic_index.redb";

/// Folder-relative locations of the index artifacts.
///
/// Both the manifest record and the vector index live next to the PDFs
/// they describe, one pair per watched folder. The two are written
/// together at the end of a rebuild, never independently.
#[derive(Debug, Clone)]
pub struct IndexStore {
    folder: PathBuf,
}

impl IndexStore {
    /// Resolve the store for a folder, validating that it is a directory.
    pub fn resolve(folder: &Path) -> Result<Self> {
        if !folder.is_dir() {
            return Err(Error::Folder(folder.to_path_buf()));
        }
        Ok(Self {
            folder: folder.to_path_buf(),
        })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.folder.join(MANIFEST_FILENAME)
    }

    pub fn index_path(&self) -> PathBuf {
        self.folder.join(INDEX_FILENAME)
    }

    /// Whether a vector index has been persisted for this folder.
    pub fn has_index(&self) -> bool {
        self.index_path().is_file()
    }
}
