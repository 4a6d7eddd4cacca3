//! Backing-file plumbing: bootstrap, full reads, atomic full overwrites.

use crate::error::{Result, StoreError};
use crate::types::RawRecord;
use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Serialized form of an empty collection, written when bootstrapping.
const EMPTY_COLLECTION: &str = "[]";

/// The single flat file holding the serialized collection.
pub(crate) struct BackingFile {
    path: PathBuf,
}

impl BackingFile {
    /// Resolve a filename against the current working directory.
    ///
    /// Resolution happens once, at construction; changing the working
    /// directory afterwards does not move the store.
    pub(crate) fn resolve(filename: impl AsRef<Path>) -> Result<Self> {
        let filename = filename.as_ref();
        let path = if filename.is_absolute() {
            filename.to_path_buf()
        } else {
            env::current_dir()?.join(filename)
        };
        Ok(Self { path })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole collection, creating the file with an empty
    /// collection first if it does not exist yet.
    pub(crate) fn load(&self) -> Result<Vec<RawRecord>> {
        self.bootstrap()?;
        let content = fs::read_to_string(&self.path)?;
        let records: Vec<RawRecord> = serde_json::from_str(&content)
            .map_err(|e| StoreError::Deserialization(e.to_string()))?;
        debug!(path = %self.path.display(), records = records.len(), "loaded collection");
        Ok(records)
    }

    /// Serialize and persist the whole collection, replacing prior content.
    pub(crate) fn store(&self, records: &[RawRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;
        self.replace(content.as_bytes())?;
        debug!(
            path = %self.path.display(),
            records = records.len(),
            bytes = content.len(),
            "persisted collection"
        );
        Ok(())
    }

    fn bootstrap(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        debug!(path = %self.path.display(), "bootstrapping empty collection");
        self.replace(EMPTY_COLLECTION.as_bytes())
    }

    /// Overwrite the file via a sibling temp file and a rename, so a reader
    /// never observes a truncated collection.
    fn replace(&self, content: &[u8]) -> Result<()> {
        let tmp = self.tmp_path();
        let mut file = File::create(&tmp)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
