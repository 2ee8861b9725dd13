//! Blob storage backends for the persisted workout log.
//!
//! The codec only needs to read, write and delete one text blob. Disk storage
//! uses file locking and atomic replacement so a crash mid-write never leaves a
//! truncated log behind.

use crate::{Error, Result};
use fs2::FileExt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Storage for a single serialized blob
pub trait BlobStorage {
    /// Read the stored blob, `None` if nothing has been stored yet
    fn read_blob(&self) -> Result<Option<String>>;

    /// Replace the stored blob
    fn write_blob(&mut self, blob: &str) -> Result<()>;

    /// Remove the stored blob; removing an absent blob is not an error
    fn delete_blob(&mut self) -> Result<()>;
}

/// File-backed blob storage with locking
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    fn ensure_parent_dir(&self) -> Result<&Path> {
        let parent = self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "storage path missing parent")
        })?;
        std::fs::create_dir_all(parent)?;
        Ok(parent)
    }
}

impl BlobStorage for FileStorage {
    fn read_blob(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            tracing::debug!("No workout file at {:?}", self.path);
            return Ok(None);
        }

        let file = File::open(&self.path)?;
        // Acquire shared lock for reading
        file.lock_shared()?;

        let mut bytes = Vec::new();
        let read = std::io::BufReader::new(&file).read_to_end(&mut bytes);
        file.unlock()?;
        read?;

        tracing::debug!("Read {} bytes from {:?}", bytes.len(), self.path);
        let contents = String::from_utf8(bytes).map_err(|e| {
            Error::CorruptData(format!("{:?} is not valid UTF-8: {}", self.path, e))
        })?;
        Ok(Some(contents))
    }

    /// Atomically writes the blob by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    fn write_blob(&mut self, blob: &str) -> Result<()> {
        let parent = self.ensure_parent_dir()?;
        let temp = NamedTempFile::new_in(parent)?;

        // Serialize concurrent writers on the temp file
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(blob.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Wrote {} bytes to {:?}", blob.len(), self.path);
        Ok(())
    }

    fn delete_blob(&mut self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("Deleted workout file {:?}", self.path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory blob storage
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    blob: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl BlobStorage for MemoryStorage {
    fn read_blob(&self) -> Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn write_blob(&mut self, blob: &str) -> Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn delete_blob(&mut self) -> Result<()> {
        self.blob = None;
        Ok(())
    }
}
