use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

/// Byte-level persistence for the appointment collection.
///
/// A store knows nothing about the shape of what it holds; it only moves
/// one opaque blob in and out.
#[async_trait]
pub trait Store: Send + Sync {
    /// Return the full persisted blob.
    async fn load(&self) -> io::Result<Bytes>;

    /// Replace the persisted blob. Readers see either the old or the new
    /// content, never a mix.
    async fn save(&self, data: Bytes) -> io::Result<()>;
}

/// Per-process sequence for temp file names.
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Single-file store. Saves go through a temp file + rename.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Fail unless the backing file exists and is a regular file.
    pub async fn check_file(&self) -> io::Result<()> {
        let meta = fs::metadata(&self.path).await.map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("could not open data file {}: {e}", self.path.display()),
            )
        })?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", self.path.display()),
            ));
        }
        Ok(())
    }

    /// A fresh sibling temp path, unique per process and per call, so
    /// concurrent writers never share one temp file.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        name.push(format!(".{}.{seq}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    async fn write_tmp(tmp_path: &Path, data: &[u8]) -> io::Result<()> {
        let mut file = File::create(tmp_path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        file.sync_all().await
    }
}

#[async_trait]
impl Store for FileStore {
    async fn load(&self) -> io::Result<Bytes> {
        let data = fs::read(&self.path).await?;
        Ok(Bytes::from(data))
    }

    async fn save(&self, data: Bytes) -> io::Result<()> {
        let tmp_path = self.tmp_path();
        let result = match Self::write_tmp(&tmp_path, &data).await {
            Ok(()) => fs::rename(&tmp_path, &self.path).await,
            Err(e) => Err(e),
        };
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path).await;
        }
        result
    }
}

/// In-process store. An empty store behaves like a missing file.
#[derive(Default)]
pub struct MemoryStore {
    blob: RwLock<Option<Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<Bytes>) -> Self {
        Self {
            blob: RwLock::new(Some(data.into())),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn load(&self) -> io::Result<Bytes> {
        self.blob
            .read()
            .await
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "store is empty"))
    }

    async fn save(&self, data: Bytes) -> io::Result<()> {
        *self.blob.write().await = Some(data);
        Ok(())
    }
}
