use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stowage_backend::{
    Store, StoreError, StoreResult,
    format::{BincodeFormat, Format},
};
use stowage_core::{Key, Options, StoreLabel, Value};
use tokio::{fs, sync::Mutex};

use crate::FileError;

/// Directory below the root that holds files being written.
pub const STAGING_DIR: &str = ".stowage-tmp";

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Serde configuration for the `File` adapter.
///
/// ```yaml
/// dir: /var/lib/myapp/store
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    /// Root directory; created on open if missing.
    pub dir: PathBuf,
}

impl FileConfig {
    /// Opens the configured store.
    pub async fn into_store(self) -> Result<FileStore, FileError> {
        FileStore::open(self.dir).await
    }
}

/// Filesystem store: one file per key below a root directory.
///
/// The physical key is used as a relative path, so `"ab/cdef"` lands in
/// `<root>/ab/cdef`. Keys must be text; pair the store with a key pipeline
/// ending in `escape` or `sha256` + `spread` for arbitrary caller keys.
/// Keys that would leave the root (absolute paths, `.` or `..` components)
/// or that start with [`STAGING_DIR`] are rejected with
/// [`StoreError::InvalidKey`].
///
/// File contents are the value in bincode form, so every [`Value`] kind,
/// including raw counters, survives a round trip.
///
/// ```no_run
/// use stowage_file::FileStore;
///
/// # async fn run() -> Result<(), stowage_file::FileError> {
/// let store = FileStore::open("/var/lib/myapp/store").await?;
/// # Ok(())
/// # }
/// ```
///
/// Cloning is cheap; clones share the root and the write lock.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: Arc<PathBuf>,
    // serializes read-modify-write sequences within this process
    writes: Arc<Mutex<()>>,
    label: StoreLabel,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, FileError> {
        let dir = dir.as_ref();
        if dir.as_os_str().is_empty() {
            return Err(FileError::InvalidConfig("`dir` must not be empty".into()));
        }
        fs::create_dir_all(dir).await?;
        let metadata = fs::metadata(dir).await?;
        if !metadata.is_dir() {
            return Err(FileError::InvalidConfig(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        fs::create_dir_all(dir.join(STAGING_DIR)).await?;
        tracing::debug!(root = %dir.display(), "opened file store");
        Ok(Self {
            root: Arc::new(dir.to_path_buf()),
            writes: Arc::new(Mutex::new(())),
            label: StoreLabel::new_static("file"),
        })
    }

    /// Sets a custom label for this store.
    pub fn with_label(mut self, label: impl Into<StoreLabel>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `key` to a file below the root.
    pub fn path_for(&self, key: &Key) -> StoreResult<PathBuf> {
        let relative = key
            .as_text()
            .ok_or_else(|| StoreError::InvalidKey(format!("expected a text key, got {}", key.kind())))?;
        let candidate = Path::new(relative);
        let mut components = 0;
        for component in candidate.components() {
            match component {
                Component::Normal(name) if components == 0 && name == STAGING_DIR => {
                    return Err(StoreError::InvalidKey(relative.to_owned()));
                }
                Component::Normal(_) => components += 1,
                _ => return Err(StoreError::InvalidKey(relative.to_owned())),
            }
        }
        if components == 0 || relative.ends_with('/') {
            return Err(StoreError::InvalidKey(relative.to_owned()));
        }
        Ok(self.root.join(candidate))
    }

    async fn read(&self, path: &Path) -> StoreResult<Option<Value>> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(BincodeFormat.deserialize(&bytes)?)),
            Err(error) if is_missing(&error) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    /// Writes through a temp file in the staging directory and a rename, so
    /// readers never observe a partially written value.
    async fn write(&self, path: &Path, value: &Value) -> StoreResult<()> {
        let bytes = BincodeFormat.serialize(value)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&staging).await?;
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let temp = staging.join(format!("{}-{seq}", std::process::id()));
        fs::write(&temp, &bytes).await?;
        if let Err(error) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(error.into());
        }
        Ok(())
    }
}

fn is_missing(error: &std::io::Error) -> bool {
    // a file where a directory is expected also means the key is absent
    matches!(error.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
}

#[async_trait]
impl Store for FileStore {
    async fn contains(&self, key: &Key, _options: &Options) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(error) if is_missing(&error) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    async fn load(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        let path = self.path_for(key)?;
        self.read(&path).await
    }

    async fn store(&self, key: &Key, value: Value, _options: &Options) -> StoreResult<Value> {
        let path = self.path_for(key)?;
        let _guard = self.writes.lock().await;
        self.write(&path, &value).await?;
        Ok(value)
    }

    async fn delete(&self, key: &Key, _options: &Options) -> StoreResult<Option<Value>> {
        let path = self.path_for(key)?;
        let _guard = self.writes.lock().await;
        let value = self.read(&path).await?;
        if value.is_some() {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(error) if is_missing(&error) => return Ok(None),
                Err(error) => return Err(error.into()),
            }
        }
        Ok(value)
    }

    async fn increment(&self, key: &Key, amount: i64, _options: &Options) -> StoreResult<i64> {
        let path = self.path_for(key)?;
        let _guard = self.writes.lock().await;
        let current = match self.read(&path).await? {
            None => 0,
            Some(value) => value
                .to_counter()
                .ok_or(StoreError::NotAnInteger(value.kind()))?,
        };
        let next = current
            .checked_add(amount)
            .ok_or_else(|| StoreError::InternalError("counter overflow".into()))?;
        self.write(&path, &Value::Integer(next)).await?;
        Ok(next)
    }

    async fn clear(&self, _options: &Options) -> StoreResult<()> {
        let _guard = self.writes.lock().await;
        let mut entries = fs::read_dir(self.root.as_path()).await?;
        while let Some(entry) = entries.next_entry().await? {
            // files in staging belong to writes of other stores on this root
            if entry.file_name() == STAGING_DIR {
                continue;
            }
            if entry.file_type().await?.is_dir() {
                fs::remove_dir_all(entry.path()).await?;
            } else {
                fs::remove_file(entry.path()).await?;
            }
        }
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }

    fn label(&self) -> StoreLabel {
        self.label.clone()
    }
}
