use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid file name: {0:?}")]
    InvalidName(String),

    #[error("file not found: {0}")]
    NotFound(String),

    #[error("file store I/O error on {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn io(name: &str, source: std::io::Error) -> Self {
        if source.kind() == ErrorKind::NotFound {
            Self::NotFound(name.to_string())
        } else {
            Self::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

/// Manages image bytes on disk in a single flat directory.
///
/// File names are the join key to [`ImageRecord`](super::ImageRecord)s, so
/// every name must be a single path component.
#[derive(Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Open the store rooted at `base_dir`, creating the directory if needed.
    /// A leading `~` is expanded to the home directory.
    pub async fn open(base_dir: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(base_dir).to_string();
        let base = PathBuf::from(expanded);
        fs::create_dir_all(&base)
            .await
            .map_err(|e| StoreError::io(base_dir, e))?;
        Ok(Self { base_dir: base })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Absolute path for a stored name.
    pub fn path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.base_dir.join(name))
    }

    /// Write bytes under `name`, replacing any existing file.
    pub async fn save(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path(name)?;
        fs::write(&path, data)
            .await
            .map_err(|e| StoreError::io(name, e))
    }

    /// Read the full contents of `name`.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path(name)?;
        fs::read(&path).await.map_err(|e| StoreError::io(name, e))
    }

    /// Open `name` for streaming reads.
    pub async fn open_read(&self, name: &str) -> Result<fs::File, StoreError> {
        let path = self.path(name)?;
        fs::File::open(&path)
            .await
            .map_err(|e| StoreError::io(name, e))
    }

    /// Delete `name`. Deleting a file that does not exist is not an error.
    pub async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(name, e)),
        }
    }

    pub async fn exists(&self, name: &str) -> bool {
        match self.path(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
