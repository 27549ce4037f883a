//! Directory-backed profile storage: one JSON file per key.
use neonfolio_game::ProfileStorage;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("failed to create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the data directory, creating it if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, FileStorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| FileStorageError::CreateDir {
            path: root.clone(),
            source,
        })?;
        log::debug!("profile data in {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, FileStorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(FileStorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl ProfileStorage for FileStorage {
    type Error = FileStorageError;

    fn load_blob(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileStorageError::Read { path, source }),
        }
    }

    fn save_blob(&self, key: &str, blob: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so a crash never leaves half a blob.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| FileStorageError::Write { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FileStorageError::Remove { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "neonfolio-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn blobs_round_trip_through_files() {
        let dir = temp_dir("roundtrip");
        let storage = FileStorage::open(&dir).unwrap();
        assert_eq!(storage.load_blob("neonfolio.progress").unwrap(), None);

        storage.save_blob("neonfolio.progress", r#"{"level":2}"#).unwrap();
        assert!(dir.join("neonfolio.progress.json").exists());
        assert_eq!(
            storage.load_blob("neonfolio.progress").unwrap().as_deref(),
            Some(r#"{"level":2}"#)
        );

        storage.remove("neonfolio.progress").unwrap();
        storage.remove("neonfolio.progress").unwrap();
        assert_eq!(storage.load_blob("neonfolio.progress").unwrap(), None);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn keys_cannot_escape_the_directory() {
        let storage = FileStorage::open(temp_dir("keys")).unwrap();
        for key in ["../etc/passwd", "", ".hidden", "a/b"] {
            assert!(matches!(
                storage.load_blob(key),
                Err(FileStorageError::InvalidKey(_))
            ));
        }
        fs::remove_dir_all(storage.root()).ok();
    }
}
