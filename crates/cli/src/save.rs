use std::io;
use std::path::{Path, PathBuf};

use kickoff_shared::SavedMatch;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("invalid user name {0:?}")]
    BadUser(String),
    #[error("save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// One JSON snapshot per user under a directory.
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, user: &str) -> Result<PathBuf, SaveError> {
        let ok = !user.is_empty()
            && user
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !ok {
            return Err(SaveError::BadUser(user.to_string()));
        }
        Ok(self.dir.join(format!("{user}.json")))
    }

    pub fn save(&self, user: &str, saved: &SavedMatch) -> Result<PathBuf, SaveError> {
        let path = self.path_for(user)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| SaveError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let json = serde_json::to_string_pretty(saved).map_err(|source| SaveError::Malformed {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|source| SaveError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// `Ok(None)` when the user has no save.
    pub fn load(&self, user: &str) -> Result<Option<SavedMatch>, SaveError> {
        let path = self.path_for(user)?;
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SaveError::Io { path, source }),
        };
        serde_json::from_str(&json)
            .map(Some)
            .map_err(|source| SaveError::Malformed { path, source })
    }

    /// Removing a save that does not exist is not an error.
    pub fn delete(&self, user: &str) -> Result<(), SaveError> {
        let path = self.path_for(user)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SaveError::Io { path, source }),
        }
    }

    pub fn list_users(&self) -> Result<Vec<String>, SaveError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SaveError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut users: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        users.sort();
        Ok(users)
    }
}
