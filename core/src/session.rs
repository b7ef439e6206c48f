//! A [`TokenStore`] backed by a file, so a login survives between runs of the CLI.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::{debug, warn};
use sekai_api::{SessionError, TokenStore};

/// Keeps the token in a single file.
///
/// The file is read on every call, so logins done by another process are picked up.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // serializes writers
    lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents.trim().to_owned()).filter(|token| !token.is_empty()),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read the session token from {}: {e}", self.path.display());
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)?;
        debug!("Stored session token in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().map_err(|_| SessionError::Poisoned)?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed session token {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_store_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));
        assert_eq!(store.token(), None);

        store.set_token("abc.def").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc.def"));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "abc.def");

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert!(!store.path().exists());

        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_token_written_elsewhere_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);

        std::fs::write(&path, "from-another-process\n").unwrap();

        assert_eq!(store.token().as_deref(), Some("from-another-process"));
    }

    #[test]
    fn test_blank_file_means_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        assert_eq!(FileTokenStore::new(path).token(), None);
    }
}
