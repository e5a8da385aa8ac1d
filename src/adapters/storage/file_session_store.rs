//! File-based Session Store Adapter
//!
//! Stores each booking session as a YAML file named after the user id.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::booking::BookingSession;
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for booking sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the session file path for a user
    fn session_file_path(&self, user_id: UserId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", user_id))
    }

    async fn ensure_dir(&self) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<BookingSession>, SessionStoreError> {
        let file_path = self.session_file_path(user_id);

        if !file_path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&file_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        let session = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(session))
    }

    async fn put(
        &self,
        user_id: UserId,
        session: &BookingSession,
    ) -> Result<(), SessionStoreError> {
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        // Write beside the target, then rename, so a crash never leaves half a file
        let file_path = self.session_file_path(user_id);
        let tmp_path = file_path.with_extension("yaml.tmp");
        fs::write(&tmp_path, yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        fs::rename(&tmp_path, &file_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), SessionStoreError> {
        let file_path = self.session_file_path(user_id);

        if file_path.exists() {
            fs::remove_file(&file_path)
                .await
                .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}
