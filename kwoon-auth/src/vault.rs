//! Persistent credential storage
//!
//! Keeps the backend token in a single well-known file so a portal restart
//! can restore the previous session.

use kwoon_core::{ErrorContext, KwoonError, KwoonResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name of the persisted credential slot
const TOKEN_FILE: &str = "auth_token";

/// File-backed storage for the backend token
///
/// The vault holds at most one credential. Storing overwrites the previous
/// token; clearing removes the file.
pub struct TokenVault {
    token_path: PathBuf,
}

impl TokenVault {
    /// Create a vault rooted at the given storage directory
    pub fn new<P: AsRef<Path>>(storage_dir: P) -> KwoonResult<Self> {
        let storage_dir = storage_dir.as_ref();

        std::fs::create_dir_all(storage_dir).map_err(|e| KwoonError::Storage {
            message: format!("Failed to create storage directory: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("token_vault")
                .with_operation("create_storage_dir")
                .with_metadata("storage_dir", &storage_dir.display().to_string())
                .with_suggestion("Check that the storage directory is writable"),
        })?;

        let token_path = storage_dir.join(TOKEN_FILE);
        info!(path = %token_path.display(), "Token vault initialized");

        Ok(Self { token_path })
    }

    /// Load the persisted token, if any
    ///
    /// A missing or blank file counts as no credential.
    pub fn load(&self) -> KwoonResult<Option<String>> {
        if !self.token_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&self.token_path).map_err(|e| KwoonError::Storage {
                message: format!("Failed to read persisted token: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("token_vault")
                    .with_operation("load")
                    .with_metadata("path", &self.token_path.display().to_string()),
            })?;

        let token = content.trim();
        if token.is_empty() {
            return Ok(None);
        }

        Ok(Some(token.to_string()))
    }

    /// Persist a token, replacing any previous one
    pub fn store(&self, token: &str) -> KwoonResult<()> {
        std::fs::write(&self.token_path, token).map_err(|e| KwoonError::Storage {
            message: format!("Failed to persist token: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("token_vault")
                .with_operation("store")
                .with_metadata("path", &self.token_path.display().to_string())
                .with_suggestion("Check that the storage directory is writable"),
        })?;

        debug!("Persisted credential");
        Ok(())
    }

    /// Remove the persisted token
    ///
    /// Clearing an empty vault is a no-op.
    pub fn clear(&self) -> KwoonResult<()> {
        if !self.token_path.exists() {
            return Ok(());
        }

        std::fs::remove_file(&self.token_path).map_err(|e| KwoonError::Storage {
            message: format!("Failed to remove persisted token: {}", e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("token_vault")
                .with_operation("clear")
                .with_metadata("path", &self.token_path.display().to_string()),
        })?;

        debug!("Removed persisted credential");
        Ok(())
    }

    /// Path of the credential slot
    pub fn path(&self) -> &Path {
        &self.token_path
    }
}
