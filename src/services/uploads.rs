//! Image storage under the configured upload root.
//!
//! Replacing an image is two-phase: [`UploadStore::stage`] writes the new file
//! under a fresh name, the caller points the database row at it, and then
//! either [`UploadStore::commit`] removes the superseded file or
//! [`UploadStore::discard`] removes the staged one.

use crate::config::UploadsConfig;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Stem used when sanitizing leaves nothing of the original name.
const FALLBACK_STEM: &str = "image";

/// Upper bound on collision suffixes tried within one second.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file selected")]
    Empty,

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("File type not allowed: {0}")]
    ExtensionNotAllowed(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Failure of a two-phase image replacement.
#[derive(Debug, Error)]
pub enum ReplaceError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Failed to record upload: {0}")]
    Commit(anyhow::Error),
}

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A file written to disk that no row references yet.
#[derive(Debug)]
#[must_use = "a staged upload must be committed or discarded"]
pub struct StagedUpload {
    filename: String,
    path: PathBuf,
}

impl StagedUpload {
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
}

impl UploadStore {
    #[must_use]
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            root: PathBuf::from(&config.path),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates a client-supplied name and reduces it to a safe ASCII form.
    pub fn sanitize(&self, original: &str) -> Result<String, UploadError> {
        let original = original.trim();

        if original.is_empty() {
            return Err(UploadError::Empty);
        }
        if original.contains(['/', '\\']) || original.contains("..") || original.starts_with('.')
        {
            return Err(UploadError::InvalidName(original.to_string()));
        }

        let (stem, extension) = original
            .rsplit_once('.')
            .ok_or_else(|| UploadError::ExtensionNotAllowed(original.to_string()))?;

        let extension = extension.to_ascii_lowercase();
        if !self.allowed_extensions.contains(&extension) {
            return Err(UploadError::ExtensionNotAllowed(extension));
        }

        let mut safe_stem: String = stem
            .chars()
            .filter_map(|c| match c {
                c if c.is_whitespace() => Some('_'),
                c if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' => Some(c),
                _ => None,
            })
            .collect();
        safe_stem = safe_stem.trim_matches(['.', '_']).to_string();
        if safe_stem.is_empty() {
            safe_stem = FALLBACK_STEM.to_string();
        }

        Ok(format!("{safe_stem}.{extension}"))
    }

    /// Resolves a stored filename to its path, refusing anything that could
    /// escape the upload root.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, UploadError> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.contains("..")
            || filename.starts_with('.')
        {
            return Err(UploadError::InvalidName(filename.to_string()));
        }
        Ok(self.root.join(filename))
    }

    /// Writes `bytes` under `<unix-seconds>_<sanitized-name>`, never
    /// overwriting an existing file.
    pub async fn stage(&self, original_name: &str, bytes: &[u8]) -> Result<StagedUpload, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let safe_name = self.sanitize(original_name)?;
        fs::create_dir_all(&self.root).await?;

        let timestamp = chrono::Utc::now().timestamp();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let filename = if attempt == 0 {
                format!("{timestamp}_{safe_name}")
            } else {
                format!("{timestamp}_{attempt}_{safe_name}")
            };
            let path = self.root.join(&filename);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, bytes).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }

            debug!(filename = %filename, size = bytes.len(), "Staged upload");
            return Ok(StagedUpload { filename, path });
        }

        Err(UploadError::Storage(format!(
            "Could not find a free name for {safe_name}"
        )))
    }

    /// Finalizes a staged file once its row is committed and removes the
    /// file it replaced. Returns the stored filename.
    pub async fn commit(&self, staged: StagedUpload, previous: Option<String>) -> String {
        if let Some(previous) = previous
            && previous != staged.filename
        {
            self.delete(&previous).await;
        }
        info!(filename = %staged.filename, "Upload committed");
        staged.filename
    }

    /// Stages `upload`, lets `commit` point a row at it, then settles the files.
    ///
    /// `commit` receives the staged filename and returns the filename it
    /// replaced, or `None` when the row does not exist. Returns the stored
    /// filename, or `None` for a missing row.
    pub async fn replace<F, Fut>(
        &self,
        upload: &ImageUpload,
        commit: F,
    ) -> Result<Option<String>, ReplaceError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = anyhow::Result<Option<Option<String>>>>,
    {
        let staged = self.stage(&upload.filename, &upload.bytes).await?;

        match commit(staged.filename().to_string()).await {
            Ok(Some(previous)) => Ok(Some(self.commit(staged, previous).await)),
            Ok(None) => {
                self.discard(staged).await;
                Ok(None)
            }
            Err(e) => {
                self.discard(staged).await;
                Err(ReplaceError::Commit(e))
            }
        }
    }

    /// Removes a staged file whose row update did not happen.
    pub async fn discard(&self, staged: StagedUpload) {
        match fs::remove_file(&staged.path).await {
            Ok(()) => debug!(filename = %staged.filename, "Discarded staged upload"),
            Err(e) => warn!(
                filename = %staged.filename,
                error = %e,
                "Failed to discard staged upload"
            ),
        }
    }

    /// Deletes a stored file. Failures are logged, never returned.
    pub async fn delete(&self, filename: &str) {
        let path = match self.path_for(filename) {
            Ok(path) => path,
            Err(e) => {
                warn!(filename = %filename, error = %e, "Refusing to delete upload");
                return;
            }
        };

        match fs::remove_file(&path).await {
            Ok(()) => info!(filename = %filename, "Deleted upload"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(filename = %filename, "Upload already gone");
            }
            Err(e) => warn!(filename = %filename, error = %e, "Failed to delete upload"),
        }
    }

    /// Deletes an optional stored file, as returned by row deletions.
    pub async fn delete_if_some(&self, filename: Option<String>) {
        if let Some(filename) = filename {
            self.delete(&filename).await;
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> UploadStore {
        let config = UploadsConfig {
            path: std::env::temp_dir()
                .join(format!("claystore-uploads-{}", uuid::Uuid::new_v4()))
                .to_string_lossy()
                .into_owned(),
            ..UploadsConfig::default()
        };
        UploadStore::new(&config)
    }

    #[test]
    fn sanitize_keeps_safe_names() {
        let store = temp_store();
        assert_eq!(store.sanitize("vase.PNG").unwrap(), "vase.png");
        assert_eq!(store.sanitize("clay mug 2.jpg").unwrap(), "clay_mug_2.jpg");
        assert_eq!(store.sanitize("إناء.webp").unwrap(), "image.webp");
    }

    #[test]
    fn sanitize_rejects_traversal_and_hidden_names() {
        let store = temp_store();
        assert!(matches!(
            store.sanitize("../etc/passwd.png"),
            Err(UploadError::InvalidName(_))
        ));
        assert!(matches!(
            store.sanitize("a\\b.png"),
            Err(UploadError::InvalidName(_))
        ));
        assert!(matches!(
            store.sanitize(".hidden.png"),
            Err(UploadError::InvalidName(_))
        ));
    }

    #[test]
    fn sanitize_rejects_unlisted_extensions() {
        let store = temp_store();
        assert!(matches!(
            store.sanitize("script.exe"),
            Err(UploadError::ExtensionNotAllowed(_))
        ));
        assert!(matches!(
            store.sanitize("noext"),
            Err(UploadError::ExtensionNotAllowed(_))
        ));
    }

    #[tokio::test]
    async fn stage_never_overwrites() {
        let store = temp_store();

        let first = store.stage("bowl.png", b"one").await.unwrap();
        let second = store.stage("bowl.png", b"two").await.unwrap();
        assert_ne!(first.filename(), second.filename());
        assert!(first.filename().ends_with("_bowl.png"));

        let a = store.commit(first, None).await;
        let b = store.commit(second, None).await;
        assert_eq!(std::fs::read(store.root().join(&a)).unwrap(), b"one");
        assert_eq!(std::fs::read(store.root().join(&b)).unwrap(), b"two");

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn commit_removes_superseded_file() {
        let store = temp_store();

        let old = store.stage("old.jpg", b"old").await.unwrap();
        let old_name = store.commit(old, None).await;

        let new = store.stage("new.jpg", b"new").await.unwrap();
        let new_name = store.commit(new, Some(old_name.clone())).await;

        assert!(!store.root().join(&old_name).exists());
        assert!(store.root().join(&new_name).exists());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn discard_removes_staged_file() {
        let store = temp_store();

        let staged = store.stage("tmp.gif", b"gif").await.unwrap();
        let path = store.root().join(staged.filename());
        assert!(path.exists());

        store.discard(staged).await;
        assert!(!path.exists());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn replace_discards_when_row_is_missing() {
        let store = temp_store();
        let upload = ImageUpload {
            filename: "cup.png".to_string(),
            bytes: b"png".to_vec(),
        };

        let stored = store
            .replace(&upload, |_| async { Ok(None) })
            .await
            .unwrap();
        assert!(stored.is_none());

        let failed = store
            .replace(&upload, |_| async { Err(anyhow::anyhow!("db down")) })
            .await;
        assert!(matches!(failed, Err(ReplaceError::Commit(_))));

        let leftovers = std::fs::read_dir(store.root()).unwrap().count();
        assert_eq!(leftovers, 0);

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn replace_swaps_files_on_success() {
        let store = temp_store();
        let first = ImageUpload {
            filename: "a.png".to_string(),
            bytes: b"a".to_vec(),
        };
        let second = ImageUpload {
            filename: "b.png".to_string(),
            bytes: b"b".to_vec(),
        };

        let old = store
            .replace(&first, |_| async { Ok(Some(None)) })
            .await
            .unwrap()
            .unwrap();
        let old_for_commit = old.clone();
        let new = store
            .replace(&second, |_| async move { Ok(Some(Some(old_for_commit))) })
            .await
            .unwrap()
            .unwrap();

        assert!(!store.root().join(&old).exists());
        assert!(store.root().join(&new).exists());

        let _ = std::fs::remove_dir_all(store.root());
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let store = temp_store();
        assert!(matches!(
            store.stage("x.png", b"").await,
            Err(UploadError::Empty)
        ));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_files() {
        let store = temp_store();
        store.delete("1700000000_missing.png").await;
        store.delete("../outside.png").await;
    }
}
