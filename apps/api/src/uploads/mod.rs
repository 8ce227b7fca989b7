//! Upload Handler: names, writes and reads back resume files.
//!
//! Storage names are `<clock millis><original extension>`. Two uploads that
//! share an extension and arrive within the same millisecond get the same
//! name, and the later write replaces the earlier file without an error.
//! This is accepted behavior; see `tests/api.rs` for the pinned-clock case.
//!
//! Anything in the directory is served back by name with no access control.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::AppError;

/// A file part lifted out of a multipart submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied file name, used only for its extension.
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct UploadStore {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    /// Creates the storage directory if it is missing. Called once at startup.
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        info!("Upload directory ready at {}", self.dir.display());
        Ok(())
    }

    /// Whether the storage directory is present. Read by `/health`.
    pub async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.dir)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    /// Storage name for a file called `original_name`, at the clock's current
    /// instant.
    pub fn storage_name(&self, original_name: &str) -> String {
        format!("{}{}", self.clock.now_millis(), extension_of(original_name))
    }

    /// Writes `file` (if any) and returns its storage name, or `""` when there
    /// was nothing to write.
    pub async fn store(&self, file: Option<UploadedFile>) -> Result<String, AppError> {
        let Some(file) = file else {
            return Ok(String::new());
        };

        let name = self.storage_name(&file.file_name);
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|source| AppError::StorageWrite {
                name: name.clone(),
                source,
            })?;

        debug!("Stored {} bytes as {}", file.bytes.len(), path.display());
        Ok(name)
    }

    /// Reads a stored file back. `Ok(None)` when the name is not a plain file
    /// name or nothing is stored under it.
    pub async fn read(&self, name: &str) -> std::io::Result<Option<Vec<u8>>> {
        if !is_plain_file_name(name) {
            return Ok(None);
        }
        let path = self.dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        }
        tokio::fs::read(path).await.map(Some)
    }
}

/// Extension of the final path component, dot included, case preserved.
/// `"cv.PDF"` -> `".PDF"`, `"README"` -> `""`, `".bashrc"` -> `""`.
pub fn extension_of(original_name: &str) -> String {
    let base = original_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(original_name);
    Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn store_at(dir: &Path, millis: i64) -> UploadStore {
        UploadStore::new(dir, Arc::new(FixedClock::new(millis)))
    }

    fn file(name: &str, bytes: &'static [u8]) -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: name.to_string(),
            bytes: Bytes::from_static(bytes),
        })
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("cv.pdf"), ".pdf");
        assert_eq!(extension_of("cv.final.PDF"), ".PDF");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".bashrc"), "");
        assert_eq!(extension_of("C:\\docs\\cv.docx"), ".docx");
        assert_eq!(extension_of("../../etc/passwd"), "");
    }

    #[test]
    fn test_storage_name_is_millis_plus_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), 1_700_000_000_123);
        assert_eq!(store.storage_name("resume.pdf"), "1700000000123.pdf");
        assert_eq!(store.storage_name("resume"), "1700000000123");
    }

    #[tokio::test]
    async fn test_no_file_yields_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), 1);
        assert_eq!(store.store(None).await.unwrap(), "");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_store_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), 42);
        let name = store.store(file("cv.pdf", b"%PDF-1.4")).await.unwrap();
        assert_eq!(name, "42.pdf");
        assert_eq!(store.read(&name).await.unwrap().unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_same_instant_same_extension_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), 7);
        let first = store.store(file("a.pdf", b"first")).await.unwrap();
        let second = store.store(file("b.pdf", b"second")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.read(&first).await.unwrap().unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_write_failure_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("missing"), 7);
        let err = store.store(file("a.pdf", b"x")).await.unwrap_err();
        assert!(matches!(err, AppError::StorageWrite { ref name, .. } if name == "7.pdf"));
    }

    #[tokio::test]
    async fn test_read_rejects_non_plain_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path(), 1);
        for name in ["", ".", "..", "../secret", "a/b", "a\\b"] {
            assert!(store.read(name).await.unwrap().is_none(), "{name:?}");
        }
        assert!(store.read("absent.pdf").await.unwrap().is_none());
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("a").join("uploads"), 1);
        store.ensure_dir().unwrap();
        assert!(dir.path().join("a").join("uploads").is_dir());
        store.ensure_dir().unwrap();
    }

    #[tokio::test]
    async fn test_availability_follows_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(&dir.path().join("uploads"), 1);
        assert!(!store.is_available().await);
        store.ensure_dir().unwrap();
        assert!(store.is_available().await);
    }
}
