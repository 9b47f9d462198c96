//! Product image storage on the local filesystem.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;
use uuid::Uuid;

/// Accepted image extensions.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Errors from storing or locating product images.
#[derive(Debug, Error)]
pub enum FileError {
    /// Upload missing or not an accepted image type.
    #[error("Make sure that the file is an image")]
    NotAnImage,

    /// No stored image with this name (or the name is not a plain file name).
    #[error("No product found with image {0}")]
    NotFound(String),

    /// Filesystem failure.
    #[error("file storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores uploaded product images under a single directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    api_url: String,
}

impl FileStore {
    /// Create a store rooted at `dir`, building public URLs from `api_url`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, api_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            api_url: api_url.into(),
        }
    }

    /// Directory holding the stored images.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an image under a fresh `<uuid>.<ext>` name and return the name.
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotAnImage` for an unaccepted or empty upload and
    /// `FileError::Io` if the file cannot be written.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn save(&self, extension: &str, bytes: &[u8]) -> Result<String, FileError> {
        let extension = extension.to_ascii_lowercase();
        if bytes.is_empty() || !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FileError::NotAnImage);
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&name), bytes).await?;

        tracing::info!(file = %name, "Stored product image");
        Ok(name)
    }

    /// Public URL under which a stored image is served.
    #[must_use]
    pub fn secure_url(&self, name: &str) -> String {
        format!("{}/files/product/{name}", self.api_url)
    }

    /// Path of a stored image, if `name` is a plain file name that exists.
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotFound` for path-like names or missing files.
    pub async fn locate(&self, name: &str) -> Result<PathBuf, FileError> {
        if !is_plain_file_name(name) {
            return Err(FileError::NotFound(name.to_owned()));
        }

        let path = self.dir.join(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(FileError::NotFound(name.to_owned())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FileError::NotFound(name.to_owned()))
            }
            Err(e) => Err(FileError::Io(e)),
        }
    }
}

/// Pick the stored extension for an upload.
///
/// The content type's subtype wins (`image/png` gives `png`); the file name's
/// extension is the fallback. Returns `None` if neither names an image type.
#[must_use]
pub fn image_extension(content_type: Option<&str>, file_name: Option<&str>) -> Option<String> {
    let from_mime = content_type
        .and_then(|ct| ct.split_once('/'))
        .map(|(_, subtype)| subtype.split(';').next().unwrap_or(subtype).trim().to_ascii_lowercase());
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    [from_mime, from_name]
        .into_iter()
        .flatten()
        .find(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && name != "."
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("catalog-files-{}", Uuid::new_v4()));
        FileStore::new(dir, "http://localhost:3000/api")
    }

    #[test]
    fn test_image_extension_prefers_content_type() {
        assert_eq!(
            image_extension(Some("image/png"), Some("photo.jpg")).as_deref(),
            Some("png")
        );
        assert_eq!(
            image_extension(Some("image/jpeg"), None).as_deref(),
            Some("jpeg")
        );
    }

    #[test]
    fn test_image_extension_falls_back_to_file_name() {
        assert_eq!(
            image_extension(Some("application/octet-stream"), Some("Photo.GIF")).as_deref(),
            Some("gif")
        );
        assert_eq!(image_extension(None, Some("a.jpg")).as_deref(), Some("jpg"));
    }

    #[test]
    fn test_image_extension_rejects_non_images() {
        assert_eq!(image_extension(Some("application/pdf"), Some("doc.pdf")), None);
        assert_eq!(image_extension(None, Some("noext")), None);
        assert_eq!(image_extension(None, None), None);
    }

    #[test]
    fn test_plain_file_name() {
        assert!(is_plain_file_name("0b7c.jpg"));
        assert!(!is_plain_file_name("../secret.jpg"));
        assert!(!is_plain_file_name("a/b.jpg"));
        assert!(!is_plain_file_name("a\\b.jpg"));
        assert!(!is_plain_file_name(""));
    }

    #[test]
    fn test_secure_url() {
        let store = temp_store();
        assert_eq!(
            store.secure_url("x.png"),
            "http://localhost:3000/api/files/product/x.png"
        );
    }

    #[tokio::test]
    async fn test_save_then_locate() {
        let store = temp_store();
        let name = store.save("PNG", b"\x89PNG").await.unwrap();
        assert!(name.ends_with(".png"));

        let path = store.locate(&name).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"\x89PNG");

        tokio::fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_rejects_non_image() {
        let store = temp_store();
        assert!(matches!(
            store.save("pdf", b"%PDF").await,
            Err(FileError::NotAnImage)
        ));
        assert!(matches!(store.save("png", b"").await, Err(FileError::NotAnImage)));
    }

    #[tokio::test]
    async fn test_locate_missing_and_traversal() {
        let store = temp_store();
        assert!(matches!(
            store.locate("missing.png").await,
            Err(FileError::NotFound(_))
        ));
        assert!(matches!(
            store.locate("../Cargo.toml").await,
            Err(FileError::NotFound(_))
        ));
    }
}
