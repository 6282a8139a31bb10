use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppResult, forms::UploadedFile};

pub const MOVIES_CONTAINER: &str = "movies";
pub const ACTORS_CONTAINER: &str = "actors";

/// Persists uploaded images and hands back the public location they are served from.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn save(&self, container: &str, file: &UploadedFile) -> AppResult<String>;

    /// Empty or absent paths are a no-op, as is a path whose file is already gone.
    async fn delete(&self, path: Option<&str>, container: &str) -> AppResult<()>;

    async fn edit(
        &self,
        container: &str,
        old_path: Option<&str>,
        file: &UploadedFile,
    ) -> AppResult<String> {
        self.delete(old_path, container).await?;
        self.save(container, file).await
    }
}

/// Writes files under `root/<container>/` and returns URLs below `public_url`.
#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self { root: root.into(), public_url: public_url.into().trim_end_matches('/').to_string() }
    }

    #[cfg(test)]
    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, container: &str, file: &UploadedFile) -> AppResult<String> {
        let dir = self.root.join(container);
        tokio::fs::create_dir_all(&dir).await?;

        let name = format!("{}{}", Uuid::new_v4(), file.extension().unwrap_or_default());
        tokio::fs::write(dir.join(&name), &file.bytes).await?;

        debug!(container, file = %name, size = file.bytes.len(), "stored file");
        Ok(format!("{}/{container}/{name}", self.public_url))
    }

    async fn delete(&self, path: Option<&str>, container: &str) -> AppResult<()> {
        let Some(path) = path.filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        let Some(name) = stored_file_name(path) else {
            debug!(path, "ignoring delete of unrecognised file path");
            return Ok(());
        };

        match tokio::fs::remove_file(self.root.join(container).join(name)).await {
            Ok(()) => {
                debug!(container, file = name, "deleted file");
                Ok(())
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Last path segment of a stored URL, refusing anything that could escape the container.
fn stored_file_name(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next()?;
    let safe = !name.is_empty() && !name.starts_with('.') && !name.contains('\\');
    safe.then_some(name)
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;

    use super::*;

    fn upload(name: &str, body: &'static [u8]) -> UploadedFile {
        UploadedFile { file_name: name.to_string(), bytes: Bytes::from_static(body) }
    }

    fn local_path(storage: &LocalFileStorage, container: &str, url: &str) -> PathBuf {
        storage.root().join(container).join(stored_file_name(url).unwrap())
    }

    #[tokio::test]
    async fn save_writes_under_container_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "http://localhost:3000/files/");

        let url = storage.save(MOVIES_CONTAINER, &upload("poster.png", b"png")).await.unwrap();

        assert!(url.starts_with("http://localhost:3000/files/movies/"));
        assert!(url.ends_with(".png"));
        let stored = tokio::fs::read(local_path(&storage, MOVIES_CONTAINER, &url)).await.unwrap();
        assert_eq!(stored, b"png");
    }

    #[tokio::test]
    async fn edit_replaces_the_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/files");

        let old = storage.save(ACTORS_CONTAINER, &upload("a.jpg", b"old")).await.unwrap();
        let new = storage.edit(ACTORS_CONTAINER, Some(&old), &upload("b.jpg", b"new")).await.unwrap();

        assert_ne!(old, new);
        assert!(!local_path(&storage, ACTORS_CONTAINER, &old).exists());
        assert!(local_path(&storage, ACTORS_CONTAINER, &new).exists());
    }

    #[tokio::test]
    async fn delete_tolerates_missing_and_empty_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path(), "/files");

        storage.delete(None, MOVIES_CONTAINER).await.unwrap();
        storage.delete(Some(""), MOVIES_CONTAINER).await.unwrap();
        storage.delete(Some("/files/movies/gone.png"), MOVIES_CONTAINER).await.unwrap();
        storage.delete(Some("/files/movies/.."), MOVIES_CONTAINER).await.unwrap();
    }

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(stored_file_name("http://x/files/movies/abc.png"), Some("abc.png"));
        assert_eq!(stored_file_name("abc.png"), Some("abc.png"));
        assert_eq!(stored_file_name("/files/movies/"), None);
        assert_eq!(stored_file_name("../.env"), None);
    }
}
