//! Upload Service - stores uploaded images under the content root
//!
//! Files are streamed to a hidden temporary file and renamed into place once
//! fully written, so a stored name never points at a partial file.

use futures::{Stream, StreamExt};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::domain::DomainError;

/// URL prefix under which the content root is served
pub const PUBLIC_PREFIX: &str = "/uploads";

const FALLBACK_NAME: &str = "upload";

/// Removes the temporary file unless the upload completed.
/// Also covers the handler future being dropped mid-stream.
struct PartialFile {
    path: PathBuf,
    committed: bool,
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the content root if it doesn't exist
    pub async fn ensure_root(&self) -> Result<(), DomainError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Stream `chunks` to disk and return the public path of the stored file.
    pub async fn store<S, B, E>(&self, original_name: &str, chunks: S) -> Result<String, DomainError>
    where
        S: Stream<Item = Result<B, E>>,
        B: AsRef<[u8]>,
        E: Into<DomainError>,
    {
        let final_name = storage_name(original_name);
        let mut partial = PartialFile {
            path: self.root.join(format!(".{}.part", uuid::Uuid::new_v4())),
            committed: false,
        };

        let written = write_chunks(&partial.path, chunks).await.map_err(|e| {
            tracing::error!("Failed to store upload '{}': {}", original_name, e);
            e
        })?;

        fs::rename(&partial.path, self.root.join(&final_name)).await?;
        partial.committed = true;

        tracing::info!("Stored upload {} ({} bytes)", final_name, written);
        Ok(format!("{}/{}", PUBLIC_PREFIX, final_name))
    }

    /// Map a public path back to a file under the content root.
    /// Returns `None` for anything that would escape the root.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)?
            .strip_prefix('/')?;

        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return None;
        }

        Some(self.root.join(name))
    }

    /// Delete a stored file. Returns whether a file was removed.
    pub async fn remove(&self, public_path: &str) -> Result<bool, DomainError> {
        let Some(path) = self.resolve(public_path) else {
            tracing::warn!("Refusing to remove '{}': not an upload path", public_path);
            return Ok(false);
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!("Removed upload {}", public_path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort `remove` for cleanup paths: failures are logged, not returned
    pub async fn discard(&self, public_path: &str) {
        if let Err(e) = self.remove(public_path).await {
            tracing::warn!("Failed to remove upload {}: {}", public_path, e);
        }
    }
}

async fn write_chunks<S, B, E>(path: &Path, chunks: S) -> Result<u64, DomainError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DomainError>,
{
    let mut chunks = std::pin::pin!(chunks);
    let mut file = fs::File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(Into::<DomainError>::into)?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        written += bytes.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;

    Ok(written)
}

/// `<unix-millis>_<original-filename>`, keeping only the final path component.
/// Characters outside `[A-Za-z0-9._-]` become `_` so the public path needs no escaping.
pub fn storage_name(original_name: &str) -> String {
    format!(
        "{}_{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(original_name)
    )
}

fn sanitize_file_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return FALLBACK_NAME.to_string();
    }

    base.chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("contact_uploads_{}", uuid::Uuid::new_v4()))
    }

    fn dir_entries(root: &Path) -> Vec<String> {
        std::fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\face.png"), "face.png");
        assert_eq!(sanitize_file_name("avatar.jpg"), "avatar.jpg");
        assert_eq!(sanitize_file_name("photos/"), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[test]
    fn sanitize_replaces_url_unsafe_characters() {
        assert_eq!(sanitize_file_name("x%41.png"), "x_41.png");
        assert_eq!(sanitize_file_name("a?b.png"), "a_b.png");
        assert_eq!(sanitize_file_name("c#d.png"), "c_d.png");
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_file_name("café.png"), "caf_.png");
        assert_eq!(sanitize_file_name("my-pic_2.v1.png"), "my-pic_2.v1.png");
    }

    #[test]
    fn storage_name_is_timestamp_prefixed() {
        let name = storage_name("me.png");
        let (stamp, rest) = name.split_once('_').unwrap();
        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(rest, "me.png");
    }

    #[test]
    fn resolve_rejects_escapes() {
        let store = UploadStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("/uploads/1_a.png"),
            Some(PathBuf::from("/srv/uploads/1_a.png"))
        );
        assert_eq!(store.resolve("/uploads/../secret"), None);
        assert_eq!(store.resolve("/uploads/.."), None);
        assert_eq!(store.resolve("/elsewhere/a.png"), None);
        assert_eq!(store.resolve("/uploads/"), None);
    }

    #[tokio::test]
    async fn store_writes_all_chunks() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        store.ensure_root().await.unwrap();

        let chunks = stream::iter(vec![
            Ok::<_, std::io::Error>(b"hello ".to_vec()),
            Ok(b"world".to_vec()),
        ]);
        let public = store.store("greeting.txt", chunks).await.unwrap();

        assert!(public.starts_with("/uploads/"));
        assert!(public.ends_with("_greeting.txt"));
        let path = store.resolve(&public).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"hello world");
        assert_eq!(dir_entries(&root).len(), 1);

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn failed_stream_leaves_no_file() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        store.ensure_root().await.unwrap();

        let chunks = stream::iter(vec![
            Ok(b"partial".to_vec()),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )),
        ]);
        let err = store.store("broken.png", chunks).await.unwrap_err();

        assert!(matches!(err, DomainError::Upload(ref msg) if msg.contains("connection reset")));
        assert!(dir_entries(&root).is_empty());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn remove_reports_missing_files() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        store.ensure_root().await.unwrap();

        let chunks = stream::iter(vec![Ok::<_, std::io::Error>(vec![1u8, 2, 3])]);
        let public = store.store("x.bin", chunks).await.unwrap();

        assert!(store.remove(&public).await.unwrap());
        assert!(!store.remove(&public).await.unwrap());
        assert!(!store.remove("/etc/passwd").await.unwrap());

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn discard_tolerates_missing_and_foreign_paths() {
        let root = temp_root();
        let store = UploadStore::new(&root);
        store.ensure_root().await.unwrap();

        let chunks = stream::iter(vec![Ok::<_, std::io::Error>(vec![7u8])]);
        let public = store.store("y.bin", chunks).await.unwrap();

        store.discard(&public).await;
        assert!(dir_entries(&root).is_empty());

        store.discard(&public).await;
        store.discard("/etc/passwd").await;

        std::fs::remove_dir_all(root).unwrap();
    }
}
