//! Filesystem-backed image store.
//!
//! Layout under the base directory:
//!
//! ```text
//! {base}/before/      pending images
//! {base}/displaying/  the image on screen
//! {base}/done/        archive
//! ```
//!
//! Bucket changes are single `rename` calls, which are atomic as long as the
//! three directories share one filesystem.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use weddingwall_core::storage::image_store::ImageStore;
use weddingwall_types::bucket::Bucket;
use weddingwall_types::error::StorageError;
use weddingwall_types::image::{oldest_of, ImageName, StoredImage};

/// Image store over three sibling directories.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    base_dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory backing a bucket: `{base}/{dir_name}`.
    pub fn bucket_dir(&self, bucket: Bucket) -> PathBuf {
        self.base_dir.join(bucket.dir_name())
    }

    fn image_path(&self, bucket: Bucket, name: &ImageName) -> PathBuf {
        self.bucket_dir(bucket).join(name.as_str())
    }

    /// Create all three bucket directories.
    pub async fn ensure_layout(&self) -> Result<(), StorageError> {
        for bucket in Bucket::ALL {
            let dir = self.bucket_dir(bucket);
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| io_error("create", &dir, e))?;
        }
        Ok(())
    }

    async fn stat(&self, name: &ImageName, bucket: Bucket) -> Result<StoredImage, StorageError> {
        let path = self.image_path(bucket, name);
        let meta = tokio::fs::metadata(&path)
            .await
            .map_err(|e| not_found_or_io(e, name, bucket, &path))?;
        let created_at = creation_time(&meta).map_err(|e| io_error("stat", &path, e))?;
        Ok(StoredImage {
            name: name.clone(),
            bucket,
            created_at,
            size_bytes: meta.len(),
        })
    }
}

impl ImageStore for LocalImageStore {
    async fn list(&self, bucket: Bucket) -> Result<Vec<StoredImage>, StorageError> {
        let dir = self.bucket_dir(bucket);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(bucket = %bucket, "bucket directory missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_error("list", &dir, e)),
        };

        let mut images = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("list", &dir, e))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            // Skips hidden temp files and anything that is not a .jpg.
            let Ok(name) = ImageName::parse(file_name) else {
                continue;
            };

            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    tracing::error!(image = %name, bucket = %bucket, error = %e, "failed to stat image, skipping");
                    continue;
                }
            };
            if !meta.is_file() {
                continue;
            }
            let created_at = match creation_time(&meta) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!(image = %name, bucket = %bucket, error = %e, "no usable timestamp, skipping");
                    continue;
                }
            };

            images.push(StoredImage {
                name,
                bucket,
                created_at,
                size_bytes: meta.len(),
            });
        }
        Ok(images)
    }

    async fn list_oldest(&self, bucket: Bucket) -> Result<Option<StoredImage>, StorageError> {
        Ok(oldest_of(self.list(bucket).await?))
    }

    async fn move_atomic(
        &self,
        name: &ImageName,
        from: Bucket,
        to: Bucket,
    ) -> Result<StoredImage, StorageError> {
        let src = self.image_path(from, name);
        let dest_dir = self.bucket_dir(to);
        tokio::fs::create_dir_all(&dest_dir)
            .await
            .map_err(|e| io_error("create", &dest_dir, e))?;

        let dest = dest_dir.join(name.as_str());
        tokio::fs::rename(&src, &dest)
            .await
            .map_err(|e| not_found_or_io(e, name, from, &src))?;
        tracing::debug!(image = %name, from = %from, to = %to, "renamed image");

        self.stat(name, to).await
    }

    async fn read_bytes(&self, name: &ImageName, bucket: Bucket) -> Result<Vec<u8>, StorageError> {
        let path = self.image_path(bucket, name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| not_found_or_io(e, name, bucket, &path))
    }

    async fn write_new(
        &self,
        bucket: Bucket,
        name: &ImageName,
        data: &[u8],
    ) -> Result<StoredImage, StorageError> {
        let dir = self.bucket_dir(bucket);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_error("create", &dir, e))?;

        // Hidden temp name: never picked up by `list`.
        let tmp = dir.join(format!(".{name}.part"));
        let dest = dir.join(name.as_str());

        if let Err(e) = tokio::fs::write(&tmp, data).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error("write", &tmp, e));
        }
        if let Err(e) = tokio::fs::rename(&tmp, &dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error("rename", &dest, e));
        }

        self.stat(name, bucket).await
    }
}

/// Birth time where the platform records it, otherwise modification time.
fn creation_time(meta: &std::fs::Metadata) -> std::io::Result<DateTime<Utc>> {
    let time: SystemTime = meta.created().or_else(|_| meta.modified())?;
    Ok(DateTime::<Utc>::from(time))
}

fn io_error(op: &str, path: &Path, e: std::io::Error) -> StorageError {
    StorageError::Io(format!("{op} {}: {e}", path.display()))
}

fn not_found_or_io(e: std::io::Error, name: &ImageName, bucket: Bucket, path: &Path) -> StorageError {
    if e.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound {
            name: name.to_string(),
            bucket,
        }
    } else {
        io_error("access", path, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::tempdir;
    use weddingwall_core::rotation::service::{PollOutcome, RotationService};

    fn name(s: &str) -> ImageName {
        ImageName::parse(s).unwrap()
    }

    fn names(images: &[StoredImage]) -> Vec<String> {
        let mut names: Vec<String> = images.iter().map(|i| i.name.to_string()).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_missing_bucket_lists_empty() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path().join("never-created"));
        for bucket in Bucket::ALL {
            assert!(store.list(bucket).await.unwrap().is_empty());
            assert!(store.list_oldest(bucket).await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_ensure_layout_creates_bucket_dirs() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store.ensure_layout().await.unwrap();
        assert!(dir.path().join("before").is_dir());
        assert!(dir.path().join("displaying").is_dir());
        assert!(dir.path().join("done").is_dir());
    }

    #[tokio::test]
    async fn test_list_filters_non_jpg_and_hidden() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        let before = store.bucket_dir(Bucket::Pending);
        std::fs::create_dir_all(before.join("nested.jpg")).unwrap();
        for file in ["a.jpg", "B.JPG", "notes.txt", "c.png", ".d.jpg.part", ".hidden.jpg"] {
            std::fs::write(before.join(file), b"x").unwrap();
        }

        let listed = store.list(Bucket::Pending).await.unwrap();
        assert_eq!(names(&listed), vec!["B.JPG", "a.jpg"]);
        assert!(listed.iter().all(|i| i.bucket == Bucket::Pending));
    }

    #[tokio::test]
    async fn test_write_new_then_read() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        let stored = store
            .write_new(Bucket::Pending, &name("20250601-1430-abc123.jpg"), b"jpeg bytes")
            .await
            .unwrap();

        assert_eq!(stored.size_bytes, 10);
        assert_eq!(stored.bucket, Bucket::Pending);
        let bytes = store.read_bytes(&stored.name, Bucket::Pending).await.unwrap();
        assert_eq!(bytes, b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_write_new_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store
            .write_new(Bucket::Pending, &name("a.jpg"), b"x")
            .await
            .unwrap();

        let entries: Vec<String> = std::fs::read_dir(store.bucket_dir(Bucket::Pending))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec!["a.jpg"]);
    }

    #[tokio::test]
    async fn test_move_atomic_relocates_file() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store
            .write_new(Bucket::Pending, &name("a.jpg"), b"payload")
            .await
            .unwrap();

        // Displaying does not exist yet; the move creates it.
        let moved = store
            .move_atomic(&name("a.jpg"), Bucket::Pending, Bucket::Displaying)
            .await
            .unwrap();
        assert_eq!(moved.bucket, Bucket::Displaying);
        assert!(store.list(Bucket::Pending).await.unwrap().is_empty());
        assert_eq!(
            store.read_bytes(&name("a.jpg"), Bucket::Displaying).await.unwrap(),
            b"payload"
        );
    }

    #[tokio::test]
    async fn test_move_missing_image_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store.ensure_layout().await.unwrap();
        let err = store
            .move_atomic(&name("ghost.jpg"), Bucket::Pending, Bucket::Displaying)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_missing_image_is_not_found() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        let err = store
            .read_bytes(&name("ghost.jpg"), Bucket::Displaying)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { bucket: Bucket::Displaying, .. }));
    }

    #[tokio::test]
    async fn test_list_oldest_follows_creation_order() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        // Written in reverse lexical order so name order cannot mask the result.
        store.write_new(Bucket::Pending, &name("z.jpg"), b"1").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.write_new(Bucket::Pending, &name("a.jpg"), b"2").await.unwrap();

        let oldest = store.list_oldest(Bucket::Pending).await.unwrap().unwrap();
        assert_eq!(oldest.name, name("z.jpg"));
    }

    #[tokio::test]
    async fn test_rotation_over_filesystem() {
        let dir = tempdir().unwrap();
        let store = LocalImageStore::new(dir.path());
        store.write_new(Bucket::Pending, &name("a.jpg"), b"AAA").await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.write_new(Bucket::Pending, &name("b.jpg"), b"BBB").await.unwrap();
        let service = RotationService::new(store);

        let first = service.poll().await.unwrap();
        assert!(matches!(&first, PollOutcome::Rotated(img) if img.bytes == b"AAA"));
        let second = service.poll().await.unwrap();
        assert!(matches!(&second, PollOutcome::Rotated(img) if img.bytes == b"BBB"));
        let third = service.poll().await.unwrap();
        assert!(matches!(&third, PollOutcome::Reserved(img) if img.bytes == b"BBB"));

        assert!(dir.path().join("done").join("a.jpg").is_file());
        assert!(dir.path().join("displaying").join("b.jpg").is_file());
        assert!(!dir.path().join("before").join("b.jpg").exists());
    }

    #[tokio::test]
    async fn test_rotation_on_empty_base_is_empty() {
        let dir = tempdir().unwrap();
        let service = RotationService::new(LocalImageStore::new(dir.path()));
        assert_eq!(service.poll().await.unwrap(), PollOutcome::Empty);
    }
}
