//! Durable on-disk storage for encoded OCR results
//!
//! Entries are immutable once written: a key is only ever written with the
//! canonical encoding of the one result its content derives, so re-writing
//! an existing entry with identical bytes is harmless and reads never need
//! locking. Writes go to a temporary sibling first and are renamed into
//! place, so a concurrent reader sees either a complete entry or none.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use crate::errors::CacheError;

use super::key::ContentKey;

/// File store mapping content keys to persisted cache entries.
#[derive(Debug, Clone)]
pub struct OcrCacheStorage {
    cache_dir: PathBuf,
}

impl OcrCacheStorage {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Whether an entry for `key` is currently persisted.
    ///
    /// Best-effort hint: an entry may appear or (under external purging)
    /// disappear between this check and a subsequent read.
    pub async fn exists(&self, key: &ContentKey) -> bool {
        fs::try_exists(self.entry_path(key)).await.unwrap_or(false)
    }

    /// Read the persisted canonical JSON bytes for `key`.
    pub async fn read(&self, key: &ContentKey) -> Result<Vec<u8>, CacheError> {
        match fs::read(self.entry_path(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(CacheError::NotFound {
                key: key.to_string(),
            }),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    /// Persist `bytes` under `key`, creating the cache directory on first
    /// use.
    ///
    /// The content lands under its final name only once fully written
    /// (write to `.tmp`, then rename), so concurrent readers of the same
    /// key observe "not yet present" rather than a partial entry.
    pub async fn write(&self, key: &ContentKey, bytes: &[u8]) -> Result<(), CacheError> {
        if !fs::try_exists(&self.cache_dir).await.unwrap_or(false) {
            fs::create_dir_all(&self.cache_dir).await?;
        }

        // Staging names are unique per write: overlapping writers for the
        // same key (entries are immutable, so their content is identical)
        // each rename their own complete file instead of racing on one
        static TMP_SEQ: AtomicU64 = AtomicU64::new(0);
        let final_path = self.entry_path(key);
        let tmp_path = final_path.with_extension(format!(
            "json.{}.{}.tmp",
            std::process::id(),
            TMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&tmp_path, bytes).await?;
        fs::rename(&tmp_path, &final_path).await?;
        Ok(())
    }

    fn entry_path(&self, key: &ContentKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, OcrCacheStorage) {
        let dir = TempDir::new().unwrap();
        let storage = OcrCacheStorage::new(dir.path().join("_cache"));
        (dir, storage)
    }

    #[tokio::test]
    async fn test_write_then_read_round_trips() {
        let (_dir, storage) = storage();
        let key = ContentKey::derive(b"some image");

        assert!(!storage.exists(&key).await);
        storage.write(&key, b"{\"blocks\":[]}").await.unwrap();
        assert!(storage.exists(&key).await);
        assert_eq!(storage.read(&key).await.unwrap(), b"{\"blocks\":[]}");
    }

    #[tokio::test]
    async fn test_read_missing_entry_is_not_found() {
        let (_dir, storage) = storage();
        let key = ContentKey::derive(b"never written");

        match storage.read(&key).await {
            Err(CacheError::NotFound { key: k }) => assert_eq!(k, key.to_string()),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_write_creates_cache_dir_lazily() {
        let (dir, storage) = storage();
        assert!(!storage.cache_dir().exists());

        let key = ContentKey::derive(b"first entry");
        storage.write(&key, b"{}").await.unwrap();
        assert!(storage.cache_dir().exists());
        assert!(dir.path().join("_cache").join(key.file_name()).exists());
    }

    #[tokio::test]
    async fn test_write_leaves_no_temporary_files() {
        let (_dir, storage) = storage();
        let key = ContentKey::derive(b"entry");
        storage.write(&key, b"{}").await.unwrap();

        let mut entries = fs::read_dir(storage.cache_dir()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().into_string().unwrap());
        }
        assert_eq!(names, vec![key.file_name()]);
    }

    #[tokio::test]
    async fn test_rewrite_with_identical_content_is_harmless() {
        let (_dir, storage) = storage();
        let key = ContentKey::derive(b"entry");
        storage.write(&key, b"{\"img_width\":3}").await.unwrap();
        storage.write(&key, b"{\"img_width\":3}").await.unwrap();
        assert_eq!(storage.read(&key).await.unwrap(), b"{\"img_width\":3}");
    }

    #[tokio::test]
    async fn test_overlapping_writes_for_the_same_key_both_succeed() {
        let (_dir, storage) = storage();
        let key = ContentKey::derive(b"entry");

        // Same key means same content; neither writer may fail or leave a
        // staging file behind
        let (a, b) = tokio::join!(
            storage.write(&key, b"{\"img_width\":3}"),
            storage.write(&key, b"{\"img_width\":3}"),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(storage.read(&key).await.unwrap(), b"{\"img_width\":3}");
        let mut entries = fs::read_dir(storage.cache_dir()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().into_string().unwrap());
        }
        assert_eq!(names, vec![key.file_name()]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_for_distinct_keys() {
        let (_dir, storage) = storage();
        let mut handles = Vec::new();
        for i in 0..16u32 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                let body = format!("{{\"n\":{i}}}").into_bytes();
                let key = ContentKey::derive(&body);
                storage.write(&key, &body).await.unwrap();
                (key, body)
            }));
        }
        for handle in handles {
            let (key, body) = handle.await.unwrap();
            assert_eq!(storage.read(&key).await.unwrap(), body);
        }
    }
}
