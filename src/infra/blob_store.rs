// ============================================================
// Layer 6 — Blob Stores
// ============================================================
// Implementations of the BlobStore trait from Layer 3:
//
//   LocalBlobStore   — a bucket is a directory, a key is a
//                      relative path inside it
//   MemoryBlobStore  — a HashMap behind a Mutex, for tests and
//                      dry runs
//   TimeoutBlobStore — wraps any store and bounds every call
//
// None of them retry. A failed call reports straight away.
//
// Local writes are atomic: the bytes go to a temporary file in
// the destination directory, then rename() moves it over the
// key. A reader sees the old blob or the new one, never half of
// either.
//
// Reference: Rust Book §9 (Error Handling)
//            Rust Book §16 (Fearless Concurrency)

use std::{
    collections::HashMap,
    fs, io,
    path::{Component, Path, PathBuf},
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc, Arc, Mutex,
    },
    thread,
    time::Duration,
};

use crate::domain::error::StorageError;
use crate::domain::traits::BlobStore;

// ─── Well-known keys ──────────────────────────────────────────────────────────
pub const MODEL_KEY:           &str = "models/sentiment_model.bin";
pub const TOKENIZER_KEY:       &str = "models/tokenizer.json";
pub const METRICS_KEY:         &str = "models/evaluation_results.json";
pub const RAW_CORPUS_KEY:      &str = "data/raw/amazon_polarity.jsonl";
pub const CLEANED_CORPUS_KEY:  &str = "data/processed/amazon_polarity_cleaned.jsonl";

/// Default bound on a single blob call.
pub const DEFAULT_BLOB_TIMEOUT: Duration = Duration::from_secs(30);

// ─── LocalBlobStore ───────────────────────────────────────────────────────────
pub struct LocalBlobStore {
    root: PathBuf,
}

/// Distinguishes temp files written concurrently by one process.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

impl LocalBlobStore {
    /// Open a bucket rooted at `root`. The directory is created on
    /// first write, not here, so a missing bucket reads as NotFound.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path, rejecting keys that would escape the root.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        let safe = !key.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(StorageError::unavailable(key, "invalid blob key"));
        }
        Ok(self.root.join(rel))
    }
}

impl BlobStore for LocalBlobStore {
    fn get_blob(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!("Read blob '{}' ({} bytes)", key, bytes.len());
                Ok(bytes)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::unavailable(key, e)),
        }
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let dir  = path.parent().unwrap_or(self.root.as_path());
        fs::create_dir_all(dir).map_err(|e| StorageError::unavailable(key, e))?;

        // ── Write to a sibling temp file, then rename over the key ────────────
        let n   = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = dir.join(format!(".upload-{}-{}.tmp", std::process::id(), n));

        let result = fs::write(&tmp, bytes).and_then(|_| fs::rename(&tmp, &path));
        if let Err(e) = result {
            let _ = fs::remove_file(&tmp);
            return Err(StorageError::unavailable(key, e));
        }

        tracing::debug!("Wrote blob '{}' ({} bytes)", key, bytes.len());
        Ok(())
    }
}

// ─── MemoryBlobStore ──────────────────────────────────────────────────────────
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().map(|b| b.contains_key(key)).unwrap_or(false)
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_blob(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let blobs = self.blobs.lock()
            .map_err(|_| StorageError::unavailable(key, "store lock poisoned"))?;
        blobs.get(key).cloned().ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let mut blobs = self.blobs.lock()
            .map_err(|_| StorageError::unavailable(key, "store lock poisoned"))?;
        blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

// ─── TimeoutBlobStore ─────────────────────────────────────────────────────────
/// Runs each call on a helper thread and gives up after `timeout`.
/// An expired call reports Unavailable. The helper thread is left
/// to finish on its own and its result is discarded.
pub struct TimeoutBlobStore {
    inner:   Arc<dyn BlobStore>,
    timeout: Duration,
}

impl TimeoutBlobStore {
    pub fn new(inner: Arc<dyn BlobStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    fn bounded<T, F>(&self, key: &str, call: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn BlobStore) -> Result<T, StorageError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let inner    = Arc::clone(&self.inner);
        thread::Builder::new()
            .name("blob-call".into())
            .spawn(move || {
                let _ = tx.send(call(inner.as_ref()));
            })
            .map_err(|e| StorageError::unavailable(key, e))?;

        match rx.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!("Blob call for '{}' timed out after {:?}", key, self.timeout);
                Err(StorageError::unavailable(key, format!("timed out after {:?}", self.timeout)))
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Err(StorageError::unavailable(key, "blob call thread panicked"))
            }
        }
    }
}

impl BlobStore for TimeoutBlobStore {
    fn get_blob(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let owned = key.to_string();
        self.bounded(key, move |store| store.get_blob(&owned))
    }

    fn put_blob(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let owned = key.to_string();
        let bytes = bytes.to_vec();
        self.bounded(key, move |store| store.put_blob(&owned, &bytes))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    struct SlowStore(Duration);

    impl BlobStore for SlowStore {
        fn get_blob(&self, _key: &str) -> Result<Vec<u8>, StorageError> {
            thread::sleep(self.0);
            Ok(vec![1])
        }

        fn put_blob(&self, _key: &str, _bytes: &[u8]) -> Result<(), StorageError> {
            thread::sleep(self.0);
            Ok(())
        }
    }

    #[test]
    fn test_local_round_trip_creates_directories() {
        let dir   = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.put_blob(MODEL_KEY, b"weights").unwrap();
        assert_eq!(store.get_blob(MODEL_KEY).unwrap(), b"weights");
        assert!(dir.path().join("models").is_dir());
    }

    #[test]
    fn test_local_overwrite_leaves_no_temp_files() {
        let dir   = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        store.put_blob("models/a.json", b"one").unwrap();
        store.put_blob("models/a.json", b"two").unwrap();
        assert_eq!(store.get_blob("models/a.json").unwrap(), b"two");

        let names: Vec<_> = fs::read_dir(dir.path().join("models")).unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_local_missing_key_is_not_found() {
        let dir   = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("no-bucket"));
        let err   = store.get_blob(METRICS_KEY).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_local_rejects_escaping_keys() {
        let dir   = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path());
        for key in ["../outside", "/etc/passwd", ""] {
            assert!(matches!(
                store.put_blob(key, b"x"),
                Err(StorageError::Unavailable { .. })
            ));
        }
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryBlobStore::new();
        assert!(store.get_blob("k").unwrap_err().is_not_found());
        store.put_blob("k", b"v").unwrap();
        assert!(store.contains("k"));
        assert_eq!(store.get_blob("k").unwrap(), b"v");
    }

    #[test]
    fn test_timeout_expires_as_unavailable() {
        let slow  = Arc::new(SlowStore(Duration::from_millis(500)));
        let store = TimeoutBlobStore::new(slow, Duration::from_millis(20));
        assert!(matches!(store.get_blob("k"), Err(StorageError::Unavailable { .. })));
        assert!(matches!(store.put_blob("k", b"v"), Err(StorageError::Unavailable { .. })));
    }

    #[test]
    fn test_timeout_passes_through_fast_calls() {
        let inner = Arc::new(MemoryBlobStore::new());
        inner.put_blob("k", b"v").unwrap();
        let store = TimeoutBlobStore::new(inner, DEFAULT_BLOB_TIMEOUT);
        assert_eq!(store.get_blob("k").unwrap(), b"v");
        assert!(store.get_blob("missing").unwrap_err().is_not_found());
    }
}
