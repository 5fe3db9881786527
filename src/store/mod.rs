//! Flat JSON document store.
//!
//! Every collection lives in one `<name>.json` file under the data directory.
//! Saves go through a temporary file plus rename so a reader only ever sees a
//! complete document, and read-modify-write cycles are serialized per
//! collection with an async mutex.

use std::{
    collections::HashMap,
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex as StdMutex},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::{
    fs,
    sync::{Mutex, OwnedMutexGuard},
};
use uuid::Uuid;

pub mod ids;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Items,
    Records,
    Cart(i64),
}

impl Collection {
    pub fn name(&self) -> String {
        match self {
            Collection::Users => "users".to_string(),
            Collection::Items => "items".to_string(),
            Collection::Records => "records".to_string(),
            Collection::Cart(user_id) => format!("cart_{user_id}"),
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access collection `{collection}`")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collection `{collection}` does not contain a valid document")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode collection `{collection}`")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(collection: &Collection, source: std::io::Error) -> Self {
        StoreError::Io {
            collection: collection.name(),
            source,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    data_dir: PathBuf,
    locks: StdMutex<HashMap<Collection, Arc<Mutex<()>>>>,
}

impl JsonStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                data_dir: data_dir.into(),
                locks: StdMutex::new(HashMap::new()),
            }),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.inner.data_dir
    }

    pub fn path_for(&self, collection: &Collection) -> PathBuf {
        self.inner.data_dir.join(collection.file_name())
    }

    /// Read a collection. A missing or blank file is `None`.
    pub async fn load<T: DeserializeOwned>(&self, collection: &Collection) -> StoreResult<Option<T>> {
        let bytes = match fs::read(self.path_for(collection)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::io(collection, err)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                collection: collection.name(),
                source,
            })
    }

    pub async fn load_or<T, F>(&self, collection: &Collection, default: F) -> StoreResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        Ok(self.load(collection).await?.unwrap_or_else(default))
    }

    /// Replace the whole document of a collection.
    pub async fn save<T: Serialize>(&self, collection: &Collection, document: &T) -> StoreResult<()> {
        let _guard = self.acquire(collection).await;
        self.write_document(collection, document).await
    }

    /// Load, mutate and save a collection while holding its write lock.
    ///
    /// When `mutate` fails nothing is written and its error is returned.
    pub async fn update<T, R, E, D, F>(
        &self,
        collection: &Collection,
        default: D,
        mutate: F,
    ) -> Result<R, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<StoreError>,
        D: FnOnce() -> T,
        F: FnOnce(&mut T) -> Result<R, E>,
    {
        let _guard = self.acquire(collection).await;

        let mut document = self.load_or(collection, default).await?;
        let result = mutate(&mut document)?;
        self.write_document(collection, &document).await?;
        Ok(result)
    }

    /// Write `document` only when the collection has no file yet.
    /// Returns whether anything was written.
    pub async fn ensure_exists<T: Serialize>(
        &self,
        collection: &Collection,
        document: &T,
    ) -> StoreResult<bool> {
        let _guard = self.acquire(collection).await;

        let exists = fs::try_exists(self.path_for(collection))
            .await
            .map_err(|err| StoreError::io(collection, err))?;
        if exists {
            return Ok(false);
        }
        self.write_document(collection, document).await?;
        Ok(true)
    }

    async fn acquire(&self, collection: &Collection) -> CollectionGuard<'_> {
        let lock = {
            let mut locks = self.locks();
            locks.entry(collection.clone()).or_default().clone()
        };
        let guard = lock.clone().lock_owned().await;
        CollectionGuard {
            store: self,
            collection: collection.clone(),
            lock,
            guard: Some(guard),
        }
    }

    fn locks(&self) -> std::sync::MutexGuard<'_, HashMap<Collection, Arc<Mutex<()>>>> {
        self.inner
            .locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn write_document<T: Serialize>(
        &self,
        collection: &Collection,
        document: &T,
    ) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|source| StoreError::Encode {
            collection: collection.name(),
            source,
        })?;

        fs::create_dir_all(&self.inner.data_dir)
            .await
            .map_err(|err| StoreError::io(collection, err))?;

        // Same directory as the target so the rename stays on one filesystem.
        let tmp_path = self.inner.data_dir.join(format!(
            ".{}.{}.tmp",
            collection.name(),
            Uuid::new_v4().simple()
        ));

        if let Err(err) = fs::write(&tmp_path, &bytes).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(collection, err));
        }

        if let Err(err) = fs::rename(&tmp_path, self.path_for(collection)).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(StoreError::io(collection, err));
        }

        tracing::debug!(collection = %collection, bytes = bytes.len(), "collection saved");
        Ok(())
    }
}

/// Holds a collection's write lock. On drop the lock entry is evicted when
/// no other task is holding or waiting for it, so per-user cart locks do
/// not pile up.
struct CollectionGuard<'a> {
    store: &'a JsonStore,
    collection: Collection,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for CollectionGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.store.locks();
        // The map entry and `self.lock` are the only references left.
        if Arc::strong_count(&self.lock) == 2
            && locks
                .get(&self.collection)
                .is_some_and(|held| Arc::ptr_eq(held, &self.lock))
        {
            locks.remove(&self.collection);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn collection_file_names() {
        assert_eq!(Collection::Users.file_name(), "users.json");
        assert_eq!(Collection::Items.file_name(), "items.json");
        assert_eq!(Collection::Records.file_name(), "records.json");
        assert_eq!(Collection::Cart(42).file_name(), "cart_42.json");
    }

    #[tokio::test]
    async fn missing_and_blank_documents_load_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let loaded: Option<Value> = store.load(&Collection::Records).await.unwrap();
        assert!(loaded.is_none());

        std::fs::write(store.path_for(&Collection::Records), "  \n").unwrap();
        let records: Vec<Value> = store.load_or(&Collection::Records, Vec::new).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn save_creates_directory_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("data"));

        let doc = json!([{ "id": 1, "name": "a" }]);
        store.save(&Collection::Users, &doc).await.unwrap();
        store.save(&Collection::Users, &doc).await.unwrap();

        let loaded: Value = store.load(&Collection::Users).await.unwrap().unwrap();
        assert_eq!(loaded, doc);

        let names: Vec<String> = std::fs::read_dir(store.data_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["users.json".to_string()]);
    }

    #[tokio::test]
    async fn saved_documents_are_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        store.save(&Collection::Records, &json!([1])).await.unwrap();

        let text = std::fs::read_to_string(store.path_for(&Collection::Records)).unwrap();
        assert_eq!(text, "[\n  1\n]");
    }

    #[tokio::test]
    async fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());
        std::fs::write(store.path_for(&Collection::Items), "{ not json").unwrap();

        let err = store.load::<Value>(&Collection::Items).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { ref collection, .. } if collection == "items"));
        assert!(!err.to_string().contains(dir.path().to_string_lossy().as_ref()));
    }

    #[tokio::test]
    async fn failed_mutation_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let result: Result<(), StoreError> = store
            .update(&Collection::Records, Vec::<i64>::new, |records| {
                records.push(1);
                Err(StoreError::io(
                    &Collection::Records,
                    std::io::Error::other("rejected"),
                ))
            })
            .await;

        assert!(result.is_err());
        assert!(!store.path_for(&Collection::Records).exists());
    }

    #[tokio::test]
    async fn ensure_exists_only_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.ensure_exists(&Collection::Users, &json!([])).await.unwrap());
        store.save(&Collection::Users, &json!([1])).await.unwrap();
        assert!(!store.ensure_exists(&Collection::Users, &json!([])).await.unwrap());

        let loaded: Value = store.load(&Collection::Users).await.unwrap().unwrap();
        assert_eq!(loaded, json!([1]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let mut handles = Vec::new();
        for i in 0..32_i64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update(&Collection::Records, Vec::<i64>::new, |records| {
                        records.push(i);
                        Ok::<_, StoreError>(())
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut records: Vec<i64> = store.load(&Collection::Records).await.unwrap().unwrap();
        records.sort();
        assert_eq!(records, (0..32).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn idle_collection_locks_are_released() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        for user_id in 1..=50 {
            store.save(&Collection::Cart(user_id), &json!([])).await.unwrap();
        }
        store
            .update(&Collection::Records, Vec::<i64>::new, |records| {
                records.push(1);
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();
        store.ensure_exists(&Collection::Users, &json!([])).await.unwrap();

        assert!(store.locks().is_empty());
    }

    #[tokio::test]
    async fn lock_in_use_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path());

        let outer = store.acquire(&Collection::Records).await;
        let waiting = {
            let store = store.clone();
            tokio::spawn(async move {
                store.save(&Collection::Records, &json!([1])).await.unwrap();
            })
        };
        // Let the spawned save reach the lock and start waiting.
        while Arc::strong_count(&outer.lock) < 4 {
            tokio::task::yield_now().await;
        }
        drop(outer);
        assert_eq!(store.locks().len(), 1);

        waiting.await.unwrap();
        assert!(store.locks().is_empty());
    }
}
