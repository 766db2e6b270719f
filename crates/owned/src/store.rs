//! Owned-item store.
//!
//! Every mutation builds the next collection, writes it to storage, and only
//! then replaces the in-memory copy. A failed write leaves both untouched.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::rules::{self, PRIMES_UP_TO_97};
use crate::storage::KeyValueStorage;
use crate::types::OwnedItem;

/// Storage key of the owned collection.
pub const OWNED_ITEMS_KEY: &str = "myPokemonList";

/// Events emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The collection was replaced and persisted.
    Changed { len: usize },
    /// A mutation failed. `message` is user-facing.
    Error { message: String },
}

/// Persisted, index-addressed collection of caught Pokemon.
pub struct OwnedStore<K> {
    storage: K,
    items: Vec<OwnedItem>,
    release_candidates: Vec<u64>,
    events_tx: mpsc::UnboundedSender<StoreEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<StoreEvent>>,
}

impl<K: KeyValueStorage> OwnedStore<K> {
    /// Opens the store, loading whatever collection `storage` holds.
    ///
    /// A missing or undecodable value yields an empty collection.
    pub fn load(storage: K) -> Self {
        let items = read_items(&storage);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            storage,
            items,
            release_candidates: PRIMES_UP_TO_97.to_vec(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Replaces the set release values are drawn from.
    ///
    /// Every drawn value still goes through the primality check, so a set
    /// containing non-primes makes some releases fail. An empty set makes
    /// every release fail.
    pub fn with_release_candidates(mut self, candidates: Vec<u64>) -> Self {
        self.release_candidates = candidates;
        self
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<StoreEvent>> {
        self.events_rx.take()
    }

    pub fn items(&self) -> &[OwnedItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&OwnedItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Re-reads the collection from storage, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.items = read_items(&self.storage);
        self.emit(StoreEvent::Changed {
            len: self.items.len(),
        });
    }

    /// Rolls a catch attempt. The UI asks for a nickname and calls
    /// [`catch_item`](Self::catch_item) only when this returns `true`.
    pub fn attempt_catch(&self) -> bool {
        let caught = rules::catch_succeeds(&mut rand::thread_rng());
        debug!(caught, "catch attempt");
        caught
    }

    /// Appends a freshly caught item and persists the collection.
    pub fn catch_item(
        &mut self,
        source_name: &str,
        image_url: &str,
        nickname: &str,
    ) -> Result<OwnedItem, StoreError> {
        let item = OwnedItem::new(source_name, image_url, nickname);
        let mut next = self.items.clone();
        next.push(item.clone());

        self.commit(next)?;
        info!(name = %item.source_name, nickname = %item.nickname, "caught");
        Ok(item)
    }

    /// Releases the item at `index`.
    ///
    /// A value is drawn from the release candidates and checked for
    /// primality; the item is removed only if the check passes.
    pub fn release_item(&mut self, index: usize) -> Result<(), StoreError> {
        self.check_index(index)?;

        let drawn = rules::draw_release_value(&mut rand::thread_rng(), &self.release_candidates);
        let value = match drawn {
            Some(v) => v,
            None => return Err(self.report_error(StoreError::NoCandidate)),
        };
        if !rules::is_prime(value) {
            return Err(self.report_error(StoreError::NotPrime { value }));
        }

        let mut next = self.items.clone();
        let released = next.remove(index);
        self.commit(next)?;
        info!(index, value, name = %released.source_name, "released");
        Ok(())
    }

    /// Renames the item at `index` to `"<new_name>-<fib(rename_count)>"` and
    /// bumps its rename count.
    pub fn rename_item(&mut self, index: usize, new_name: &str) -> Result<(), StoreError> {
        self.check_index(index)?;

        let mut next = self.items.clone();
        let item = &mut next[index];
        let suffix = rules::fibonacci(item.rename_count);
        item.nickname = format!("{new_name}-{suffix}");
        item.rename_count = item.rename_count.saturating_add(1);
        let nickname = item.nickname.clone();

        self.commit(next)?;
        info!(index, nickname = %nickname, "renamed");
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.items.len() {
            return Ok(());
        }
        Err(self.report_error(StoreError::Index {
            index,
            len: self.items.len(),
        }))
    }

    /// Persists `next` and adopts it as the current collection.
    fn commit(&mut self, next: Vec<OwnedItem>) -> Result<(), StoreError> {
        let write = serde_json::to_vec(&next)
            .map_err(StoreError::from)
            .and_then(|json| {
                self.storage
                    .write(OWNED_ITEMS_KEY, &json)
                    .map_err(StoreError::from)
            });
        if let Err(e) = write {
            return Err(self.report_error(e));
        }

        self.items = next;
        self.emit(StoreEvent::Changed {
            len: self.items.len(),
        });
        Ok(())
    }

    /// Logs `error` and emits it as [`StoreEvent::Error`], handing it back.
    ///
    /// Callers that reject a mutation before reaching the store use this so
    /// the event stream sees every failure.
    pub fn report_error(&self, error: StoreError) -> StoreError {
        warn!(error = %error, "owned collection mutation failed");
        self.emit(StoreEvent::Error {
            message: error.to_string(),
        });
        error
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.events_tx.send(event);
    }
}

/// Loads the collection, treating absence and corruption as empty.
fn read_items<K: KeyValueStorage>(storage: &K) -> Vec<OwnedItem> {
    let data = match storage.read(OWNED_ITEMS_KEY) {
        Ok(Some(data)) => data,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "failed to read owned collection, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_slice::<Vec<OwnedItem>>(&data) {
        Ok(items) => {
            debug!("loaded {} owned item(s)", items.len());
            items
        }
        Err(e) => {
            warn!(error = %e, "failed to decode owned collection, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::{JsonFileStorage, MemoryStorage};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Memory storage whose writes can be switched to fail.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: AtomicBool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.inner.write(key, value)
        }
    }

    fn persisted<K: KeyValueStorage + ?Sized>(storage: &K) -> Vec<OwnedItem> {
        let data = storage.read(OWNED_ITEMS_KEY).unwrap().unwrap();
        serde_json::from_slice(&data).unwrap()
    }

    fn store_with(names: &[&str]) -> OwnedStore<Arc<MemoryStorage>> {
        let mut store = OwnedStore::load(Arc::new(MemoryStorage::new()));
        for name in names {
            store
                .catch_item(name, &format!("https://img/{name}.png"), name)
                .unwrap();
        }
        store
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<StoreEvent>) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        while let Ok(e) = rx.try_recv() {
            events.push(e);
        }
        events
    }

    // -----------------------------------------------------------------------
    // load
    // -----------------------------------------------------------------------

    #[test]
    fn load_without_stored_value_is_empty() {
        let store = OwnedStore::load(MemoryStorage::new());
        assert!(store.is_empty());
    }

    #[test]
    fn load_corrupt_value_is_empty() {
        let storage = MemoryStorage::new();
        storage.write(OWNED_ITEMS_KEY, b"{not json").unwrap();
        let store = OwnedStore::load(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn load_reads_existing_records() {
        let storage = MemoryStorage::new();
        let json = r#"[{"name":"bulbasaur","url":"u1","nickname":"Bulby","renameCount":2},
                       {"name":"squirtle","url":"u7","nickname":"Squirt","renameCount":0}]"#;
        storage.write(OWNED_ITEMS_KEY, json.as_bytes()).unwrap();

        let store = OwnedStore::load(storage);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().nickname, "Bulby");
        assert_eq!(store.get(0).unwrap().rename_count, 2);
        assert_eq!(store.get(1).unwrap().source_name, "squirtle");
    }

    // -----------------------------------------------------------------------
    // catch
    // -----------------------------------------------------------------------

    #[test]
    fn catch_appends_and_persists() {
        let mut store = OwnedStore::load(Arc::new(MemoryStorage::new()));
        let mut events = store.take_events().unwrap();

        let item = store
            .catch_item("pikachu", "https://img/25.png", "Sparky")
            .unwrap();

        assert_eq!(item.rename_count, 0);
        assert_eq!(store.items(), &[item.clone()]);
        assert_eq!(persisted(store.storage()), vec![item]);
        assert_eq!(drain(&mut events), vec![StoreEvent::Changed { len: 1 }]);
    }

    #[test]
    fn catch_keeps_insertion_order() {
        let store = store_with(&["a", "b", "c"]);
        let names: Vec<&str> = store.items().iter().map(|i| i.source_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn attempt_catch_does_not_mutate() {
        let store = store_with(&["a"]);
        for _ in 0..20 {
            let _ = store.attempt_catch();
        }
        assert_eq!(store.len(), 1);
    }

    // -----------------------------------------------------------------------
    // release
    // -----------------------------------------------------------------------

    #[test]
    fn release_removes_index_and_persists() {
        let mut store = store_with(&["a", "b", "c"]);

        store.release_item(0).unwrap();

        let names: Vec<&str> = store.items().iter().map(|i| i.source_name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(persisted(store.storage()), store.items());
    }

    #[test]
    fn release_always_passes_with_prime_draw_set() {
        let mut store = store_with(&["a"; 30]);
        while !store.is_empty() {
            store.release_item(store.len() - 1).unwrap();
        }
        assert!(persisted(store.storage()).is_empty());
    }

    #[test]
    fn release_out_of_range_is_index_error() {
        let mut store = store_with(&["a", "b"]);
        let mut events = store.take_events().unwrap();
        drain(&mut events);

        let err = store.release_item(2).unwrap_err();

        assert!(matches!(err, StoreError::Index { index: 2, len: 2 }));
        assert_eq!(store.len(), 2);
        assert!(matches!(
            drain(&mut events).as_slice(),
            [StoreEvent::Error { .. }]
        ));
    }

    #[test]
    fn release_with_composite_draw_fails_validation() {
        let mut store = store_with(&["a", "b"]).with_release_candidates(vec![4]);
        let mut events = store.take_events().unwrap();
        drain(&mut events);
        let before = store.items().to_vec();

        let err = store.release_item(0).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Release failed. 4 is not a prime number.");
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(persisted(store.storage()), before);
        assert_eq!(
            drain(&mut events),
            vec![StoreEvent::Error {
                message: "Release failed. 4 is not a prime number.".into()
            }]
        );
    }

    #[test]
    fn report_error_emits_message() {
        let mut store = store_with(&["a"]);
        let mut events = store.take_events().unwrap();
        drain(&mut events);

        let err = store.report_error(StoreError::Index { index: 3, len: 0 });

        assert!(matches!(err, StoreError::Index { index: 3, len: 0 }));
        assert_eq!(store.len(), 1);
        assert_eq!(
            drain(&mut events),
            vec![StoreEvent::Error {
                message: "index 3 out of range for 0 item(s)".into()
            }]
        );
    }

    #[test]
    fn release_with_empty_draw_set_fails_validation() {
        let mut store = store_with(&["a"]).with_release_candidates(vec![]);
        let err = store.release_item(0).unwrap_err();
        assert!(matches!(err, StoreError::NoCandidate));
        assert_eq!(store.len(), 1);
    }

    // -----------------------------------------------------------------------
    // rename
    // -----------------------------------------------------------------------

    #[test]
    fn rename_suffixes_fibonacci_of_previous_count() {
        let mut store = store_with(&["pikachu"]);

        store.rename_item(0, "A").unwrap();
        assert_eq!(store.get(0).unwrap().nickname, "A-0");
        store.rename_item(0, "B").unwrap();
        assert_eq!(store.get(0).unwrap().nickname, "B-1");
        store.rename_item(0, "C").unwrap();
        assert_eq!(store.get(0).unwrap().nickname, "C-1");
        store.rename_item(0, "D").unwrap();
        assert_eq!(store.get(0).unwrap().nickname, "D-2");

        let item = store.get(0).unwrap();
        assert_eq!(item.rename_count, 4);
        assert_eq!(persisted(store.storage())[0], *item);
    }

    #[test]
    fn rename_touches_only_the_addressed_item() {
        let mut store = store_with(&["a", "b"]);
        store.rename_item(1, "Bee").unwrap();
        assert_eq!(store.get(0).unwrap().nickname, "a");
        assert_eq!(store.get(0).unwrap().rename_count, 0);
        assert_eq!(store.get(1).unwrap().nickname, "Bee-0");
    }

    #[test]
    fn rename_out_of_range_is_index_error() {
        let mut store = store_with(&["a", "b"]);
        let before = store.items().to_vec();

        let err = store.rename_item(5, "X").unwrap_err();

        assert!(matches!(err, StoreError::Index { index: 5, len: 2 }));
        assert_eq!(store.items(), before.as_slice());
        assert_eq!(persisted(store.storage()), before);
    }

    // -----------------------------------------------------------------------
    // persistence
    // -----------------------------------------------------------------------

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let storage = Arc::new(FlakyStorage::default());
        let mut store = OwnedStore::load(Arc::clone(&storage));
        store.catch_item("a", "", "a").unwrap();
        let mut events = store.take_events().unwrap();
        drain(&mut events);

        storage.fail_writes.store(true, Ordering::SeqCst);

        assert!(matches!(
            store.catch_item("b", "", "b"),
            Err(StoreError::Storage(_))
        ));
        assert!(store.rename_item(0, "X").is_err());
        assert!(store.release_item(0).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().nickname, "a");
        assert_eq!(store.get(0).unwrap().rename_count, 0);
        let events = drain(&mut events);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| matches!(e, StoreEvent::Error { .. })));
    }

    #[test]
    fn reload_picks_up_external_writes() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = OwnedStore::load(Arc::clone(&storage));
        assert!(store.is_empty());

        let mut other = OwnedStore::load(Arc::clone(&storage));
        other.catch_item("mew", "", "Mew").unwrap();

        store.reload();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();

        {
            let mut store = OwnedStore::load(JsonFileStorage::new(tmp.path()));
            store.catch_item("onix", "u95", "Rocky").unwrap();
            store.catch_item("abra", "u63", "Spoon").unwrap();
            store.rename_item(1, "Kadabra").unwrap();
        }

        let store = OwnedStore::load(JsonFileStorage::new(tmp.path()));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1).unwrap().nickname, "Kadabra-0");
        assert_eq!(store.get(1).unwrap().rename_count, 1);

        let raw = std::fs::read_to_string(tmp.path().join("myPokemonList.json")).unwrap();
        assert!(raw.contains("\"renameCount\":1"));
    }
}
