//! Pokedex core.
//!
//! Wires the catalog fetcher and the owned-item store from one
//! [`PokedexConfig`]. The UI drives both halves directly through the
//! [`Pokedex::catalog`] and [`Pokedex::owned`] fields and subscribes to their
//! event streams; this crate adds the one operation that spans them, catching
//! a displayed catalog item.

pub mod config;

pub use config::PokedexConfig;
pub use pokedex_catalog::{
    CatalogDetail, CatalogEntry, CatalogEvent, CatalogFetcher, CatalogSource, PageOutcome,
    TransportError,
};
pub use pokedex_owned::{
    JsonFileStorage, KeyValueStorage, MemoryStorage, OwnedItem, OwnedStore, StoreError, StoreEvent,
};

use pokedex_pokeapi::Client;

/// Catalog browsing plus the owned collection.
pub struct Pokedex<S, K> {
    pub catalog: CatalogFetcher<S>,
    pub owned: OwnedStore<K>,
}

impl Pokedex<Client, JsonFileStorage> {
    /// Opens the Pokedex against the live API and on-disk storage.
    pub fn open(config: &PokedexConfig) -> anyhow::Result<Self> {
        let client = Client::new(&config.api)?;
        let data_dir = config.resolved_data_dir()?;
        tracing::info!(
            base_url = %config.api.base_url,
            data_dir = %data_dir.display(),
            "opening pokedex"
        );
        Ok(Self::new(client, JsonFileStorage::new(data_dir)))
    }
}

impl<S: CatalogSource> Pokedex<S, MemoryStorage> {
    /// Uses `source` for the catalog and keeps the owned collection in memory.
    pub fn in_memory(source: S) -> Self {
        Self::new(source, MemoryStorage::new())
    }
}

impl<S: CatalogSource, K: KeyValueStorage> Pokedex<S, K> {
    pub fn new(source: S, storage: K) -> Self {
        Self {
            catalog: CatalogFetcher::new(source),
            owned: OwnedStore::load(storage),
        }
    }

    /// Records the catalog item at `catalog_index` as caught under
    /// `nickname`, using its detail's name and sprite.
    ///
    /// The catch roll ([`OwnedStore::attempt_catch`]) is up to the caller.
    pub fn catch_from_catalog(
        &mut self,
        catalog_index: usize,
        nickname: &str,
    ) -> Result<OwnedItem, StoreError> {
        let Some(detail) = self.catalog.detail(catalog_index) else {
            return Err(self.owned.report_error(StoreError::Index {
                index: catalog_index,
                len: self.catalog.len(),
            }));
        };
        self.owned
            .catch_item(&detail.name, detail.image_url_or_empty(), nickname)
    }
}
