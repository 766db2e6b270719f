//! Remote catalog operations.
//!
//! The fetcher only sees this trait, so tests drive it with scripted sources
//! and the app plugs in the PokeAPI [`Client`].

use std::future::Future;
use std::pin::Pin;

use pokedex_pokeapi::Client;

use crate::TransportError;
use crate::types::{CatalogDetail, CatalogPage};

/// Boxed future returned by [`CatalogSource`] operations.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

/// Abstract remote catalog.
pub trait CatalogSource: Send + Sync {
    /// Fetches the page at `cursor`, or the default first page when `None`.
    fn fetch_page<'a>(&'a self, cursor: Option<&'a str>) -> SourceFuture<'a, CatalogPage>;

    /// Fetches one entry's detail by its own URL.
    fn fetch_detail<'a>(&'a self, url: &'a str) -> SourceFuture<'a, CatalogDetail>;
}

impl CatalogSource for Client {
    fn fetch_page<'a>(&'a self, cursor: Option<&'a str>) -> SourceFuture<'a, CatalogPage> {
        Box::pin(async move { self.list_pokemon(cursor).await.map(CatalogPage::from) })
    }

    fn fetch_detail<'a>(&'a self, url: &'a str) -> SourceFuture<'a, CatalogDetail> {
        Box::pin(async move { self.get_pokemon(url).await.map(CatalogDetail::from) })
    }
}
