//! Paginated species catalog.
//!
//! This crate holds the browsing logic behind the catalog list. It has no UI
//! dependencies: the list view calls into [`CatalogFetcher`] and listens to
//! its [`CatalogEvent`] stream.
//!
//! # Pieces
//!
//! - **Source**: [`CatalogSource`], the two remote operations (page, detail),
//!   implemented for the PokeAPI client
//! - **Joiner**: [`enrich`], concurrent all-or-nothing detail fan-out
//! - **Fetcher**: [`CatalogFetcher`], cursor and accumulated results

pub mod fetcher;
pub mod joiner;
pub mod source;
pub mod types;

pub use fetcher::{CatalogEvent, CatalogFetcher, PageOutcome};
pub use joiner::enrich;
pub use pokedex_pokeapi::Error as TransportError;
pub use source::{CatalogSource, SourceFuture};
pub use types::{CatalogDetail, CatalogEntry, CatalogPage};
