//! PokeAPI client for browsing the species catalog.
//!
//! Provides an async client for the [PokeAPI](https://pokeapi.co) v2
//! `pokemon` listing and per-species detail endpoints.

pub mod client;
pub mod config;
pub mod types;

pub use client::{Client, Error};
pub use config::ClientConfig;
pub use types::{NamedResource, Pokemon, PokemonPage};
