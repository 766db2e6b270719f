//! API response types for PokeAPI.

use serde::{Deserialize, Serialize};

/// A `{name, url}` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

/// One page of the `pokemon` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonPage {
    #[serde(default)]
    pub count: u32,
    /// Absolute URL of the following page, `None` on the last page.
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

/// Species detail, trimmed to the fields the catalog uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub moves: Vec<MoveSlot>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
}

impl Pokemon {
    /// Move names in API order.
    pub fn move_names(&self) -> Vec<String> {
        self.moves.iter().map(|m| m.entry.name.clone()).collect()
    }

    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<String> {
        self.types.iter().map(|t| t.entry.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSlot {
    #[serde(rename = "move")]
    pub entry: NamedEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub entry: NamedEntry,
}

/// Nested `{name}` object. The API also sends `url`, which is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}
