//! Domain types for catalog browsing.

use pokedex_pokeapi::{NamedResource, Pokemon, PokemonPage};

/// One listing record: a name and the URL of its detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub detail_url: String,
}

/// The enriched record for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDetail {
    pub name: String,
    pub image_url: Option<String>,
    pub move_names: Vec<String>,
    pub type_names: Vec<String>,
}

impl CatalogDetail {
    /// Sprite URL, or an empty string when the species has none.
    pub fn image_url_or_empty(&self) -> &str {
        self.image_url.as_deref().unwrap_or_default()
    }
}

/// A page of entries plus the cursor of the following page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub next_cursor: Option<String>,
}

impl From<NamedResource> for CatalogEntry {
    fn from(r: NamedResource) -> Self {
        Self {
            name: r.name,
            detail_url: r.url,
        }
    }
}

impl From<PokemonPage> for CatalogPage {
    fn from(page: PokemonPage) -> Self {
        Self {
            entries: page.results.into_iter().map(CatalogEntry::from).collect(),
            next_cursor: page.next,
        }
    }
}

impl From<Pokemon> for CatalogDetail {
    fn from(p: Pokemon) -> Self {
        let move_names = p.move_names();
        let type_names = p.type_names();
        Self {
            name: p.name,
            image_url: p.sprites.front_default,
            move_names,
            type_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_conversion_keeps_order_and_cursor() {
        let json = r#"{"count":3,"next":"http://x/next","previous":null,"results":[
            {"name":"a","url":"http://x/1/"},
            {"name":"b","url":"http://x/2/"}
        ]}"#;
        let page: PokemonPage = serde_json::from_str(json).unwrap();
        let page = CatalogPage::from(page);
        assert_eq!(page.next_cursor.as_deref(), Some("http://x/next"));
        let names: Vec<&str> = page.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(page.entries[1].detail_url, "http://x/2/");
    }

    #[test]
    fn detail_conversion_flattens_names() {
        let json = r#"{"name":"charmander","sprites":{"front_default":null},
            "moves":[{"move":{"name":"scratch"}},{"move":{"name":"ember"}}],
            "types":[{"type":{"name":"fire"}}]}"#;
        let pokemon: Pokemon = serde_json::from_str(json).unwrap();
        let detail = CatalogDetail::from(pokemon);
        assert_eq!(detail.name, "charmander");
        assert!(detail.image_url.is_none());
        assert_eq!(detail.image_url_or_empty(), "");
        assert_eq!(detail.move_names, vec!["scratch", "ember"]);
        assert_eq!(detail.type_names, vec!["fire"]);
    }
}
