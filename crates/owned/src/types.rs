//! Owned-item record.

use serde::{Deserialize, Serialize};

/// A caught Pokemon.
///
/// Serialized as `{name, url, nickname, renameCount}` to stay readable by
/// collections written by earlier app versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedItem {
    /// Species name the item was caught from.
    #[serde(rename = "name")]
    pub source_name: String,
    /// Sprite URL, empty if the species had none.
    #[serde(rename = "url")]
    pub image_url: String,
    pub nickname: String,
    #[serde(rename = "renameCount", default)]
    pub rename_count: u32,
}

impl OwnedItem {
    pub fn new(
        source_name: impl Into<String>,
        image_url: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            image_url: image_url.into(),
            nickname: nickname.into(),
            rename_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_field_names() {
        let item = OwnedItem::new("pikachu", "https://img/25.png", "Sparky");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["name"], "pikachu");
        assert_eq!(json["url"], "https://img/25.png");
        assert_eq!(json["nickname"], "Sparky");
        assert_eq!(json["renameCount"], 0);
    }

    #[test]
    fn missing_rename_count_defaults_to_zero() {
        let json = r#"{"name":"eevee","url":"","nickname":"Eve"}"#;
        let item: OwnedItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.rename_count, 0);
        assert_eq!(item.source_name, "eevee");
    }
}
