use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name used when a detail page carries no title node.
pub const UNNAMED: &str = "Unnamed";

/// Details scraped from a single shop item page.
///
/// The serialized field names (`img`, `desc`) are the ones used by the state
/// file and must not change, otherwise existing state stops loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemRecord {
    pub name: String,
    #[serde(rename = "img")]
    pub image: String,
    pub tags: String,
    #[serde(rename = "desc")]
    pub description: String,
    pub price: String,
}

impl Default for ItemRecord {
    fn default() -> Self {
        Self {
            name: UNNAMED.to_string(),
            image: String::new(),
            tags: String::new(),
            description: String::new(),
            price: String::new(),
        }
    }
}

/// Every item that has already been announced, keyed by its shop path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenItems {
    items: BTreeMap<String, ItemRecord>,
}

impl SeenItems {
    pub fn is_new(&self, id: &str) -> bool {
        !self.items.contains_key(id)
    }

    pub fn mark_seen(&mut self, id: &str, record: ItemRecord) {
        self.items.insert(id.to_string(), record);
    }

    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.items.get(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_uses_state_file_field_names() {
        let record = ItemRecord {
            name: "Sticker".to_string(),
            image: "https://cdn.example/s.png".to_string(),
            tags: "Digital".to_string(),
            description: "A sticker".to_string(),
            price: "$3".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["img"], "https://cdn.example/s.png");
        assert_eq!(value["desc"], "A sticker");
        assert!(value.get("image").is_none());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let record: ItemRecord = serde_json::from_str(r#"{"price": "$5"}"#).unwrap();
        assert_eq!(record.name, UNNAMED);
        assert_eq!(record.image, "");
        assert_eq!(record.price, "$5");
    }

    #[test]
    fn marked_items_are_no_longer_new() {
        let mut seen = SeenItems::default();
        assert!(seen.is_new("/s/a"));
        seen.mark_seen("/s/a", ItemRecord::default());
        assert!(!seen.is_new("/s/a"));
        assert!(seen.is_new("/s/b"));
        assert_eq!(seen.len(), 1);
    }
}
