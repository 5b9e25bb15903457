// Shapes exchanged with the Mochi API.
//
// Decks and cards keep every field the service sends, not just the ones
// this crate looks at, so printing them back out loses nothing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Line that separates the front of a card from its back.
pub const CARD_SIDE_DELIMITER: &str = "\n---\n";

pub const PARENT_ID_KEY: &str = "parent-id";

/// The service's pagination wrapper. Only `docs` is used; the bookmark that
/// would fetch the next page is never followed.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub docs: Vec<T>,
    #[serde(default)]
    pub bookmark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    #[serde(rename = "parent-id", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Deck {
    /// Look up a string attribute by its wire name. Non-string values and
    /// missing keys both give `None`.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        match key {
            "id" => Some(self.id.as_str()),
            "name" => Some(self.name.as_str()),
            PARENT_ID_KEY => self.parent_id.as_deref(),
            other => self.extra.get(other).and_then(Value::as_str),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "deck-id", default)]
    pub deck_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    /// Split `content` back into front and back. Content written without the
    /// delimiter is all front.
    pub fn sides(&self) -> (&str, &str) {
        self.content
            .split_once(CARD_SIDE_DELIMITER)
            .unwrap_or((self.content.as_str(), ""))
    }
}

/// Body of a card creation request.
///
/// `review-reverse?` is deliberately absent: the service ignores or
/// mishandles it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCard {
    #[serde(rename = "deck-id")]
    pub deck_id: String,
    pub content: String,
}

impl NewCard {
    pub fn new(deck_id: &str, front: &str, back: &str) -> Self {
        NewCard {
            deck_id: deck_id.to_string(),
            content: format_card_content(front, back),
        }
    }
}

pub fn format_card_content(front: &str, back: &str) -> String {
    format!("{front}{CARD_SIDE_DELIMITER}{back}")
}

/// Criteria for picking a deck out of a listing.
///
/// The name is compared case-insensitively. Every other attribute must be
/// present on the deck and equal exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckFilter {
    name: String,
    attributes: BTreeMap<String, String>,
}

impl DeckFilter {
    pub fn by_name(name: &str) -> Self {
        DeckFilter {
            name: name.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    /// Require a parent deck. `None` adds no constraint.
    pub fn with_parent(self, parent_id: Option<&str>) -> Self {
        match parent_id {
            Some(parent) => self.with_attribute(PARENT_ID_KEY, parent),
            None => self,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, deck: &Deck) -> bool {
        deck.name.to_lowercase() == self.name.to_lowercase()
            && self
                .attributes
                .iter()
                .all(|(key, value)| deck.attribute(key) == Some(value.as_str()))
    }
}
