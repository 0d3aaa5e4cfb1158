//! Static card knowledge base.
//!
//! The file is read once at startup and never touched again. Two layouts are
//! accepted: `{"cards": [...]}` and a bare array. Card entries are loose: each
//! field has a couple of accepted spellings and everything else is ignored.

use std::{fs, path::Path};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

/// A static content unit drawn to seed a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub meaning: Option<String>,
}

impl Card {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        keywords: &[&str],
        meaning: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            meaning: meaning.map(str::to_string),
        }
    }
}

/// Immutable card collection shared by all requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    cards: Vec<Card>,
}

impl KnowledgeBase {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Loads the knowledge file, falling back to [`KnowledgeBase::builtin`]
    /// when the file is missing, unreadable, malformed or empty.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let raw = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge file not readable, using built-in cards");
                return Self::builtin();
            }
        };

        match Self::from_json_str(&raw) {
            Ok(kb) if !kb.is_empty() => {
                info!(path = %path.display(), cards = kb.len(), "knowledge base loaded");
                kb
            }
            Ok(_) => {
                warn!(path = %path.display(), "knowledge file has no cards, using built-in cards");
                Self::builtin()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "knowledge file malformed, using built-in cards");
                Self::builtin()
            }
        }
    }

    /// Parses either `{"cards": [...]}` or a bare array of cards.
    ///
    /// Only the outer layout is strict. Entries that are not objects are
    /// skipped with a warning; fields of an unexpected type are ignored.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let entries = match serde_json::from_str::<Value>(raw)? {
            Value::Array(entries) => entries,
            Value::Object(mut root) => match root.remove("cards") {
                Some(Value::Array(entries)) => entries,
                _ => {
                    return Err(serde::de::Error::custom(
                        "expected a `cards` array in the knowledge file",
                    ));
                }
            },
            _ => {
                return Err(serde::de::Error::custom(
                    "expected an object or an array of cards",
                ));
            }
        };

        let cards = entries
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Value::Object(fields) => Some(card_from_fields(&fields, i)),
                other => {
                    warn!(index = i, entry = %other, "knowledge entry is not an object, skipped");
                    None
                }
            })
            .collect();

        Ok(Self { cards })
    }

    /// Three-card set used when no knowledge file is available.
    pub fn builtin() -> Self {
        Self::new(vec![
            Card::new(
                "papessa",
                "La Papessa",
                &["intuizione", "silenzio", "attesa", "interiorità"],
                Some("Ciò che si sente ma non si dice. Conoscenza interiore, riserbo, tempo di gestazione."),
            ),
            Card::new(
                "mago",
                "Il Mago",
                &["inizio", "potenziale", "iniziativa", "abilità"],
                Some("Il potenziale c'è: strumenti disponibili, manca il primo gesto concreto."),
            ),
            Card::new(
                "torre",
                "La Torre",
                &["rottura", "verità", "cambiamento improvviso", "liberazione"],
                Some("Una struttura che non regge più. Ciò che è nascosto emerge e obbliga a ripartire."),
            ),
        ])
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Builds a card from a loose JSON object. Alternative spellings are tried
/// in order: `name`/`title`, `keywords`/`tags`,
/// `meaning`/`base_meaning`/`description`.
fn card_from_fields(fields: &Map<String, Value>, index: usize) -> Card {
    let id = text_field(fields, "id").unwrap_or_else(|| (index + 1).to_string());

    let name = text_field(fields, "name")
        .or_else(|| text_field(fields, "title"))
        .unwrap_or_else(|| {
            if id.chars().all(|c| c.is_ascii_digit()) {
                format!("Carta {}", index + 1)
            } else {
                id.clone()
            }
        });

    let keywords = list_field(fields, "keywords")
        .or_else(|| list_field(fields, "tags"))
        .unwrap_or_default();

    let meaning = text_field(fields, "meaning")
        .or_else(|| text_field(fields, "base_meaning"))
        .or_else(|| text_field(fields, "description"));

    Card {
        id,
        name,
        keywords,
        meaning,
    }
}

/// Non-blank string, or a number rendered as text.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keyword list: an array of strings, or one comma-separated string.
/// `None` when the field is absent or empty, so the next spelling is tried.
fn list_field(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = match fields.get(key)? {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        _ => Vec::new(),
    };
    (!items.is_empty()).then_some(items)
}
