use serde_json::{Map, Value};

/// Request payload for `POST /v1/reading`.
///
/// Fields are read one by one from the JSON object, so a badly typed
/// optional field never hides a valid question. Validation happens in the
/// handler.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReadingRequest {
    /// Natural language question (at least 5 characters once trimmed).
    pub question: Option<String>,
    /// Response language; defaults to `it`.
    pub language: Option<String>,
    /// Spread identifier; only `three_cards_v1` is accepted. A non-string
    /// value is kept as its JSON text so it can be reported back.
    pub spread: Option<String>,
    /// Deck label echoed in `meta`; defaults to `TENET_DEFAULT_DECK`.
    pub deck: Option<String>,
}

impl ReadingRequest {
    /// Reads the request from a raw body. Anything that is not a JSON object
    /// yields the empty request.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let fields = match serde_json::from_slice::<Value>(body)? {
            Value::Object(fields) => fields,
            _ => return Ok(Self::default()),
        };

        Ok(Self {
            question: string_field(&fields, "question"),
            language: string_field(&fields, "language"),
            spread: match fields.get("spread") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            },
            deck: string_field(&fields, "deck"),
        })
    }
}

/// String value of `key`; other types count as absent.
fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}
