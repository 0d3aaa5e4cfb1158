//! Best-effort segmentation of generated text into a structured reading.
//!
//! The model output has no guaranteed grammar. [`LabeledTextParser`] looks for
//! header lines starting with one of the spread labels and for a trailing
//! `Sintesi` marker; anything it cannot place ends up in the intro or in a
//! single fallback section. Callers only see [`ReadingParser`], so a stricter
//! contract (structured output from the provider) can replace this module
//! without touching the pipeline.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Literal marker that opens the closing synthesis.
pub const SYNTHESIS_MARKER: &str = "Sintesi";

/// Line-anchored synthesis header in any case, with optional markdown.
static SYNTHESIS_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*|__)?[ \t]*(?i:sintesi)\b")
        .expect("Invalid regex: synthesis header")
});

/// Title of the single section produced when no header is recognised.
pub const FALLBACK_TITLE: &str = "Lettura";

/// Header line: optional markdown heading/bold, a spread label, a separator
/// and the card name for the rest of the line.
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:#{1,6}[ \t]*)?(?:\*\*|__)?[ \t]*(?i:(Stato|Dinamica|Direzione))[ \t]*(?:\*\*|__)?[ \t]*[–—:\-][ \t]*(.*)$",
    )
    .expect("Invalid regex: section header")
});

/// One labeled block of the reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSection {
    pub title: String,
    pub body: String,
}

/// Parser output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReading {
    pub intro: String,
    pub sections: Vec<CardSection>,
    pub synthesis: String,
}

/// Raw generated text → structured reading.
pub trait ReadingParser: Send + Sync {
    fn parse(&self, raw: &str) -> ParsedReading;
}

/// Regex-driven parser for the `Stato / Dinamica / Direzione / Sintesi` layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabeledTextParser;

impl ReadingParser for LabeledTextParser {
    fn parse(&self, raw: &str) -> ParsedReading {
        let (body, synthesis) = split_synthesis(raw);

        let headers: Vec<_> = SECTION_HEADER.captures_iter(body).collect();
        if headers.is_empty() {
            return ParsedReading {
                intro: String::new(),
                sections: vec![CardSection {
                    title: FALLBACK_TITLE.to_string(),
                    body: collapse_whitespace(body),
                }],
                synthesis,
            };
        }

        let mut sections = Vec::with_capacity(headers.len());
        for (i, caps) in headers.iter().enumerate() {
            let (Some(whole), Some(label)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let card = caps.get(2).map(|m| clean_card_name(m.as_str())).unwrap_or_default();
            let end = headers
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map(|m| m.start())
                .unwrap_or(body.len());

            let label = canonical_label(label.as_str());
            let title = if card.is_empty() {
                label.to_string()
            } else {
                format!("{label} – {card}")
            };

            sections.push(CardSection {
                title,
                body: collapse_whitespace(&body[whole.end()..end]),
            });
        }

        let intro_end = headers
            .first()
            .and_then(|c| c.get(0))
            .map(|m| m.start())
            .unwrap_or(0);

        ParsedReading {
            intro: collapse_whitespace(strip_markdown_edges(&body[..intro_end])),
            sections,
            synthesis,
        }
    }
}

/// Splits at the last synthesis marker: `(text before, synthesis text)`.
///
/// A marker opening a line wins over one inside a sentence; only without
/// such a header is the last exact-case `Sintesi` used.
fn split_synthesis(raw: &str) -> (&str, String) {
    let marker = SYNTHESIS_HEADER
        .find_iter(raw)
        .last()
        .map(|m| (m.start(), m.end()))
        .or_else(|| raw.rfind(SYNTHESIS_MARKER).map(|i| (i, i + SYNTHESIS_MARKER.len())));

    match marker {
        Some((start, end)) => {
            let before = raw[..start].trim_end_matches(|c: char| c == '*' || c == '#' || c.is_whitespace());
            (before, collapse_whitespace(strip_markdown_edges(&raw[end..])))
        }
        None => (raw, String::new()),
    }
}

/// Drops leading separators/markdown and trailing emphasis markers.
fn strip_markdown_edges(s: &str) -> &str {
    s.trim_start_matches(|c: char| matches!(c, ':' | '–' | '—' | '-' | '*' | '#' | '_') || c.is_whitespace())
        .trim_end_matches(|c: char| c == '*' || c == '#' || c.is_whitespace())
}

fn clean_card_name(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| c == '*' || c == '_')
        .trim_end_matches(':')
        .trim()
        .to_string()
}

fn canonical_label(s: &str) -> &'static str {
    match s.to_lowercase().as_str() {
        "stato" => "Stato",
        "dinamica" => "Dinamica",
        _ => "Direzione",
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
