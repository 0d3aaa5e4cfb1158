//! Keyword-based topic detection.
//!
//! The question is lower-cased and every keyword of a category counts once
//! when it occurs as a substring. No tokenization and no stemming: stems such
//! as `fidanzat` are written as stems in the tables.

use std::fmt;

use serde::Serialize;

/// Topical bucket assigned to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Relationships,
    Work,
    Growth,
    Choice,
    Neutral,
}

impl Context {
    /// Scored categories in tie-break priority order. `Neutral` is never
    /// scored; it is the result when nothing matches.
    pub const SCORED: [Context; 4] = [
        Context::Relationships,
        Context::Work,
        Context::Growth,
        Context::Choice,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Context::Relationships => "relationships",
            Context::Work => "work",
            Context::Growth => "growth",
            Context::Choice => "choice",
            Context::Neutral => "neutral",
        }
    }

    /// Keyword table for this context (empty for `Neutral`).
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Context::Relationships => RELATIONSHIP_KEYWORDS,
            Context::Work => WORK_KEYWORDS,
            Context::Growth => GROWTH_KEYWORDS,
            Context::Choice => CHOICE_KEYWORDS,
            Context::Neutral => &[],
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const RELATIONSHIP_KEYWORDS: &[&str] = &[
    "amore",
    "relazione",
    "partner",
    "fidanzat",
    "marito",
    "moglie",
    "coppia",
    "innamorat",
    "sentimenti",
    "legame",
    "matrimonio",
    "tradimento",
    "love",
    "relationship",
    "boyfriend",
    "girlfriend",
];

const WORK_KEYWORDS: &[&str] = &[
    "lavoro",
    "lavorare",
    "carriera",
    "ufficio",
    "colleg",
    "stipendio",
    "azienda",
    "promozione",
    "colloquio",
    "licenziament",
    "business",
    "cliente",
    "job",
    "career",
];

const GROWTH_KEYWORDS: &[&str] = &[
    "crescita",
    "crescere",
    "me stess",
    "autostima",
    "paura",
    "blocco",
    "percorso",
    "equilibrio",
    "consapevolezza",
    "ansia",
    "migliorare",
    "growth",
    "myself",
];

const CHOICE_KEYWORDS: &[&str] = &[
    "dovrei",
    "scegliere",
    "scelta",
    "decidere",
    "decisione",
    "bivio",
    "oppure",
    "conviene",
    "should i",
    "choose",
    "decision",
];

/// Outcome of [`classify`]: the winning context plus the raw scores of the
/// scored categories, in [`Context::SCORED`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub context: Context,
    pub scores: [(Context, usize); 4],
}

/// Picks the context whose keyword table has the most substring hits.
///
/// Ties go to the category listed first in [`Context::SCORED`]; a question
/// with no hit at all is [`Context::Neutral`].
pub fn classify(question: &str) -> Classification {
    let q = question.to_lowercase();

    let scores = Context::SCORED.map(|ctx| {
        let hits = ctx.keywords().iter().filter(|k| q.contains(*k)).count();
        (ctx, hits)
    });

    let mut best = (Context::Neutral, 0usize);
    for &(ctx, score) in &scores {
        if score > best.1 {
            best = (ctx, score);
        }
    }

    Classification {
        context: best.0,
        scores,
    }
}
