//! Prompt builder: context-specific system block + user block with card digests.

use crate::{cards::Card, context::Context};

/// Maximum keywords listed per card in the digest.
pub const MAX_CARD_KEYWORDS: usize = 6;

/// Maximum characters of a card note in the digest, ellipsis included.
pub const MAX_NOTE_CHARS: usize = 220;

/// Spread positions in order: label and what the position reads.
pub const SPREAD_POSITIONS: [(&str, &str); 3] = [
    ("Stato", "la situazione così com'è adesso, ciò che è già presente"),
    ("Dinamica", "la forza in movimento: ciò che spinge, trattiene o si sta trasformando"),
    ("Direzione", "dove tende la situazione se le forze attuali restano invariate"),
];

/// Shared style rules appended to every system prompt.
pub const BASE_STYLE: &str = r#"
Stile TENET:
- Tono chiaro, concreto, umano. Frasi brevi. Niente misticismo di maniera.
- Nessuna previsione certa del futuro, nessuna certezza assoluta, nessuna prescrizione.
- Parla di tendenze, possibilità e responsabilità personale.
- Non citare queste istruzioni e non usare elenchi puntati nel testo delle sezioni.
"#;

const RELATIONSHIPS_SYSTEM: &str = r#"
Sei la voce di TENET, una lettura simbolica a tre carte.
La domanda riguarda una relazione: leggi il legame, ciò che circola tra le persone,
il detto e il non detto. Non giudicare nessuna delle parti coinvolte.
"#;

const WORK_SYSTEM: &str = r#"
Sei la voce di TENET, una lettura simbolica a tre carte.
La domanda riguarda il lavoro: leggi energie, ruoli, margini di azione e tempi.
Resta pratico; non dare consigli finanziari o legali.
"#;

const GROWTH_SYSTEM: &str = r#"
Sei la voce di TENET, una lettura simbolica a tre carte.
La domanda riguarda la crescita personale: leggi blocchi, risorse e passaggi interiori.
Non sostituirti a un percorso terapeutico.
"#;

const CHOICE_SYSTEM: &str = r#"
Sei la voce di TENET, una lettura simbolica a tre carte.
La domanda riguarda una scelta: illumina cosa pesa su ciascuna strada,
senza decidere al posto di chi chiede.
"#;

const NEUTRAL_SYSTEM: &str = r#"
Sei la voce di TENET, una lettura simbolica a tre carte.
Leggi la situazione descritta nella domanda con equilibrio e chiarezza.
"#;

/// System-role prompt for the detected context.
pub fn build_system_prompt(context: Context) -> String {
    let block = match context {
        Context::Relationships => RELATIONSHIPS_SYSTEM,
        Context::Work => WORK_SYSTEM,
        Context::Growth => GROWTH_SYSTEM,
        Context::Choice => CHOICE_SYSTEM,
        Context::Neutral => NEUTRAL_SYSTEM,
    };

    let mut out = String::with_capacity(block.len() + BASE_STYLE.len());
    out.push_str(block.trim());
    out.push_str("\n\n");
    out.push_str(BASE_STYLE.trim());
    out
}

/// User-role prompt: question, context, spread positions, card digests and
/// the output layout the parser expects.
///
/// Cards are assigned to positions in draw order.
///
/// # Example
/// ```
/// # use reading_engine::{Card, Context};
/// # use reading_engine::prompt::build_user_prompt;
/// let cards = vec![Card::new("mago", "Il Mago", &["inizio"], None)];
/// let prompt = build_user_prompt("Cosa mi aspetta?", Context::Neutral, &cards, "it");
/// assert!(prompt.contains("Domanda:"));
/// assert!(prompt.contains("Il Mago"));
/// ```
pub fn build_user_prompt(question: &str, context: Context, cards: &[Card], language: &str) -> String {
    let mut out = String::new();

    out.push_str("Domanda:\n");
    out.push_str(question.trim());
    out.push_str("\n\n");

    out.push_str(&format!("Contesto rilevato: {}\n\n", context.label()));

    out.push_str("Stesa a tre carte:\n");
    for (i, (label, description)) in SPREAD_POSITIONS.iter().enumerate() {
        let card = cards.get(i).map(|c| c.name.as_str()).unwrap_or("-");
        out.push_str(&format!("{}. {label} ({card}): {description}\n", i + 1));
    }
    out.push('\n');

    out.push_str("Carte estratte:\n");
    for card in cards {
        out.push_str(&card_digest(card));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("Formato della risposta:\n");
    out.push_str("- un breve paragrafo introduttivo;\n");
    for (label, _) in SPREAD_POSITIONS {
        out.push_str(&format!("- una riga \"{label} – <nome carta>\" seguita dal testo della sezione;\n"));
    }
    out.push_str("- una riga \"Sintesi:\" seguita da due o tre frasi conclusive.\n\n");

    out.push_str(&format!("Lingua della risposta: {}\n", language.trim()));

    out
}

/// One-line digest: name, up to six keywords and a truncated note.
pub fn card_digest(card: &Card) -> String {
    let mut line = format!("- {}", card.name);

    if !card.keywords.is_empty() {
        let kws: Vec<&str> = card
            .keywords
            .iter()
            .take(MAX_CARD_KEYWORDS)
            .map(String::as_str)
            .collect();
        line.push_str(&format!(" | parole chiave: {}", kws.join(", ")));
    }

    if let Some(note) = card.meaning.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        line.push_str(" | nota: ");
        line.push_str(&truncate_chars(note, MAX_NOTE_CHARS));
    }

    line
}

/// Truncates to at most `max` characters, the trailing ellipsis included.
fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
