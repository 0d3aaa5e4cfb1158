use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use ai_llm_service::{AiLlmError, CompletionClient, ProviderError};
use async_trait::async_trait;
use rand::{SeedableRng, rngs::StdRng};
use reading_engine::{
    Card, Context, DrawSource, KnowledgeBase, LabeledTextParser, ReadingEngine, ReadingError,
};

/// Returns a canned answer and remembers the prompts it was given.
struct CannedClient {
    answer: Result<String, ()>,
    seen: Mutex<Vec<(String, String)>>,
}

impl CannedClient {
    fn ok(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            answer: Err(()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, AiLlmError> {
        self.seen
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        match &self.answer {
            Ok(s) => Ok(s.clone()),
            Err(()) => Err(ProviderError::MissingApiKey.into()),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn deck() -> Arc<KnowledgeBase> {
    Arc::new(KnowledgeBase::new(
        ["Il Mago", "La Papessa", "L'Imperatrice", "La Torre", "Il Sole", "La Luna"]
            .iter()
            .enumerate()
            .map(|(i, n)| Card::new(i.to_string(), *n, &["simbolo"], Some("Nota.")))
            .collect(),
    ))
}

const ANSWER: &str = "Un momento di passaggio.

Stato – Il Mago
Le risorse ci sono.

Dinamica – La Luna
Qualcosa resta in ombra.

Direzione – Il Sole
La situazione tende a chiarirsi.

Sintesi: Serve un gesto concreto.";

#[tokio::test]
async fn full_pipeline_with_seeded_rng() {
    let client = Arc::new(CannedClient::ok(ANSWER));
    let engine = ReadingEngine::new(deck(), client.clone(), Arc::new(LabeledTextParser));

    let mut rng = StdRng::seed_from_u64(3);
    let prepared = engine.prepare("Dovrei lasciare il mio lavoro attuale?", "it", &mut rng);

    assert_eq!(prepared.context, Context::Work);
    assert_eq!(prepared.cards.len(), 3);
    let names: HashSet<_> = prepared.cards.iter().map(|c| c.name.clone()).collect();
    assert_eq!(names.len(), 3);
    for name in &names {
        assert!(prepared.user_prompt.contains(name.as_str()));
    }

    let reading = engine.generate(prepared).await.unwrap();

    assert_eq!(reading.context, Context::Work);
    assert_eq!(reading.sections.len(), 3);
    assert_eq!(reading.sections[1].title, "Dinamica – La Luna");
    assert_eq!(reading.intro, "Un momento di passaggio.");
    assert_eq!(reading.synthesis, "Serve un gesto concreto.");
    assert_eq!(reading.model, "stub-model");

    let seen = client.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].0.contains("lavoro"));
    assert!(seen[0].1.contains("Contesto rilevato: work"));
}

#[tokio::test]
async fn same_seed_gives_same_hand() {
    let engine = ReadingEngine::new(
        deck(),
        Arc::new(CannedClient::ok(ANSWER)),
        Arc::new(LabeledTextParser),
    );

    let a = engine.prepare_from("Cosa devo sapere oggi?", "it", DrawSource::Seeded(11));
    let b = engine.prepare_from("Cosa devo sapere oggi?", "it", DrawSource::Seeded(11));

    assert_eq!(a.cards, b.cards);
    assert_eq!(a.user_prompt, b.user_prompt);
    assert_eq!(a.context, Context::Neutral);
}

#[test]
fn seeded_source_matches_explicit_rng() {
    let engine = ReadingEngine::new(
        deck(),
        Arc::new(CannedClient::ok(ANSWER)),
        Arc::new(LabeledTextParser),
    );
    let question = "Dovrei lasciare il mio lavoro attuale?";

    let from_source = engine.prepare_from(question, "en", DrawSource::Seeded(23));
    let from_rng = engine.prepare(question, "en", &mut StdRng::seed_from_u64(23));

    assert_eq!(from_source.context, Context::Work);
    assert_eq!(from_source.context, from_rng.context);
    assert_eq!(from_source.cards, from_rng.cards);
    assert_eq!(from_source.system_prompt, from_rng.system_prompt);
    assert_eq!(from_source.user_prompt, from_rng.user_prompt);
}

#[tokio::test]
async fn completion_failure_propagates() {
    let engine = ReadingEngine::new(
        deck(),
        Arc::new(CannedClient::failing()),
        Arc::new(LabeledTextParser),
    );

    let prepared = engine.prepare("Che cosa succede adesso?", "it", &mut StdRng::seed_from_u64(1));
    let err = engine.generate(prepared).await.unwrap_err();

    assert!(matches!(err, ReadingError::Llm(_)));
    assert!(err.to_string().contains("missing API key"));
}

#[tokio::test]
async fn builtin_deck_draws_all_three() {
    let engine = ReadingEngine::new(
        Arc::new(KnowledgeBase::builtin()),
        Arc::new(CannedClient::ok("testo libero")),
        Arc::new(LabeledTextParser),
    );

    let prepared = engine.prepare("Che cosa succede adesso?", "it", &mut StdRng::seed_from_u64(9));
    let mut names: Vec<_> = prepared.cards.iter().map(|c| c.name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Il Mago", "La Papessa", "La Torre"]);

    let reading = engine.generate(prepared).await.unwrap();
    assert_eq!(reading.sections.len(), 1);
    assert_eq!(reading.sections[0].title, "Lettura");
}
