use std::{collections::HashMap, sync::Arc};

use ai_llm_service::{AiLlmError, CompletionClient, ProviderError};
use api::{
    build_router,
    core::{app_state::AppState, config::ServiceConfig},
};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use reading_engine::{Card, KnowledgeBase, LabeledTextParser, ReadingEngine};
use serde_json::{Value, json};
use tower::ServiceExt;

const KEY: &str = "tenet-test-key";

const ANSWER: &str = "Una fase di revisione.

**Stato – Il Mago**
Hai gli strumenti.

**Dinamica – La Luna**
Non tutto è chiaro.

**Direzione – Il Sole**
La strada tende ad aprirsi.

**Sintesi:** Muoviti con un passo alla volta.";

enum Stub {
    Answer(&'static str),
    Fail,
}

#[async_trait]
impl CompletionClient for Stub {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, AiLlmError> {
        match self {
            Stub::Answer(s) => Ok(s.to_string()),
            Stub::Fail => Err(ProviderError::MissingApiKey.into()),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn deck() -> KnowledgeBase {
    KnowledgeBase::new(
        ["Il Mago", "La Luna", "Il Sole", "La Torre", "Il Matto"]
            .iter()
            .enumerate()
            .map(|(i, n)| Card::new(i.to_string(), *n, &["simbolo"], None))
            .collect(),
    )
}

fn app_with(keys: &str, stub: Stub) -> Router {
    let env: HashMap<&str, &str> = [("TENET_API_KEYS", keys), ("TENET_DRAW_SEED", "5")]
        .into_iter()
        .collect();
    let config = ServiceConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
    let engine = ReadingEngine::new(Arc::new(deck()), Arc::new(stub), Arc::new(LabeledTextParser));
    build_router(Arc::new(AppState::new(config, engine)))
}

fn app() -> Router {
    app_with(&format!("other-key, {KEY}"), Stub::Answer(ANSWER))
}

fn get_health(auth: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(Method::GET).uri("/health");
    if let Some(a) = auth {
        b = b.header(header::AUTHORIZATION, a);
    }
    b.body(Body::empty()).unwrap()
}

fn post_reading(auth: Option<&str>, body: Value) -> Request<Body> {
    let mut b = Request::builder()
        .method(Method::POST)
        .uri("/v1/reading")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(a) = auth {
        b = b.header(header::AUTHORIZATION, a);
    }
    b.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn bearer() -> String {
    format!("Bearer {KEY}")
}

#[tokio::test]
async fn health_requires_a_valid_token() {
    for auth in [None, Some("Bearer nope"), Some("Basic abc"), Some("Bearer ")] {
        let (status, body) = send(app(), get_health(auth)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "auth = {auth:?}");
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn health_reports_service_and_model() {
    let (status, body) = send(app(), get_health(Some(&format!("bearer {KEY}")))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["service"], "tenet-core");
    assert_eq!(body["model"], "stub-model");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn empty_allow_list_rejects_everything() {
    let (status, _) = send(app_with("", Stub::Answer(ANSWER)), get_health(Some(&bearer()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        app_with(" ; ", Stub::Answer(ANSWER)),
        post_reading(Some("Bearer  "), json!({"question": "Dovrei cambiare casa?"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn reading_rejects_unknown_token_before_validation() {
    let (status, _) = send(app(), post_reading(Some("Bearer wrong"), json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn short_questions_are_bad_requests() {
    for q in [json!({"question": "  ciao  "}), json!({"question": ""}), json!({})] {
        let (status, body) = send(app(), post_reading(Some(&bearer()), q.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body = {q}");
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(body["error"]["message"], "Inserisci una domanda più completa.");
    }
}

#[tokio::test]
async fn unparsable_body_is_a_bad_request() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/v1/reading")
        .header(header::AUTHORIZATION, bearer())
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn unsupported_spread_is_a_bad_request() {
    for spread in ["celtic_cross", "", "THREE_CARDS_V1"] {
        let (status, body) = send(
            app(),
            post_reading(
                Some(&bearer()),
                json!({"question": "Dovrei lasciare il mio lavoro attuale?", "spread": spread}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "spread = {spread:?}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn end_to_end_reading() {
    let (status, body) = send(
        app(),
        post_reading(
            Some(&bearer()),
            json!({"question": "Dovrei lasciare il mio lavoro attuale?"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["context"], "work");
    assert_eq!(body["intro"], "Una fase di revisione.");
    assert_eq!(body["synthesis"], "Muoviti con un passo alla volta.");

    let sections = body["card_sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["title"], "Stato – Il Mago");
    assert_eq!(sections[0]["body"], "Hai gli strumenti.");

    let meta = &body["meta"];
    assert_eq!(meta["spread"], "three_cards_v1");
    assert_eq!(meta["deck"], "tarot_demo");
    assert_eq!(meta["language"], "it");
    assert_eq!(meta["version"], "stub-model");
    let cards = meta["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    let mut names: Vec<_> = cards.iter().map(|c| c.as_str().unwrap()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 3);

    assert_eq!(body["safety"]["no_predictions"], true);
}

#[tokio::test]
async fn explicit_fields_are_echoed() {
    let (status, body) = send(
        app(),
        post_reading(
            Some(&bearer()),
            json!({
                "question": "Come ritrovo equilibrio?",
                "spread": "three_cards_v1",
                "deck": "marsiglia",
                "language": "en"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"], "growth");
    assert_eq!(body["meta"]["deck"], "marsiglia");
    assert_eq!(body["meta"]["language"], "en");
}

#[tokio::test]
async fn wrongly_typed_optionals_fall_back_to_defaults() {
    let (status, body) = send(
        app(),
        post_reading(
            Some(&bearer()),
            json!({"question": "Dovrei lasciare il mio lavoro attuale?", "deck": 7, "language": 5}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["context"], "work");
    assert_eq!(body["meta"]["deck"], "tarot_demo");
    assert_eq!(body["meta"]["language"], "it");
}

#[tokio::test]
async fn non_string_spread_is_unsupported() {
    let (status, body) = send(
        app(),
        post_reading(
            Some(&bearer()),
            json!({"question": "Dovrei lasciare il mio lavoro attuale?", "spread": 3}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Unsupported spread: 3");
}

#[tokio::test]
async fn non_string_question_is_a_short_question() {
    let (status, body) = send(
        app(),
        post_reading(Some(&bearer()), json!({"question": 12345678})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Inserisci una domanda più completa.");
}

#[tokio::test]
async fn seeded_draw_is_stable_across_requests() {
    let q = json!({"question": "Che cosa mi serve sapere?"});
    let (_, a) = send(app(), post_reading(Some(&bearer()), q.clone())).await;
    let (_, b) = send(app(), post_reading(Some(&bearer()), q)).await;
    assert_eq!(a["meta"]["cards"], b["meta"]["cards"]);
    assert_eq!(a["context"], "neutral");
}

#[tokio::test]
async fn generation_failure_is_a_server_error() {
    let (status, body) = send(
        app_with(KEY, Stub::Fail),
        post_reading(
            Some(&bearer()),
            json!({"question": "Dovrei lasciare il mio lavoro attuale?"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"]["code"], "SERVER_ERROR");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("missing API key")
    );
}

#[tokio::test]
async fn cors_preflight_skips_auth() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/reading")
        .header(header::ORIGIN, "https://example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())
        .unwrap();

    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(
        res.headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let req = Request::builder()
        .uri("/v2/reading")
        .body(Body::empty())
        .unwrap();
    let res = app().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
