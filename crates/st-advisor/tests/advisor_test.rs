use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use st_advisor::{AdvisorError, GeminiProvider, MockProvider, StrategyAdvisor, StrategyProvider};
use st_core::config::AdvisorConfig;
use st_core::seed::demo_tickets;
use st_core::types::{AiStrategy, PriorityLevel, FALLBACK_ANALYSIS};

const GOOD: &str = r#"{
    "analysis": "Two units in the pits. Push the QA stint.",
    "recommendations": ["Unblock ST-102", "Pit ST-106"],
    "priorityLevel": "STABLE"
}"#;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn successful_briefing_is_passed_through() {
    let mock = MockProvider::new().with_response(GOOD);
    let advisor = StrategyAdvisor::new(Arc::new(mock.clone()));

    let advice = advisor.advise(&demo_tickets()).await;
    assert!(!advice.is_fallback());
    assert_eq!(advice.strategy.priority_level, PriorityLevel::Stable);
    assert_eq!(advice.strategy.recommendations.len(), 2);

    let prompts = mock.captured_prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("ST-107"));
}

#[tokio::test]
async fn provider_failure_resolves_to_fallback() {
    let mock = MockProvider::new().with_error(AdvisorError::Http("connection reset".into()));
    let advisor = StrategyAdvisor::new(Arc::new(mock));

    let advice = advisor.advise(&demo_tickets()).await;
    assert_eq!(advice.strategy, AiStrategy::fallback());
    assert_eq!(advice.strategy.priority_level, PriorityLevel::Critical);
    assert_eq!(advice.strategy.analysis, FALLBACK_ANALYSIS);
    assert!(!advice.strategy.recommendations.is_empty());
    assert!(advice.error.unwrap().contains("connection reset"));
}

#[tokio::test]
async fn malformed_output_resolves_to_fallback() {
    let mock = MockProvider::new().with_response("the pit wall is thinking...");
    let advisor = StrategyAdvisor::new(Arc::new(mock));

    let strategy = advisor.get_strategy(&demo_tickets()).await;
    assert_eq!(strategy, AiStrategy::fallback());
}

#[tokio::test]
async fn no_retry_on_failure() {
    let mock = MockProvider::new().with_error(AdvisorError::Timeout);
    let advisor = StrategyAdvisor::new(Arc::new(mock.clone()));

    let _ = advisor.advise(&demo_tickets()).await;
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn offline_advisor_never_calls_out() {
    let advisor = StrategyAdvisor::offline("no key");
    assert!(advisor.is_offline());

    let advice = advisor.advise(&demo_tickets()).await;
    assert_eq!(advice.strategy, AiStrategy::fallback());
    assert!(advice.error.unwrap().contains("no key"));
}

#[tokio::test]
async fn disabled_config_is_offline() {
    let cfg = AdvisorConfig {
        enabled: false,
        ..AdvisorConfig::default()
    };
    assert!(StrategyAdvisor::from_config(&cfg).is_offline());
}

#[tokio::test]
async fn missing_credential_is_offline() {
    let cfg = AdvisorConfig {
        api_key_env: "STRATOS_ADVISOR_TEST_MISSING".into(),
        ..AdvisorConfig::default()
    };
    std::env::remove_var("STRATOS_ADVISOR_TEST_MISSING");
    let advisor = StrategyAdvisor::from_config(&cfg);
    assert!(advisor.is_offline());
    let advice = advisor.advise(&[]).await;
    assert!(advice.error.unwrap().contains("STRATOS_ADVISOR_TEST_MISSING"));
}

// ---------------------------------------------------------------------------
// Gemini over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gemini_round_trip_against_fake_server() {
    let app = Router::new().route(
        "/v1beta/models/{model}",
        post(|headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
            assert_eq!(headers["x-goog-api-key"], "test-key");
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or("");
            assert!(prompt.contains("ST-101"));
            Json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": GOOD }], "role": "model" },
                    "finishReason": "STOP"
                }]
            }))
        }),
    );
    let base = serve(app).await;

    let provider = GeminiProvider::new("test-key", "gemini-test").with_base_url(base);
    let advisor = StrategyAdvisor::new(Arc::new(provider));
    let advice = advisor.advise(&demo_tickets()).await;

    assert!(!advice.is_fallback(), "unexpected error: {:?}", advice.error);
    assert_eq!(advice.strategy.priority_level, PriorityLevel::Stable);
}

#[tokio::test]
async fn gemini_error_status_maps_to_api_error() {
    let app = Router::new().route(
        "/v1beta/models/{model}",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exhausted") }),
    );
    let base = serve(app).await;

    let provider = GeminiProvider::new("k", "gemini-test").with_base_url(base);
    match provider.generate("brief").await {
        Err(AdvisorError::Api { status, message }) => {
            assert_eq!(status, 429);
            assert!(message.contains("quota exhausted"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_empty_candidates_is_parse_error() {
    let app = Router::new().route(
        "/v1beta/models/{model}",
        post(|| async { Json(json!({ "candidates": [] })) }),
    );
    let base = serve(app).await;

    let provider = GeminiProvider::new("k", "gemini-test").with_base_url(base);
    assert!(matches!(
        provider.generate("brief").await,
        Err(AdvisorError::Parse(_))
    ));
}

#[tokio::test]
async fn gemini_connection_refused_falls_back() {
    // Nothing listens on this port.
    let provider = GeminiProvider::new("k", "gemini-test").with_base_url("http://127.0.0.1:19998");
    let advisor = StrategyAdvisor::new(Arc::new(provider));

    let advice = advisor.advise(&demo_tickets()).await;
    assert_eq!(advice.strategy, AiStrategy::fallback());
    assert!(advice.is_fallback());
}
