//! Outreach drafting against a stub of the generation API.

use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use shepherd_client::{OutreachConfig, OutreachDrafter, OutreachLanguage, DEFAULT_DAYS_ABSENT};

/// Serve `app` on a random port and return its base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    format!("http://{}", addr)
}

fn drafter(endpoint: &str) -> OutreachDrafter {
    drafter_in(endpoint, OutreachLanguage::English)
}

fn drafter_in(endpoint: &str, language: OutreachLanguage) -> OutreachDrafter {
    let config = OutreachConfig::default()
        .with_api_key("stub-key")
        .with_endpoint(endpoint)
        .with_language(language);
    OutreachDrafter::new(config).unwrap()
}

#[tokio::test]
async fn test_generated_text_is_returned() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(
            |Path(call): Path<String>, headers: axum::http::HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(call, "gemini-1.5-flash:generateContent");
                assert_eq!(headers["x-goog-api-key"], "stub-key");
                assert_eq!(body["generationConfig"]["maxOutputTokens"], 250);
                let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
                assert!(prompt.contains("Amani"));
                assert!(prompt.contains("21 days"));

                Json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": "Dear Amani, we miss you." }] } }]
                }))
            },
        ),
    );
    let endpoint = serve(app).await;

    let message = drafter(&endpoint).draft("Amani", DEFAULT_DAYS_ABSENT).await;
    assert_eq!(message, "Dear Amani, we miss you.");
}

#[tokio::test]
async fn test_error_status_falls_back_to_template() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota exceeded") }),
    );
    let endpoint = serve(app).await;

    let message = drafter(&endpoint).draft("Neema", 14).await;
    assert!(message.contains("Neema"));
    assert!(message.contains("Blessings"));
}

#[tokio::test]
async fn test_swahili_prompt_and_template() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|Json(body): Json<Value>| async move {
            let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
            if prompt.contains("anayeitwa Neema") && prompt.contains("siku 14") {
                (StatusCode::SERVICE_UNAVAILABLE, "overloaded".to_string())
            } else {
                (StatusCode::OK, json!({ "candidates": [{ "content": { "parts": [{ "text": prompt }] } }] }).to_string())
            }
        }),
    );
    let endpoint = serve(app).await;

    let message = drafter_in(&endpoint, OutreachLanguage::Swahili)
        .draft("Neema", 14)
        .await;
    assert!(message.contains("Neema,"));
    assert!(message.contains("Baraka"));
    assert!(!message.contains("Blessings"));
}

#[tokio::test]
async fn test_empty_candidates_fall_back_to_template() {
    let app = Router::new().route(
        "/v1beta/models/{call}",
        post(|| async { Json(json!({ "candidates": [] })) }),
    );
    let endpoint = serve(app).await;

    let message = drafter(&endpoint).draft("Baraka", 30).await;
    assert!(!message.is_empty());
    assert!(message.contains("Baraka"));
}

#[tokio::test]
async fn test_unreachable_endpoint_falls_back_to_template() {
    let message = drafter("http://127.0.0.1:9").draft("Juma", 21).await;
    assert!(message.contains("Juma"));
}
