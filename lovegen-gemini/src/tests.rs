use super::*;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn serialize_request_matches_expected_shape() {
    let request = GenerateContentRequest::new("Generate a main.lua");
    let value = serde_json::to_value(request).expect("serialize request");

    let expected = serde_json::json!({
        "contents": [{"parts": [{"text": "Generate a main.lua"}]}],
    });

    assert_eq!(value, expected);
}

#[test]
fn endpoint_uses_model_and_default_base() {
    let client = GeminiClient::new("key", "gemini-2.0-flash").expect("client");
    let expected = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
    assert_eq!(client.endpoint(), expected);
    assert_eq!(client.model(), "gemini-2.0-flash");
}

#[test]
fn endpoint_ignores_trailing_slash_on_base() {
    assert_eq!(
        endpoint_url("http://localhost:8080/v1beta/", "m"),
        "http://localhost:8080/v1beta/models/m:generateContent"
    );
}

#[test]
fn empty_api_key_is_rejected() {
    let error = GeminiClient::new("   ", "gemini-2.0-flash").expect_err("missing key");
    assert!(matches!(error, GeminiError::MissingApiKey));

    let error = generate_text("", "gemini-2.0-flash", "prompt").expect_err("missing key");
    assert!(matches!(error, GeminiError::MissingApiKey));
}

#[test]
fn into_text_concatenates_parts_in_order() {
    let json = r#"
    {
        "candidates": [
            {
                "content": {
                    "parts": [
                        {"text": "```lua\nlocal score"},
                        {"text": " = 0\n```"}
                    ],
                    "role": "model"
                },
                "finishReason": "STOP"
            },
            {
                "content": {"parts": [{"text": "ignored"}]}
            }
        ]
    }
    "#;

    let response: GenerateContentResponse = serde_json::from_str(json).expect("parse response");
    let text = response.into_text().expect("text present");
    assert_eq!(text, "```lua\nlocal score = 0\n```");
}

#[test]
fn into_text_skips_parts_without_text() {
    let json = r#"{"candidates": [{"content": {"parts": [{"text": "a"}, {}, {"text": "b"}]}}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(json).expect("parse response");
    assert_eq!(response.into_text().expect("text present"), "ab");
}

#[test]
fn missing_parts_surface_prompt_feedback() {
    let json = r#"
    {
        "promptFeedback": {
            "blockReason": "SAFETY",
            "safetyRatings": [
                {"category": "HARM_CATEGORY_DANGEROUS_CONTENT", "probability": "HIGH"}
            ]
        }
    }
    "#;

    let response: GenerateContentResponse = serde_json::from_str(json).expect("parse response");
    let error = response.into_text().expect_err("no parts");
    let feedback = error.feedback().expect("feedback kept");
    assert_eq!(feedback.block_reason.as_deref(), Some("SAFETY"));
    assert_eq!(
        feedback.to_string(),
        "block reason: SAFETY; safety ratings: HARM_CATEGORY_DANGEROUS_CONTENT=HIGH"
    );
}

#[test]
fn candidate_without_content_is_empty() {
    let json = r#"{"candidates": [{"finishReason": "RECITATION"}]}"#;
    let response: GenerateContentResponse = serde_json::from_str(json).expect("parse response");

    match response.into_text() {
        Err(GeminiError::EmptyResponse {
            feedback,
            finish_reason,
        }) => {
            assert!(feedback.is_none());
            assert_eq!(finish_reason.as_deref(), Some("RECITATION"));
        }
        other => panic!("expected empty response, got {other:?}"),
    }
}

#[test]
fn feedback_without_block_reason_displays_none() {
    let feedback = PromptFeedback {
        block_reason: None,
        safety_ratings: Vec::new(),
    };
    assert_eq!(feedback.to_string(), "block reason: none");
}

#[tokio::test]
async fn client_posts_prompt_and_reads_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_json(serde_json::json!({
            "contents": [{"parts": [{"text": "make a game"}]}],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "love.load = function() end"}]}}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = request_text(&server, "test-key").await.expect("generated text");
    assert_eq!(text, "love.load = function() end");
}

#[tokio::test]
async fn error_status_is_reported_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(serde_json::json!({"error": {"code": 403}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let error = request_text(&server, "bad-key").await.expect_err("forbidden");

    match error {
        GeminiError::Http(inner) => {
            assert_eq!(inner.status(), Some(reqwest::StatusCode::FORBIDDEN));
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_reported_as_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let error = request_text(&server, "key").await.expect_err("bad body");
    assert!(matches!(error, GeminiError::Http(_)));
}

#[tokio::test]
async fn slow_generation_is_awaited_past_thirty_seconds() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "candidates": [{"content": {"parts": [{"text": "-- slow"}]}}],
                }))
                .set_delay(Duration::from_secs(33)),
        )
        .mount(&server)
        .await;

    let text = request_text(&server, "key").await.expect("slow reply");
    assert_eq!(text, "-- slow");
}

/// Run the blocking client against `server` off the async runtime.
async fn request_text(server: &MockServer, api_key: &'static str) -> Result<String, GeminiError> {
    let base_url = format!("{}/v1beta", server.uri());
    tokio::task::spawn_blocking(move || {
        GeminiClient::new(api_key, "gemini-2.0-flash")?
            .with_base_url(base_url)
            .generate_text("make a game")
    })
    .await
    .expect("blocking request task")
}

#[test]
fn debug_output_hides_api_key() {
    let client = GeminiClient::new("very-secret", "gemini-2.0-flash").expect("client");
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("very-secret"));
    assert!(rendered.contains("gemini-2.0-flash"));
}
