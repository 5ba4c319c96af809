//! Shared helpers for tests that talk to a mocked Gemini endpoint

use mockito::{Matcher, Mock, ServerGuard};

pub const MODEL: &str = "test-model";
pub const API_KEY: &str = "test-key";
pub const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

/// Generation URL for [`MODEL`] on `server`
#[allow(dead_code)]
pub fn endpoint(server: &ServerGuard) -> String {
    format!("{}{}", server.url(), GENERATE_PATH)
}

/// Endpoint template with a `{model}` placeholder
#[allow(dead_code)]
pub fn endpoint_template(server: &ServerGuard) -> String {
    format!("{}/v1beta/models/{{model}}:generateContent", server.url())
}

/// Body of a successful `generateContent` reply
#[allow(dead_code)]
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Expects one POST to the generation path carrying `key` and replies with `status`/`body`
#[allow(dead_code)]
pub fn mock_generate(server: &mut ServerGuard, key: &str, status: usize, body: &str) -> Mock {
    server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), key.into()))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create()
}
