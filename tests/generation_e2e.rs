//! End-to-end generation tests against a mocked Gemini endpoint
//!
//! These exercise the real `GeminiClient` over HTTP together with the orchestrator.

mod support;

use briefcraft::attachments::Attachment;
use briefcraft::generation::{fallback_readme, FALLBACK_NOTE, SYSTEM_INSTRUCTION};
use briefcraft::{
    GeminiClient, GenerationOrchestrator, GenerationRequest, Round, StageOutcome,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use support::{endpoint, gemini_reply, mock_generate, API_KEY, GENERATE_PATH, MODEL};
use tempfile::TempDir;

fn orchestrator(endpoint: String, temp: &TempDir) -> GenerationOrchestrator {
    let client = GeminiClient::with_timeouts(
        endpoint,
        MODEL,
        API_KEY,
        Duration::from_secs(10),
        Duration::from_secs(5),
    )
    .unwrap();
    GenerationOrchestrator::new(Arc::new(client), temp.path())
}

#[test]
fn test_fenced_reply_is_split_into_files() {
    let mut server = Server::new();
    let mock = mock_generate(
        &mut server,
        API_KEY,
        200,
        &gemini_reply("```html\n<p>hi</p>\n```---README.md---```\n# Notes\n```"),
    );
    let temp = TempDir::new().unwrap();

    let (result, report) =
        orchestrator(endpoint(&server), &temp).generate_with_report(&GenerationRequest::new("Say hi"));

    mock.assert();
    assert_eq!(result.files.index_html, "<p>hi</p>");
    assert_eq!(result.files.readme, "# Notes");
    assert!(!report.used_fallback_html());
    assert!(!report.used_fallback_readme());
}

#[test]
fn test_request_wire_format() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::UrlEncoded("key".into(), API_KEY.into()))
        .match_header("content-type", "application/json")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "systemInstruction": {"parts": [{"text": SYSTEM_INSTRUCTION}]}
            })),
            Matcher::Regex("A color picker".to_string()),
            Matcher::Regex("Shows hex value".to_string()),
        ]))
        .with_body(gemini_reply("<html></html>"))
        .expect(1)
        .create();
    let temp = TempDir::new().unwrap();

    let (result, report) = orchestrator(endpoint(&server), &temp).generate_with_report(
        &GenerationRequest::new("A color picker").with_checks(["Shows hex value"]),
    );

    mock.assert();
    assert_eq!(result.files.index_html, "<html></html>");
    assert!(!report.llm_failed());
}

#[test]
fn test_round_two_prompt_includes_previous_readme() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("# Kitchen Timer v1".to_string()),
            Matcher::Regex("Add sound alerts".to_string()),
            Matcher::Regex("Revise and enhance this project".to_string()),
        ]))
        .with_body(gemini_reply("<html></html>"))
        .expect(1)
        .create();
    let temp = TempDir::new().unwrap();

    orchestrator(endpoint(&server), &temp).generate(
        &GenerationRequest::new("Add sound alerts")
            .with_round(Round::Revision)
            .with_previous_readme("# Kitchen Timer v1"),
    );

    mock.assert();
}

#[test]
fn test_round_one_prompt_ignores_previous_readme() {
    let mut server = Server::new();
    let leaked = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("Should Not Appear|Revise and enhance".to_string()))
        .with_body(gemini_reply("<html>leaked</html>"))
        .expect(0)
        .create();
    let clean = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::Regex("Start over".to_string()))
        .with_body(gemini_reply("<html></html>"))
        .expect(1)
        .create();
    let temp = TempDir::new().unwrap();

    orchestrator(endpoint(&server), &temp)
        .generate(&GenerationRequest::new("Start over").with_previous_readme("# Should Not Appear"));

    leaked.assert();
    clean.assert();
}

#[test]
fn test_error_status_falls_back() {
    let mut server = Server::new();
    let _mock = mock_generate(
        &mut server,
        API_KEY,
        500,
        r#"{"error": {"code": 500, "message": "internal"}}"#,
    );
    let temp = TempDir::new().unwrap();

    let (result, report) = orchestrator(endpoint(&server), &temp)
        .generate_with_report(&GenerationRequest::new("A metronome"));

    assert!(result.files.index_html.contains("A metronome"));
    assert!(result.files.readme.contains(FALLBACK_NOTE));
    assert!(matches!(
        report.outcomes.as_slice(),
        [StageOutcome::TransportError { kind: "api", .. }]
    ));
}

#[test]
fn test_reply_without_text_falls_back() {
    let mut server = Server::new();
    let _mock = mock_generate(
        &mut server,
        API_KEY,
        200,
        r#"{"candidates": [{"finishReason": "SAFETY"}]}"#,
    );
    let temp = TempDir::new().unwrap();

    let (result, report) = orchestrator(endpoint(&server), &temp)
        .generate_with_report(&GenerationRequest::new("A chat bot"));

    assert!(result.files.index_html.contains("A chat bot"));
    assert!(result.files.readme.contains(FALLBACK_NOTE));
    assert_eq!(
        report.outcomes,
        vec![StageOutcome::EmptyGeneration {
            finish_reason: Some("SAFETY".to_string())
        }]
    );
}

#[test]
fn test_undecodable_body_falls_back() {
    let mut server = Server::new();
    let _mock = mock_generate(&mut server, API_KEY, 200, "not json at all");
    let temp = TempDir::new().unwrap();

    let (result, report) = orchestrator(endpoint(&server), &temp)
        .generate_with_report(&GenerationRequest::new("A calendar"));

    assert!(result.files.index_html.contains("A calendar"));
    assert!(matches!(
        report.outcomes.as_slice(),
        [StageOutcome::TransportError {
            kind: "invalid_response",
            ..
        }]
    ));
}

#[test]
fn test_reply_without_marker_gets_fallback_readme() {
    let mut server = Server::new();
    let _mock = mock_generate(&mut server, API_KEY, 200, &gemini_reply("<main>just markup</main>"));
    let temp = TempDir::new().unwrap();
    let request = GenerationRequest::new("A gallery").with_checks(["Has thumbnails"]);

    let result = orchestrator(endpoint(&server), &temp).generate(&request);

    assert_eq!(result.files.index_html, "<main>just markup</main>");
    assert_eq!(
        result.files.readme,
        fallback_readme("A gallery", &request.checks, "", Round::Initial)
    );
}

#[test]
fn test_attachments_are_written_byte_for_byte() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", GENERATE_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"- logo\.png \(image/png\): 256 bytes \(Binary file".to_string()),
            Matcher::Regex(r"- readme\.md \(text/markdown\): preview: # Über".to_string()),
        ]))
        .with_body(gemini_reply("<html></html>"))
        .expect(1)
        .create();
    let temp = TempDir::new().unwrap();
    let png: Vec<u8> = (0..=255u8).collect();
    let request = GenerationRequest::new("Show the logo").with_attachments(vec![
        Attachment::from_bytes("logo.png", "image/png", &png),
        Attachment::from_bytes("readme.md", "text/markdown", "# Über".as_bytes()),
        Attachment::new("remote.jpg", "https://example.com/remote.jpg"),
    ]);

    let result = orchestrator(endpoint(&server), &temp).generate(&request);

    mock.assert();
    assert_eq!(result.attachments.len(), 2);
    let logo = &result.attachments[0];
    assert_eq!(logo.size, png.len() as u64);
    assert_eq!(fs::read(&logo.path).unwrap(), png);
    assert_eq!(fs::read(&result.attachments[1].path).unwrap(), "# Über".as_bytes());
}
