//! WASM-target tests for chat-platform (Node.js runtime).
//!
//! Covers response decoding and endpoint paths under wasm32-unknown-unknown
//! via `wasm-pack test --node`. Requests against a live backend are not
//! exercised here.

use wasm_bindgen_test::*;

use chat_platform::http::paths;
use chat_platform::http::transport::{decode, ensure_success, server_error_message};
use chat_platform::HttpBackend;
use chat_types::assistant::AssistantProfile;
use chat_types::config::ClientConfig;
use chat_types::dialog::{Dialog, Page, ResourceId};
use chat_types::ChatError;

// ─── Error mapping ───────────────────────────────────────

#[wasm_bindgen_test]
fn error_detail_wins() {
    assert_eq!(server_error_message(400, r#"{"detail":"Title required"}"#), "Title required");
}

#[wasm_bindgen_test]
fn error_generic_fallback() {
    assert_eq!(server_error_message(500, ""), "Server error: 500");
}

#[wasm_bindgen_test]
fn non_2xx_is_server_error() {
    let err = ensure_success(404, r#"{"message":"gone"}"#).unwrap_err();
    assert_eq!(err, ChatError::Server { status: 404, message: "gone".into() });
}

// ─── Decoding ────────────────────────────────────────────

#[wasm_bindgen_test]
fn decode_dialog_with_history() {
    let body = r#"{
        "id": 3, "title": "T", "updated_at": "2024-05-01T10:00:00",
        "messages": [{"role": "user", "content": "q"}]
    }"#;
    let d: Dialog = decode(200, body).unwrap();
    assert_eq!(d.into_messages().len(), 1);
}

#[wasm_bindgen_test]
fn decode_assistant_with_string_temperature() {
    let body = r#"[{"id": 1, "name": "A", "system_prompt": "p", "model": "m",
                   "temperature": "0.2", "max_tokens": 500}]"#;
    let list: Vec<AssistantProfile> = decode(200, body).unwrap();
    assert_eq!(list[0].temperature, "0.2");
    assert_eq!(list[0].max_tokens, 500);
}

// ─── Backend ─────────────────────────────────────────────

#[wasm_bindgen_test]
fn backend_keeps_config() {
    let backend = HttpBackend::new(ClientConfig::default());
    assert_eq!(backend.config().api_base, "/api");
    assert_eq!(backend.config().timeout_ms, 120_000);
}

#[wasm_bindgen_test]
fn paths_for_ids() {
    assert_eq!(paths::dialog_settings(&ResourceId::from("d1")), "/dialogs/d1/settings");
    assert_eq!(paths::dialog_list(Page::first(100)), "/dialogs?skip=0&limit=100");
    assert_eq!(
        paths::dialog_file(&ResourceId::from("d1"), &ResourceId::from("f9")),
        "/dialogs/d1/files/f9"
    );
}
