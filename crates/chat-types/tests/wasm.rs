//! WASM-target tests for chat-types.
//!
//! Covers the pieces that touch wasm-specific shims (clock, uuid)
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use chat_types::assistant::*;
use chat_types::config::*;
use chat_types::dialog::*;
use chat_types::event::*;
use chat_types::message::*;

// ─── Message Tests ───────────────────────────────────────

#[wasm_bindgen_test]
fn message_user_is_stamped() {
    let msg = Message::user("Hello");
    assert_eq!(msg.role, Role::User);
    let ts = msg.timestamp.expect("timestamp");
    assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
}

#[wasm_bindgen_test]
fn message_assistant_is_stamped() {
    let msg = Message::assistant("Hi!");
    assert_eq!(msg.role, Role::Assistant);
    assert!(!msg.time_label().is_empty());
}

// ─── Dialog Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn dialog_turn_response_parses() {
    let json = r#"{"conversation_history":[{"role":"user","content":"Hello"},{"role":"assistant","content":"Hi!"}],"dialog_id":1}"#;
    let resp: DialogTurnResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.dialog_id, ResourceId::Int(1));
    assert_eq!(resp.conversation_history[1].content, "Hi!");
}

#[wasm_bindgen_test]
fn create_dialog_request_rejects_blank() {
    let req = CreateDialogRequest { title: " ".to_string() };
    assert!(chat_types::validate(&req).is_err());
}

// ─── Assistant Tests ─────────────────────────────────────

#[wasm_bindgen_test]
fn assistant_profile_projection() {
    let json = r#"{"id":2,"name":"A","system_prompt":"p","model":"m","temperature":0.4,"max_tokens":300}"#;
    let a: AssistantProfile = serde_json::from_str(json).unwrap();
    let s = a.to_settings();
    assert_eq!(s.temperature.as_deref(), Some("0.4"));
    assert_eq!(s.max_tokens, Some(300));
}

// ─── Event Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn notice_ids_unique() {
    let a = Notice::error("x");
    let b = Notice::error("x");
    assert_ne!(a.id, b.id);
}

// ─── Config Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn config_resolution() {
    assert_eq!(resolve_api_base(None), PROXY_PREFIX);
    assert_eq!(resolve_api_base(Some("http://localhost:8000")), "http://localhost:8000");
    assert_eq!(ClientConfig::default().url("/dialogs"), "/api/dialogs");
}
