#[cfg(test)]
mod tests {
    use crate::assistant::*;
    use crate::config::*;
    use crate::dialog::*;
    use crate::error::*;
    use crate::event::*;
    use crate::message::*;
    use crate::validation::*;
    use chrono::{Local, TimeZone, Utc};

    // ─── Message Tests ───────────────────────────────────────

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn test_message_assistant() {
        let msg = Message::assistant("Hi!");
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "Hi!");
    }

    #[test]
    fn test_message_timestamp_is_rfc3339() {
        let msg = Message::user("x");
        let ts = msg.timestamp.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_message_without_timestamp_deserializes() {
        let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":"ok"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.timestamp.is_none());
        assert_eq!(msg.time_label(), "");
    }

    #[test]
    fn test_message_time_label_rfc3339() {
        let msg = Message {
            role: Role::User,
            content: "x".to_string(),
            timestamp: Some("2024-05-01T09:42:17+03:00".to_string()),
        };
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, 6, 42, 17)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        assert_eq!(msg.time_label(), expected);
    }

    #[test]
    fn test_message_time_label_naive_backend_format() {
        let msg = Message {
            role: Role::Assistant,
            content: "x".to_string(),
            timestamp: Some("2024-05-01T18:05:00.123456".to_string()),
        };
        // Offset-less backend times are UTC
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, 18, 5, 0)
            .unwrap()
            .with_timezone(&Local)
            .format("%H:%M")
            .to_string();
        assert_eq!(msg.time_label(), expected);
    }

    #[test]
    fn test_parse_timestamp_same_instant_across_offsets() {
        let utc = parse_timestamp("2024-05-01T06:42:17Z").unwrap();
        let moscow = parse_timestamp("2024-05-01T09:42:17+03:00").unwrap();
        let naive = parse_timestamp("2024-05-01T06:42:17").unwrap();
        assert_eq!(utc, moscow);
        assert_eq!(utc, naive);
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), r#""assistant""#);
        let role: Role = serde_json::from_str(r#""system""#).unwrap();
        assert_eq!(role, Role::System);
    }

    #[test]
    fn test_role_unknown_rejected() {
        assert!(serde_json::from_str::<Role>(r#""tool""#).is_err());
    }

    // ─── Dialog Tests ────────────────────────────────────────

    #[test]
    fn test_resource_id_integer() {
        let id: ResourceId = serde_json::from_str("42").unwrap();
        assert_eq!(id, ResourceId::Int(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn test_resource_id_string() {
        let id: ResourceId = serde_json::from_str(r#""d1""#).unwrap();
        assert_eq!(id, ResourceId::from("d1"));
        assert_eq!(id.to_string(), "d1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""d1""#);
    }

    #[test]
    fn test_dialog_list_entry_has_no_messages() {
        let json = r#"{"id":1,"title":"Project X","updated_at":"2024-05-01T10:00:00","created_at":"2024-05-01T09:00:00","is_active":true}"#;
        let dialog: Dialog = serde_json::from_str(json).unwrap();
        assert_eq!(dialog.id, ResourceId::Int(1));
        assert_eq!(dialog.title, "Project X");
        assert!(dialog.messages.is_none());
        assert!(dialog.into_messages().is_empty());
    }

    #[test]
    fn test_dialog_with_messages() {
        let json = r#"{"id":"d2","title":"T","updated_at":"2024-05-01T10:00:00",
            "messages":[{"role":"user","content":"a"},{"role":"assistant","content":"b"}]}"#;
        let dialog: Dialog = serde_json::from_str(json).unwrap();
        let messages = dialog.into_messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, "b");
    }

    #[test]
    fn test_dialog_null_messages() {
        let json = r#"{"id":3,"title":"T","updated_at":"","messages":null}"#;
        let dialog: Dialog = serde_json::from_str(json).unwrap();
        assert!(dialog.into_messages().is_empty());
    }

    #[test]
    fn test_dialog_updated_label() {
        let json = r#"{"id":3,"title":"T","updated_at":"2024-05-01T10:07:00"}"#;
        let dialog: Dialog = serde_json::from_str(json).unwrap();
        let expected = Utc
            .with_ymd_and_hms(2024, 5, 1, 10, 7, 0)
            .unwrap()
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();
        assert_eq!(dialog.updated_label(), expected);
    }

    #[test]
    fn test_dialog_file_parses() {
        let json = r#"{"id":12,"filename":"notes.pdf","file_type":"application/pdf","file_size":1536,"created_at":"2024-05-01T10:07:00"}"#;
        let file: DialogFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.id, ResourceId::Int(12));
        assert_eq!(file.filename, "notes.pdf");
        assert_eq!(file.size_label(), "1.5 KB");
    }

    #[test]
    fn test_dialog_file_size_label() {
        let file = |file_size| DialogFile {
            id: ResourceId::from("f"),
            filename: "f".to_string(),
            file_type: String::new(),
            file_size,
            created_at: None,
        };
        assert_eq!(file(0).size_label(), "0 Bytes");
        assert_eq!(file(512).size_label(), "512 Bytes");
        assert_eq!(file(3 * 1024 * 1024).size_label(), "3 MB");
        assert_eq!(file(1_234_567).size_label(), "1.18 MB");
    }

    #[test]
    fn test_turn_request_null_dialog_id() {
        let req = DialogTurnRequest {
            message: "Hello".to_string(),
            dialog_id: None,
            conversation_history: vec![],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert!(value["dialog_id"].is_null());
        assert_eq!(value["message"], "Hello");
        assert!(value["conversation_history"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_turn_response_deserialization() {
        let json = r#"{"conversation_history":[{"role":"user","content":"Hello"},{"role":"assistant","content":"Hi!"}],"dialog_id":"d1"}"#;
        let resp: DialogTurnResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.dialog_id, ResourceId::from("d1"));
        assert_eq!(resp.conversation_history.len(), 2);
    }

    #[test]
    fn test_page_query() {
        assert_eq!(Page::default().query(), "skip=0&limit=100");
        assert_eq!(Page { skip: 20, limit: 10 }.query(), "skip=20&limit=10");
    }

    #[test]
    fn test_create_dialog_request_validation() {
        let ok = CreateDialogRequest { title: "Project X".to_string() };
        assert!(crate::validate(&ok).is_ok());

        let blank = CreateDialogRequest { title: "   ".to_string() };
        let err = crate::validate(&blank).unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert!(err.to_string().contains("title"));
    }

    // ─── Assistant Tests ─────────────────────────────────────

    #[test]
    fn test_dialog_settings_validation() {
        let ok = DialogSettings {
            temperature: Some("0.4".to_string()),
            max_tokens: Some(500),
            ..Default::default()
        };
        assert!(crate::validate(&ok).is_ok());
        assert!(crate::validate(&DialogSettings::default()).is_ok());

        let hot = DialogSettings { temperature: Some("1.7".to_string()), ..Default::default() };
        let err = crate::validate(&hot).unwrap_err();
        assert!(err.to_string().contains("temperature"));

        let empty = DialogSettings { max_tokens: Some(0), ..Default::default() };
        assert!(crate::validate(&empty).is_err());
    }

    #[test]
    fn test_dialog_settings_normalized_drops_blanks() {
        let settings = DialogSettings {
            system_prompt: Some("  ".to_string()),
            model: Some("gpt-4o".to_string()),
            temperature: Some(String::new()),
            max_tokens: Some(100),
        }
        .normalized();
        assert_eq!(settings.system_prompt, None);
        assert_eq!(settings.model.as_deref(), Some("gpt-4o"));
        assert_eq!(settings.temperature, None);
        assert_eq!(settings.max_tokens, Some(100));
    }

    #[test]
    fn test_assistant_temperature_as_string() {
        let json = r#"{"id":1,"name":"Analyst","system_prompt":"Be precise","model":"gpt-4o","temperature":"0.3","max_tokens":2000}"#;
        let a: AssistantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(a.temperature, "0.3");
        assert_eq!(a.max_tokens, 2000);
        assert!(a.description.is_none());
    }

    #[test]
    fn test_assistant_temperature_as_number() {
        let json = r#"{"id":1,"name":"A","system_prompt":"p","model":"m","temperature":0.5,"max_tokens":100}"#;
        let a: AssistantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(a.temperature, "0.5");
    }

    #[test]
    fn test_assistant_nullable_defaults() {
        let json = r#"{"id":1,"name":"A","system_prompt":"p","model":"m","temperature":null,"max_tokens":null}"#;
        let a: AssistantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(a.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(a.max_tokens, DEFAULT_MAX_TOKENS);

        let json = r#"{"id":1,"name":"A","system_prompt":"p","model":"m"}"#;
        let a: AssistantProfile = serde_json::from_str(json).unwrap();
        assert_eq!(a.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(a.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_assistant_to_settings() {
        let a = AssistantProfile {
            id: ResourceId::Int(7),
            name: "Analyst".to_string(),
            description: Some("desc".to_string()),
            system_prompt: "Be precise".to_string(),
            model: "gpt-4o".to_string(),
            temperature: "0.2".to_string(),
            max_tokens: 512,
        };
        let s = a.to_settings();
        assert_eq!(s.system_prompt.as_deref(), Some("Be precise"));
        assert_eq!(s.model.as_deref(), Some("gpt-4o"));
        assert_eq!(s.temperature.as_deref(), Some("0.2"));
        assert_eq!(s.max_tokens, Some(512));

        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_dialog_settings_partial() {
        let s: DialogSettings = serde_json::from_str(r#"{"model":"gpt-4o","temperature":0.7}"#).unwrap();
        assert_eq!(s.model.as_deref(), Some("gpt-4o"));
        assert_eq!(s.temperature.as_deref(), Some("0.7"));
        assert!(s.system_prompt.is_none());
        assert!(s.max_tokens.is_none());
    }

    #[test]
    fn test_assistant_draft_valid() {
        let draft = AssistantDraft {
            name: "Analyst".to_string(),
            system_prompt: "Be precise".to_string(),
            model: "gpt-4o".to_string(),
            ..AssistantDraft::default()
        };
        assert!(crate::validate(&draft).is_ok());
    }

    #[test]
    fn test_assistant_draft_default_is_invalid() {
        let err = crate::validate(&AssistantDraft::default()).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("name"));
        assert!(text.contains("model"));
        assert!(text.contains("system_prompt"));
    }

    #[test]
    fn test_assistant_draft_bad_temperature_and_tokens() {
        let draft = AssistantDraft {
            name: "A".to_string(),
            system_prompt: "p".to_string(),
            model: "m".to_string(),
            temperature: "1.5".to_string(),
            max_tokens: 0,
            description: None,
        };
        let text = crate::validate(&draft).unwrap_err().to_string();
        assert!(text.contains("temperature"));
        assert!(text.contains("max_tokens"));
    }

    #[test]
    fn test_draft_from_profile() {
        let a = AssistantProfile {
            id: ResourceId::Int(1),
            name: "A".to_string(),
            description: None,
            system_prompt: "p".to_string(),
            model: "m".to_string(),
            temperature: "0.1".to_string(),
            max_tokens: 10,
        };
        let draft = AssistantDraft::from(&a);
        assert_eq!(draft.name, "A");
        assert_eq!(draft.temperature, "0.1");
        assert_eq!(draft.max_tokens, 10);
    }

    // ─── Validation Tests ────────────────────────────────────

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_temperature_bounds() {
        assert!(temperature_in_range("0").is_ok());
        assert!(temperature_in_range("0.0").is_ok());
        assert!(temperature_in_range("1.0").is_ok());
        assert!(temperature_in_range(" 0.7 ").is_ok());
        assert!(temperature_in_range("1.01").is_err());
        assert!(temperature_in_range("-0.1").is_err());
        assert!(temperature_in_range("warm").is_err());
    }

    // ─── Event Tests ─────────────────────────────────────────

    #[test]
    fn test_notice_ids_unique() {
        let a = Notice::success("done");
        let b = Notice::success("done");
        assert_ne!(a.id, b.id);
        assert_eq!(a.level, NoticeLevel::Success);
    }

    #[test]
    fn test_session_event_serialization() {
        let event = SessionEvent::ActiveDialogChanged { dialog_id: Some(ResourceId::Int(5)) };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ActiveDialogChanged"));
        assert!(json.contains('5'));
    }

    // ─── Config Tests ────────────────────────────────────────

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base, "/api");
        assert_eq!(config.timeout_ms, 120_000);
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn test_resolve_api_base_unset_or_blank() {
        assert_eq!(resolve_api_base(None), "/api");
        assert_eq!(resolve_api_base(Some("")), "/api");
        assert_eq!(resolve_api_base(Some("   ")), "/api");
    }

    #[test]
    fn test_resolve_api_base_direct_port() {
        assert_eq!(resolve_api_base(Some("http://localhost:8001")), "http://localhost:8001");
        assert_eq!(resolve_api_base(Some("http://127.0.0.1:8000")), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_resolve_api_base_other_url_uses_proxy() {
        assert_eq!(resolve_api_base(Some("https://example.com")), "/api");
    }

    #[test]
    fn test_config_url_join() {
        let mut config = ClientConfig::default();
        assert_eq!(config.url("/dialogs"), "/api/dialogs");
        config.api_base = "http://localhost:8000/".to_string();
        assert_eq!(config.url("/chat/dialog"), "http://localhost:8000/chat/dialog");
    }

    // ─── Error Tests ─────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = ChatError::Server { status: 404, message: "Dialog not found".to_string() };
        assert_eq!(err.to_string(), "Dialog not found");
        assert_eq!(ChatError::Timeout(120000).to_string(), "Timeout after 120000ms");
        assert_eq!(
            ChatError::Network("offline".to_string()).to_string(),
            "Network error: offline"
        );
    }

    #[test]
    fn test_error_from_serde() {
        let err: ChatError = serde_json::from_str::<Message>("{not json").unwrap_err().into();
        assert!(matches!(err, ChatError::Serialization(_)));
    }
}
