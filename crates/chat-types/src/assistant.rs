use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::dialog::ResourceId;
use crate::validation::{not_blank, temperature_in_range};

pub const DEFAULT_TEMPERATURE: &str = "0.7";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// A named preset of model, prompt and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantProfile {
    pub id: ResourceId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub system_prompt: String,
    pub model: String,
    #[serde(default = "default_temperature", deserialize_with = "string_or_number")]
    pub temperature: String,
    #[serde(default = "default_max_tokens", deserialize_with = "max_tokens_or_default")]
    pub max_tokens: u32,
}

impl AssistantProfile {
    /// The four fields pushed onto a dialog when this profile is applied.
    pub fn to_settings(&self) -> DialogSettings {
        DialogSettings {
            system_prompt: Some(self.system_prompt.clone()),
            model: Some(self.model.clone()),
            temperature: Some(self.temperature.clone()),
            max_tokens: Some(self.max_tokens),
        }
    }
}

/// Payload for creating or editing an assistant profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AssistantDraft {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub system_prompt: String,
    #[validate(custom(function = "not_blank"))]
    pub model: String,
    #[validate(custom(function = "temperature_in_range"))]
    pub temperature: String,
    #[validate(range(min = 1))]
    pub max_tokens: u32,
}

impl Default for AssistantDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            system_prompt: String::new(),
            model: String::new(),
            temperature: default_temperature(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl From<&AssistantProfile> for AssistantDraft {
    fn from(p: &AssistantProfile) -> Self {
        Self {
            name: p.name.clone(),
            description: p.description.clone(),
            system_prompt: p.system_prompt.clone(),
            model: p.model.clone(),
            temperature: p.temperature.clone(),
            max_tokens: p.max_tokens,
        }
    }
}

/// Server-side settings record of a dialog. Unset fields fall back to the
/// backend defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct DialogSettings {
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    #[validate(custom(function = "temperature_in_range"))]
    pub temperature: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_tokens: Option<u32>,
}

impl DialogSettings {
    /// Drop blank text fields so they read as unset.
    pub fn normalized(mut self) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        self.system_prompt = keep(self.system_prompt);
        self.model = keep(self.model);
        self.temperature = keep(self.temperature);
        self
    }
}

/// Entry of `GET /models`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_temperature() -> String {
    DEFAULT_TEMPERATURE.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StringOrNumber {
    fn into_string(self) -> String {
        match self {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?
        .map(StringOrNumber::into_string)
        .unwrap_or_else(default_temperature))
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(StringOrNumber::into_string))
}

fn max_tokens_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(d)?.unwrap_or(DEFAULT_MAX_TOKENS))
}
