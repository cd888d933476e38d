//! Field validators shared by request types, plus conversion of
//! `validator` reports into a single user-facing line.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

pub const TEMPERATURE_MIN: f32 = 0.0;
pub const TEMPERATURE_MAX: f32 = 1.0;

/// Trimmed input must be non-empty.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::new("blank").with_message(Cow::from("must not be empty")));
    }
    Ok(())
}

/// Temperature travels as a numeric string and must lie in [0.0, 1.0].
pub fn temperature_in_range(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f32>() {
        Ok(t) if (TEMPERATURE_MIN..=TEMPERATURE_MAX).contains(&t) => Ok(()),
        Ok(_) => Err(ValidationError::new("range")
            .with_message(Cow::from("must be between 0.0 and 1.0"))),
        Err(_) => Err(ValidationError::new("number").with_message(Cow::from("must be a number"))),
    }
}

/// `"field: message"` for every failing field, sorted by field name.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter()
                .map(|e| {
                    let msg = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", field, msg)
                })
                .collect::<Vec<_>>()
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
