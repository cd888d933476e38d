pub mod message;
pub mod dialog;
pub mod assistant;
pub mod event;
pub mod config;
pub mod error;
pub mod validation;

#[cfg(test)]
mod tests;

pub use error::ChatError;
pub type Result<T> = std::result::Result<T, ChatError>;

/// Run `validator` checks and fold the report into a `ChatError::Validation`.
pub fn validate<T: validator::Validate>(value: &T) -> Result<()> {
    value.validate().map_err(ChatError::from)
}
