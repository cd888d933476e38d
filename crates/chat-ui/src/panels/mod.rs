pub mod assistants;
pub mod chat;
pub mod dialogs;
pub mod notices;
