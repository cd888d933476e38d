//! Endpoint paths, relative to `ClientConfig::api_base`.

use chat_types::dialog::{Page, ResourceId};

pub const DIALOGS: &str = "/dialogs";
pub const DIALOG_TURN: &str = "/chat/dialog";
pub const ASSISTANTS: &str = "/assistants";
pub const MODELS: &str = "/models";

pub fn dialog_list(page: Page) -> String {
    format!("{}?{}", DIALOGS, page.query())
}

pub fn dialog(id: &ResourceId) -> String {
    format!("{}/{}", DIALOGS, id)
}

pub fn dialog_settings(id: &ResourceId) -> String {
    format!("{}/{}/settings", DIALOGS, id)
}

pub fn dialog_files(id: &ResourceId) -> String {
    format!("{}/{}/files", DIALOGS, id)
}

pub fn dialog_file(id: &ResourceId, file_id: &ResourceId) -> String {
    format!("{}/{}/files/{}", DIALOGS, id, file_id)
}

pub fn assistant_list(page: Page) -> String {
    format!("{}?{}", ASSISTANTS, page.query())
}

pub fn assistant(id: &ResourceId) -> String {
    format!("{}/{}", ASSISTANTS, id)
}
