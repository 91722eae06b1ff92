mod chat;
mod clear;
mod documents;
mod models;
mod sessions;
mod status;
mod upload;

pub use chat::ChatArgs;
pub use documents::DocumentsCommand;
pub use models::ModelsCommand;
pub use sessions::SessionsCommand;
pub use upload::UploadArgs;

pub use chat::handle_chat;
pub use clear::handle_clear;
pub use documents::handle_documents;
pub use models::handle_models;
pub use sessions::handle_sessions;
pub use status::handle_status;
pub use upload::handle_upload;
