//! JSON-file persistence for document and session metadata.

mod documents;
mod sessions;

pub use documents::DocumentRegistry;
pub use sessions::SessionStore;
