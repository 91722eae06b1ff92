//! JSON-file persisted chat sessions.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::StorageError;
use crate::models::{ChatMessage, ChatSession, SessionSummary};

/// Chat session store, persisted to a JSON file on every mutation.
pub struct SessionStore {
    path: PathBuf,
    sessions: HashMap<String, ChatSession>,
}

impl SessionStore {
    /// Load sessions from `path`, starting empty if the file is missing or
    /// unreadable.
    pub fn load(path: PathBuf) -> Self {
        let sessions = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(sessions) => sessions,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not parse sessions file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        info!(path = %path.display(), count = sessions.len(), "loaded chat sessions");
        Self { path, sessions }
    }

    fn save(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.sessions)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    /// Create a new session and return its id.
    pub fn create(&mut self) -> Result<String, StorageError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(session_id.clone(), ChatSession::new());
        self.save()?;
        info!(session_id, "created chat session");
        Ok(session_id)
    }

    pub fn get(&self, session_id: &str) -> Option<&ChatSession> {
        self.sessions.get(session_id)
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Session summaries, newest first.
    pub fn list(&self) -> Vec<SessionSummary> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .map(|(id, session)| SessionSummary {
                session_id: id.clone(),
                title: session.title.clone(),
                created_at: session.created_at.clone(),
                message_count: session.messages.len(),
            })
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        summaries
    }

    /// Append a message; the first user message sets the session title.
    pub fn append_message(
        &mut self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<(), StorageError> {
        let session = self.sessions.get_mut(session_id).ok_or_else(|| {
            StorageError::PathError(format!("unknown session: {session_id}"))
        })?;

        session.messages.push(message);
        if session.messages.len() == 1 {
            session.title = ChatSession::title_from_message(&session.messages[0].content);
        }
        self.save()
    }

    pub fn rename(&mut self, session_id: &str, title: &str) -> Result<bool, StorageError> {
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                session.title = title.trim().to_string();
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete(&mut self, session_id: &str) -> Result<bool, StorageError> {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.sessions.clear();
        self.save()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
