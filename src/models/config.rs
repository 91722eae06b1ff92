use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "docchat_documents";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Which vector store backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorDriver {
    /// Local SQLite-backed index (default, no external service)
    #[default]
    Sqlite,
    /// Remote Qdrant server
    Qdrant,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("docchat").join("config.toml"))
    }

    pub fn load() -> Result<Self, crate::error::ConfigError> {
        if let Some(path) = Self::config_path()
            && path.exists()
        {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            return Ok(config);
        }
        Ok(Self::default())
    }

    pub fn save(&self) -> Result<(), crate::error::ConfigError> {
        let path = Self::config_path().ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorStoreConfig {
    #[serde(default)]
    pub driver: VectorDriver,

    /// Path to the SQLite index file (sqlite driver). Defaults to
    /// `<data_dir>/index.db` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Qdrant server URL (qdrant driver).
    #[serde(default = "default_qdrant_url")]
    pub url: String,

    #[serde(default = "default_collection")]
    pub collection: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_qdrant_url() -> String {
    DEFAULT_QDRANT_URL.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            driver: VectorDriver::Sqlite,
            path: None,
            url: default_qdrant_url(),
            collection: default_collection(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    DEFAULT_CHUNK_OVERLAP
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_chunk_overlap(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the Gemini API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Locations of the on-disk application state.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Override for the data directory. Defaults to the platform data dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn data_dir(&self) -> Result<PathBuf, crate::error::ConfigError> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir().map(|p| p.join("docchat")).ok_or_else(|| {
            crate::error::ConfigError::PathError("could not determine data directory".to_string())
        })
    }

    pub fn documents_file(&self) -> Result<PathBuf, crate::error::ConfigError> {
        Ok(self.data_dir()?.join("documents.json"))
    }

    pub fn sessions_file(&self) -> Result<PathBuf, crate::error::ConfigError> {
        Ok(self.data_dir()?.join("chat_sessions.json"))
    }

    pub fn uploads_dir(&self) -> Result<PathBuf, crate::error::ConfigError> {
        Ok(self.data_dir()?.join("uploads"))
    }

    pub fn index_file(&self) -> Result<PathBuf, crate::error::ConfigError> {
        Ok(self.data_dir()?.join("index.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.vector_store.driver, VectorDriver::Sqlite);
        assert_eq!(config.vector_store.collection, DEFAULT_COLLECTION);
        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.overlap, 150);
        assert_eq!(config.generation.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_storage_paths_follow_data_dir() {
        let storage = StorageConfig {
            data_dir: Some(PathBuf::from("/tmp/docchat-test")),
        };
        assert_eq!(
            storage.documents_file().unwrap(),
            PathBuf::from("/tmp/docchat-test/documents.json")
        );
        assert_eq!(
            storage.index_file().unwrap(),
            PathBuf::from("/tmp/docchat-test/index.db")
        );
    }

    #[test]
    fn test_driver_parses_from_toml() {
        let config: Config =
            toml::from_str("[vector_store]\ndriver = \"qdrant\"\n").expect("parse");
        assert_eq!(config.vector_store.driver, VectorDriver::Qdrant);
    }
}
