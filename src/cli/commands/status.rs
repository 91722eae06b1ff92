use anyhow::Result;

use crate::cli::output::{OutputFormat, StatusInfo, get_formatter};
use crate::models::{Config, VectorDriver};
use crate::services::create_store;
use crate::storage::{DocumentRegistry, SessionStore};

/// Report backend health without requiring a configured API key: the store
/// and registries are inspected directly instead of going through full
/// application startup.
pub async fn handle_status(format: OutputFormat, _verbose: bool) -> Result<()> {
    let config = Config::load()?;
    let formatter = get_formatter(format);

    let mut store_config = config.vector_store.clone();
    if store_config.path.is_none() {
        store_config.path = Some(config.storage.index_file()?);
    }

    let location = match store_config.driver {
        VectorDriver::Sqlite => store_config
            .path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        VectorDriver::Qdrant => store_config.url.clone(),
    };

    let (connected, chunks) = match create_store(&store_config).await {
        Ok(store) => match store.count().await {
            Ok(count) => (true, count),
            Err(_) => (false, 0),
        },
        Err(_) => (false, 0),
    };

    let documents = DocumentRegistry::load(config.storage.documents_file()?);
    let sessions = SessionStore::load(config.storage.sessions_file()?);

    let status = StatusInfo {
        driver: format!("{:?}", store_config.driver).to_lowercase(),
        location,
        connected,
        chunks,
        documents: documents.len(),
        sessions: sessions.len(),
        model: config.generation.model.clone(),
        api_key_set: std::env::var(&config.generation.api_key_env).is_ok(),
    };

    print!("{}", formatter.format_status(&status));

    if !connected {
        eprintln!();
        match store_config.driver {
            VectorDriver::Sqlite => {
                eprintln!("Warning: could not open the local index at {}", location_hint(&status));
            }
            VectorDriver::Qdrant => {
                eprintln!("Warning: Qdrant not reachable at {}", status.location);
            }
        }
    }
    if !status.api_key_set {
        eprintln!(
            "Hint: set {} to enable chat answers.",
            config.generation.api_key_env
        );
    }

    Ok(())
}

fn location_hint(status: &StatusInfo) -> &str {
    if status.location.is_empty() {
        "<unset>"
    } else {
        &status.location
    }
}
