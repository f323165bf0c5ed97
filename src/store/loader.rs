//! Store loader for initializing the configured backend

use super::firestore::FirestoreStore;
use super::memory::MemoryStore;
use super::traits::DocumentStore;
use crate::config::StoreSettings;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Loader for the document store backend
pub struct StoreLoader;

impl StoreLoader {
    /// Build the backend selected in settings
    pub fn load(settings: &StoreSettings) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match settings {
            StoreSettings::Memory(memory) => match memory.seed_file {
                Some(ref path) => Arc::new(MemoryStore::from_seed_file(path)?),
                None => {
                    warn!("Memory store has no seed file, every search will be empty");
                    Arc::new(MemoryStore::new())
                }
            },
            StoreSettings::Firestore(firestore) => {
                info!(
                    "Using Firestore project {} database {}",
                    firestore.project_id, firestore.database
                );
                Arc::new(FirestoreStore::with_settings(firestore)?)
            }
        };

        info!("Loaded {} store backend", store.name());
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FirestoreSettings, MemorySettings};

    #[test]
    fn test_load_backends() {
        let memory = StoreLoader::load(&StoreSettings::Memory(MemorySettings::default())).unwrap();
        assert_eq!(memory.name(), "memory");

        let firestore = StoreLoader::load(&StoreSettings::Firestore(FirestoreSettings {
            project_id: "demo".to_string(),
            ..Default::default()
        }))
        .unwrap();
        assert_eq!(firestore.name(), "firestore");
    }

    #[test]
    fn test_missing_seed_file_fails() {
        let settings = StoreSettings::Memory(MemorySettings {
            seed_file: Some("/nonexistent/seed.yml".into()),
        });
        assert!(StoreLoader::load(&settings).is_err());
    }
}
