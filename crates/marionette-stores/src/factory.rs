//! Factory for creating state stores.

use std::sync::Arc;

use marionette_core::error::{MarionetteError, MarionetteResult};
use marionette_core::{BasicStateStore, StateStore, StateStoreConfig, StateStoreProvider};

use crate::FlatFileStateStore;

/// Factory for creating state stores.
pub struct StateStoreFactory;

impl StateStoreFactory {
    /// Create a state store from the given configuration.
    pub fn create(config: &StateStoreConfig) -> MarionetteResult<Arc<dyn StateStore>> {
        match config.provider {
            StateStoreProvider::Memory => Ok(Arc::new(BasicStateStore::new())),
            StateStoreProvider::FlatFile => {
                let path = config.path.as_ref().ok_or_else(|| {
                    MarionetteError::Configuration(
                        "state_store.path is required for the flat_file provider".to_string(),
                    )
                })?;
                Ok(Arc::new(FlatFileStateStore::open(path)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_memory_store() {
        let store = StateStoreFactory::create(&StateStoreConfig::default()).unwrap();
        store.mark_registered("@a:example.org");
        assert!(store.is_registered("@a:example.org"));
    }

    #[test]
    fn test_flat_file_requires_path() {
        let config = StateStoreConfig {
            provider: StateStoreProvider::FlatFile,
            path: None,
        };
        assert!(matches!(
            StateStoreFactory::create(&config),
            Err(MarionetteError::Configuration(_))
        ));
    }
}
