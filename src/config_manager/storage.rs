use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_local_store_path")]
    pub local_store_path: String,
}

fn default_local_store_path() -> String {
    "data/local_storage.json".to_string()
}

impl StorageConfig {
    pub fn local_store_path(&self) -> PathBuf {
        PathBuf::from(&self.local_store_path)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            local_store_path: default_local_store_path(),
        }
    }
}
