use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_path = match std::env::var("TASKFLOW_DATA") {
            Ok(p) => PathBuf::from(p),
            Err(_) => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("taskflow")
                .join("store.json"),
        };
        Ok(Self { store_path })
    }
}
