use std::path::PathBuf;

use crate::{config, types::RunRecord};

pub struct RunRecordManager {
    path: PathBuf,
}

impl RunRecordManager {
    pub fn new() -> Self {
        let mut path = config::data_dir();
        path.push("state/last_run.json");
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn persist(&self, record: &RunRecord) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(record).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    pub async fn load(&self) -> Result<RunRecord, String> {
        let json = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}

impl Default for RunRecordManager {
    fn default() -> Self {
        Self::new()
    }
}
