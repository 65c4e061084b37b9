use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;

const DEFAULT_DB_PATH: &str = "data/taken.sqlite";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_level: String,
}

impl Settings {
    /// Defaults overlaid with `TIMELINE_*` environment variables.
    pub fn load() -> Result<Self> {
        let settings = ::config::Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("log_level", "info")?
            .add_source(::config::Environment::with_prefix("TIMELINE"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            log_level: "info".to_string(),
        }
    }
}
