//! Pipeline configuration.
//!
//! Every stage receives a `&PipelineConfig` instead of reading global
//! constants, so tests can point the whole pipeline at a temp directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use crate::error::AppError;

pub const DEFAULT_SET_CODE: &str = "mh3";
pub const DEFAULT_SEARCH_URL: &str = "https://api.scryfall.com/cards/search";
pub const DEFAULT_PAGE_DELAY_MS: u64 = 100;

pub const BRONZE_FILE: &str = "raw_cards.json";
pub const SILVER_FILE: &str = "refined_cards.csv";
pub const WAREHOUSE_FILE: &str = "magic_data_warehouse.db";

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Collection code passed to the search query (`set:<code>`).
    pub set_code: String,
    pub search_url: String,
    /// Root under which `bronze/`, `silver/` and `gold/` are created.
    pub data_dir: PathBuf,
    /// Courtesy pause between paginated requests.
    pub page_delay: Duration,
    pub user_agent: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            set_code: DEFAULT_SET_CODE.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            data_dir: PathBuf::from("."),
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        }
    }
}

impl PipelineConfig {
    /// Defaults overridden by `MTG_ETL_*` variables (a `.env` file is honoured).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(set) = lookup("MTG_ETL_SET").filter(|s| !s.trim().is_empty()) {
            config.set_code = set.trim().to_string();
        }
        if let Some(url) = lookup("MTG_ETL_SEARCH_URL").filter(|s| !s.trim().is_empty()) {
            config.search_url = url.trim().to_string();
        }
        if let Some(dir) = lookup("MTG_ETL_DATA_DIR").filter(|s| !s.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup("MTG_ETL_PAGE_DELAY_MS") {
            let ms = raw.trim().parse::<u64>().map_err(|e| {
                AppError::new(2, format!("Invalid MTG_ETL_PAGE_DELAY_MS '{raw}': {e}"))
            })?;
            config.page_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }

    /// Search URL for the first page of the configured collection.
    pub fn first_page_url(&self) -> Result<Url, AppError> {
        let query = format!("set:{}", self.set_code);
        Url::parse_with_params(&self.search_url, &[("q", query.as_str())])
            .map_err(|e| AppError::new(2, format!("Invalid search URL '{}': {e}", self.search_url)))
    }

    pub fn bronze_dir(&self) -> PathBuf {
        self.data_dir.join("bronze")
    }

    pub fn bronze_file(&self) -> PathBuf {
        self.bronze_dir().join(BRONZE_FILE)
    }

    pub fn silver_dir(&self) -> PathBuf {
        self.data_dir.join("silver")
    }

    pub fn silver_file(&self) -> PathBuf {
        self.silver_dir().join(SILVER_FILE)
    }

    pub fn gold_dir(&self) -> PathBuf {
        self.data_dir.join("gold")
    }

    pub fn warehouse_file(&self) -> PathBuf {
        self.gold_dir().join(WAREHOUSE_FILE)
    }

    /// Same configuration rooted at another directory.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
}
