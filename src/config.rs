use crate::constants::{aggregation, tmdb};
use crate::domain::{SortField, SortOption, SortOrder};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tmdb: TmdbConfig,

    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            worker_threads: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub base_url: String,

    /// v3 API key, sent as the `api_key` query parameter.
    /// The `TMDB_API_KEY` environment variable takes precedence.
    pub api_key: String,

    /// Sent as the `language` query parameter on every request.
    pub language: String,

    pub image_base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,

    /// Extra attempts for network errors, 429 and 5xx (default: 0, no retry)
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each further attempt
    pub retry_backoff_ms: u64,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: tmdb::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            language: tmdb::DEFAULT_LANGUAGE.to_string(),
            image_base_url: tmdb::DEFAULT_IMAGE_BASE_URL.to_string(),
            request_timeout_seconds: 30,
            max_retries: 0,
            retry_backoff_ms: 250,
        }
    }
}

impl TmdbConfig {
    /// Full poster URL for a poster path such as `/abc.jpg`.
    #[must_use]
    pub fn poster_url(&self, poster_path: &str) -> Option<String> {
        let path = poster_path.trim();
        if path.is_empty() {
            return None;
        }
        let base = self.image_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Some(format!("{base}/{path}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Size of the aggregated trending list (default: 100)
    pub top_n: usize,

    pub default_sort_field: SortField,

    pub default_sort_order: SortOrder,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            top_n: aggregation::DEFAULT_TOP_N,
            default_sort_field: SortField::Popularity,
            default_sort_order: SortOrder::Desc,
        }
    }
}

impl CatalogConfig {
    #[must_use]
    pub const fn default_sort(&self) -> SortOption {
        SortOption::new(self.default_sort_field, self.default_sort_order)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = 'found: {
            for path in &paths {
                if path.exists() {
                    info!("Loading config from: {}", path.display());
                    break 'found Self::load_from_path(path)?;
                }
            }

            info!("No config file found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_api_key_override(std::env::var(tmdb::API_KEY_ENV).ok().as_deref());
    }

    /// A blank or absent override keeps the key from the file.
    fn apply_api_key_override(&mut self, key: Option<&str>) {
        if let Some(key) = key.map(str::trim)
            && !key.is_empty()
        {
            self.tmdb.api_key = key.to_string();
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tmdb.base_url.trim().is_empty() {
            anyhow::bail!("TMDB base URL cannot be empty");
        }

        if self.tmdb.request_timeout_seconds == 0 {
            anyhow::bail!("TMDB request timeout must be > 0");
        }

        if self.catalog.top_n == 0 {
            anyhow::bail!("catalog.top_n must be > 0");
        }

        Ok(())
    }
}
