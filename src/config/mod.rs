use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// hh.ru API access
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Search query, hh.ru boolean syntax.
    #[serde(default = "default_search_text")]
    pub search_text: String,

    /// Region code; 113 is the whole of Russia.
    #[serde(default = "default_area")]
    pub area: u32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    #[serde(default = "default_detail_timeout_secs")]
    pub detail_timeout_secs: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Where results land
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,

    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,

    /// Only rows in this currency are written and plotted by salary.
    #[serde(default = "default_currency")]
    pub currency: String,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "https://api.hh.ru".to_string()
}
fn default_search_text() -> String {
    r#"(NAME:"аналитик данных" OR NAME:"аналитика данных" OR NAME:"data analyst")"#.to_string()
}
fn default_area() -> u32 {
    113
}
fn default_per_page() -> u32 {
    50
}
fn default_max_pages() -> u32 {
    4
}
fn default_request_delay_ms() -> u64 {
    1000
}
fn default_detail_timeout_secs() -> u64 {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "hh-analyst/0.1 (data analyst vacancy research)".to_string()
}
fn default_csv_path() -> PathBuf {
    PathBuf::from("analyst_vacancies.csv")
}
fn default_charts_dir() -> PathBuf {
    PathBuf::from("charts")
}
pub fn default_currency() -> String {
    "RUR".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_text: default_search_text(),
            area: default_area(),
            per_page: default_per_page(),
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            detail_timeout_secs: default_detail_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            charts_dir: default_charts_dir(),
            currency: default_currency(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("HH").separator("__"))
            .build()?;

        cfg.try_deserialize().context("Invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.api.area, 113);
        assert_eq!(cfg.api.per_page, 50);
        assert_eq!(cfg.api.max_pages, 4);
        assert_eq!(cfg.api.request_delay_ms, 1000);
        assert_eq!(cfg.api.detail_timeout_secs, 5);
        assert_eq!(cfg.output.currency, "RUR");
        assert_eq!(cfg.output.csv_path, PathBuf::from("analyst_vacancies.csv"));
    }

    #[test]
    fn partial_sections_fall_back_to_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[api]\nmax_pages = 2\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.api.max_pages, 2);
        assert_eq!(cfg.api.per_page, 50);
        assert_eq!(cfg.output.currency, "RUR");
    }
}
