use crate::shared::storage::{KeyValueStore, LocalStorage};
use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub form: FormConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Full backend origin; when empty the window host is used with `port`
    pub base_url: Option<String>,
    pub port: u16,
    pub timeout_ms: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            port: 3003,
            timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// How long the success message stays before the form closes
    pub status_display_ms: u32,
    pub min_lookup_chars: usize,
    pub page_size: u32,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            status_display_ms: 2000,
            min_lookup_chars: 2,
            page_size: 5,
        }
    }
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 3003
timeout_ms = 30000

[form]
status_display_ms = 2000
min_lookup_chars = 2
page_size = 5
"#;

/// localStorage key holding an override TOML document
pub const CONFIG_STORAGE_KEY: &str = "app_config";

/// Load configuration
///
/// Search order:
/// 1. TOML document stored under `app_config` (for deployments and debugging)
/// 2. Falls back to embedded default config
pub fn load_config(store: &impl KeyValueStore) -> anyhow::Result<Config> {
    if let Some(contents) = store.get(CONFIG_STORAGE_KEY) {
        match toml::from_str::<Config>(&contents) {
            Ok(config) => {
                log::info!("Loading config from storage key '{}'", CONFIG_STORAGE_KEY);
                return Ok(config);
            }
            Err(e) => log::warn!("Ignoring invalid stored config: {}", e),
        }
    }

    log::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config(&LocalStorage).unwrap_or_else(|e| {
        log::error!("Failed to load configuration: {}", e);
        Config::default()
    })
});

/// Process-wide configuration, loaded on first use
pub fn config() -> &'static Config {
    &CONFIG
}
