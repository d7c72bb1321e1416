//! Configuration management for fitroom.
//!
//! Configuration is read from `~/.config/fitroom/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is
//! created. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extractor: ExtractorConfig,
    pub tryon: TryOnConfig,
}

/// Configuration for product-image extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,

    /// User agent string sent with every request
    pub user_agent: String,

    /// Minimum declared width/height for the heuristic image scan (default: 200)
    pub min_dimension: u32,

    /// CSS selectors known to hold the primary image on major retail
    /// sites, in priority order
    pub retailer_selectors: Vec<String>,

    /// Meta-tag names probed for a product image
    pub meta_names: Vec<String>,

    /// Generic product-image container selectors
    pub product_selectors: Vec<String>,

    /// Path substrings that disqualify a candidate URL
    pub blacklist: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "fitroom/0.1.0".to_string(),
            min_dimension: 200,
            retailer_selectors: vec![
                "#landingImage".to_string(),
                "#main-image".to_string(),
                "img[data-a-dynamic-image]".to_string(),
                "img[data-old-hires]".to_string(),
                "img[data-zoom-image]".to_string(),
                ".a-dynamic-image".to_string(),
            ],
            meta_names: vec![
                "og:image".to_string(),
                "twitter:image".to_string(),
                "image".to_string(),
                "thumbnail".to_string(),
            ],
            product_selectors: vec![
                "#landingImage".to_string(),
                "#main-image".to_string(),
                ".product-image img".to_string(),
                ".pdp-image".to_string(),
                "img.main".to_string(),
                ".gallery-image".to_string(),
                "[data-testid=\"pdp-main-image\"]".to_string(),
                ".product__img".to_string(),
                ".img-responsive".to_string(),
                ".product-main-image img".to_string(),
            ],
            blacklist: vec![
                "logo".to_string(),
                "icon".to_string(),
                "sprite".to_string(),
                "banner".to_string(),
                "nav".to_string(),
                "footer".to_string(),
                "social".to_string(),
                "avatar".to_string(),
                "loading".to_string(),
                "pixel".to_string(),
                "tracking".to_string(),
                "ads".to_string(),
                "spinner".to_string(),
            ],
        }
    }
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration for the hosted try-on generation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TryOnConfig {
    /// Base URL of the generation API
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Aspect ratio requested for the composite image
    pub aspect_ratio: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Request timeout in seconds (default: 60; generation is slow)
    pub timeout_secs: u64,
}

impl Default for TryOnConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash-image".to_string(),
            aspect_ratio: "1:1".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl TryOnConfig {
    /// Get the request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(config)
    }

    /// Get the default config file path: `~/.config/fitroom/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("fitroom").join("config.toml"))
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let default_config = Self::default_config_content();

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(default_config.as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Fitroom Configuration

[extractor]
# Request timeout in seconds
timeout_secs = 10

# User agent string sent with every request
user_agent = "fitroom/0.1.0"

# Minimum declared width/height for the heuristic image scan.
# Images declaring neither dimension are still considered.
min_dimension = 200

# Selectors known to hold the primary product image on major retail sites
# (in priority order). The first selector that yields a value wins.
retailer_selectors = [
    "#landingImage",
    "#main-image",
    "img[data-a-dynamic-image]",
    "img[data-old-hires]",
    "img[data-zoom-image]",
    ".a-dynamic-image",
]

# Meta-tag names probed for a product image
meta_names = ["og:image", "twitter:image", "image", "thumbnail"]

# Generic product-image container selectors
product_selectors = [
    "#landingImage",
    "#main-image",
    ".product-image img",
    ".pdp-image",
    "img.main",
    ".gallery-image",
    "[data-testid=\"pdp-main-image\"]",
    ".product__img",
    ".img-responsive",
    ".product-main-image img",
]

# Candidate URLs whose path contains any of these substrings are rejected
blacklist = [
    "logo", "icon", "sprite", "banner", "nav", "footer", "social",
    "avatar", "loading", "pixel", "tracking", "ads", "spinner",
]

[tryon]
# Base URL of the generation API
endpoint = "https://generativelanguage.googleapis.com/v1beta"

# Model identifier
model = "gemini-2.5-flash-image"

# Aspect ratio requested for the composite image
aspect_ratio = "1:1"

# Environment variable holding the API key
api_key_env = "GEMINI_API_KEY"

# Request timeout in seconds (generation is slow)
timeout_secs = 60
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
