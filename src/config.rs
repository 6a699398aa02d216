use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Main preprocessing configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PrepConfig {
    /// Base directory for raw recipe files, tokenizer data and the tokens file
    #[serde(default = "default_path_data")]
    pub path_data: PathBuf,
    /// Word tokenizer settings
    #[serde(default)]
    pub tokenizer: TokenizerConfig,
    /// Pipeline execution settings
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Configuration for the word tokenizer model data
#[derive(Debug, Deserialize, Clone)]
pub struct TokenizerConfig {
    /// Where to fetch the abbreviation model data from; the bundled set is installed when unset
    #[serde(default)]
    pub data_url: Option<String>,
    /// Download model data before tokenizing instead of on first failure
    #[serde(default = "default_true")]
    pub eager_download: bool,
    /// Download timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            data_url: None,
            eager_download: true,
            timeout: default_timeout(),
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Tokenize recipes on a thread pool
    #[serde(default)]
    pub parallel: bool,
    /// Show a progress bar while tokenizing
    #[serde(default = "default_true")]
    pub progress: bool,
    /// Persist the tokenized corpus to `tokens.pkl`
    #[serde(default = "default_true")]
    pub write_tokens: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            progress: true,
            write_tokens: true,
        }
    }
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            path_data: default_path_data(),
            tokenizer: TokenizerConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

fn default_path_data() -> PathBuf {
    PathBuf::from("data")
}

fn default_true() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

impl PrepConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_PREP__ prefix
    /// 2. recipe_prep.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_PREP__TOKENIZER__DATA_URL
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Same configuration rooted at another data directory
    pub fn with_path_data(mut self, path_data: impl Into<PathBuf>) -> Self {
        self.path_data = path_data.into();
        self
    }

    /// Directory holding the word tokenizer model data
    pub fn tokenizer_dir(&self) -> PathBuf {
        self.path_data.join("tokenizer")
    }
}

/// Load configuration from file and environment variables
///
/// See [`PrepConfig::load`] for the precedence rules.
pub fn load_config() -> Result<PrepConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("recipe_prep").required(false))
        // Use double underscore for nested: RECIPE_PREP__PIPELINE__PARALLEL
        .add_source(
            Environment::with_prefix("RECIPE_PREP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
