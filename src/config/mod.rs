use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bot credential used in the `Authorization` header
    pub bot_token: Option<String>,
    /// Application whose emojis are synchronized
    pub application_id: Option<String>,
    #[serde(default = "default_image_directory")]
    pub image_directory: PathBuf,
    #[serde(default = "default_cache_file")]
    pub cache_file: PathBuf,
    /// Append-only log receiving one line per error
    #[serde(default = "default_error_log_file")]
    pub error_log_file: PathBuf,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Abort the run when the remote listing fails instead of treating it as empty
    #[serde(default = "default_abort_on_list_failure")]
    pub abort_on_list_failure: bool,
}

/// Validated credentials required before any network call
#[derive(Debug, Clone)]
pub struct Credentials {
    pub bot_token: String,
    pub application_id: String,
}

fn default_image_directory() -> PathBuf {
    PathBuf::from(DEFAULT_IMAGE_DIRECTORY)
}

fn default_cache_file() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_FILE)
}

fn default_error_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_ERROR_LOG_FILE)
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_abort_on_list_failure() -> bool {
    DEFAULT_ABORT_ON_LIST_FAILURE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bot_token: None,
            application_id: None,
            image_directory: default_image_directory(),
            cache_file: default_cache_file(),
            error_log_file: default_error_log_file(),
            api_base_url: default_api_base_url(),
            abort_on_list_failure: default_abort_on_list_failure(),
        }
    }
}

impl Config {
    /// Load from the config file layered under the process environment
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        Self::load_with_env(config_file, std::env::vars().collect())
    }

    /// Load from the config file layered under the given environment.
    ///
    /// Environment keys are matched case-insensitively against field names,
    /// so `BOT_TOKEN` sets `bot_token`. When the file does not exist a
    /// template without credentials is written in its place.
    pub fn load_with_env(config_file: &str, env: HashMap<String, String>) -> AppResult<Self> {
        let path = Path::new(config_file);
        if !path.exists() {
            Self::write_template(path)?;
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::default().source(Some(env)))
            .build()
            .map_err(|e| AppError::configuration(format!("{}: {}", config_file, e)))?;

        settings
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("{}: {}", config_file, e)))
    }

    /// The bot token and application id, or a configuration error naming
    /// whichever is missing
    pub fn credentials(&self) -> AppResult<Credentials> {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (present(&self.bot_token), present(&self.application_id)) {
            (Some(bot_token), Some(application_id)) => Ok(Credentials {
                bot_token,
                application_id,
            }),
            (None, None) => Err(AppError::configuration(
                "BOT_TOKEN and APPLICATION_ID must be set",
            )),
            (None, _) => Err(AppError::configuration("BOT_TOKEN must be set")),
            (_, None) => Err(AppError::configuration("APPLICATION_ID must be set")),
        }
    }

    fn write_template(path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(&Self::default())
            .map_err(|e| AppError::configuration(e.to_string()))?;
        std::fs::write(path, contents).map_err(|e| {
            AppError::configuration(format!("Cannot write {}: {}", path.display(), e))
        })?;
        info!("Created default config file: {}", path.display());
        Ok(())
    }
}
