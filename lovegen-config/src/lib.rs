use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use directories::BaseDirs;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_KEY_ENV_VAR: &str = "GOOGLE_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OUTPUT_DIR: &str = "generated_game";
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const CONFIG_DIR_NAME: &str = ".lovegen";
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    HomeDirUnavailable,
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api: GeminiApiConfig,
    pub project: ProjectConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeminiApiConfig {
    /// Name of the environment variable holding the API key. The key itself
    /// is never written to the config file.
    pub api_key_env_var: String,
    pub model: String,
}

impl Default for GeminiApiConfig {
    fn default() -> Self {
        Self {
            api_key_env_var: DEFAULT_API_KEY_ENV_VAR.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory receiving `main.lua`, relative to the working directory unless absolute.
    pub output_dir: String,
    /// Asset directory name, nested inside `output_dir`.
    pub assets_dir: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            assets_dir: DEFAULT_ASSETS_DIR.to_string(),
        }
    }
}

/// Values resolved once at start-up and handed to every scaffold step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key_env_var: String,
    pub api_key: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
    pub assets_dir: PathBuf,
}

impl Settings {
    /// Resolve settings, reading the API key from the process environment.
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve settings with a caller-supplied environment lookup.
    ///
    /// A key that is blank after trimming counts as absent.
    pub fn from_config_with<F>(config: &Config, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key_env_var = config.gemini_api.api_key_env_var.trim().to_string();
        let api_key = lookup(&api_key_env_var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            api_key_env_var,
            api_key,
            model: config.gemini_api.model.trim().to_string(),
            output_dir: PathBuf::from(&config.project.output_dir),
            assets_dir: PathBuf::from(&config.project.assets_dir),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_config_with(&Config::default(), |_| None)
    }
}

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// Read `~/.lovegen/config.toml` when the user created one.
///
/// An absent file yields the built-in defaults. Nothing is ever written.
pub fn load() -> Result<LoadedConfig, ConfigError> {
    let path = config_file_path()?;
    match read_config(&path)? {
        Some(config) => Ok(LoadedConfig {
            config,
            source: ConfigSource::File(path),
        }),
        None => Ok(LoadedConfig {
            config: Config::default(),
            source: ConfigSource::Defaults,
        }),
    }
}

/// Parse the config file at `path`, or `None` if there is no such file.
pub fn read_config(path: &Path) -> Result<Option<Config>, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!("No config file at {path:?}, using defaults");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    debug!("Config file: {path:?}");
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or(ConfigError::HomeDirUnavailable)
}
