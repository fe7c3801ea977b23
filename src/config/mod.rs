//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `EMBED_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_SEQ_LEN, DEFAULT_MODEL_ID, DEFAULT_PORT, DEFAULT_REVISION,
};
use crate::embedding::{DevicePreference, SentenceConfig};

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `EMBED_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Hub model identifier, also reported as `model` in every response.
    pub model_id: String,

    /// Hub revision (branch, tag or commit). Default: `main`.
    pub revision: String,

    /// Local directory holding `config.json`, `tokenizer.json` and weights.
    /// When set, the Hub is never contacted.
    pub model_dir: Option<PathBuf>,

    /// Tokens kept per input. Default: `256`.
    pub max_seq_len: usize,

    /// Texts per forward pass. Default: `32`.
    pub batch_size: usize,

    /// L2-normalize output vectors. Default: `true`.
    pub normalize: bool,

    /// Compute device request. Default: `auto`.
    pub device: DevicePreference,

    /// Use the deterministic stub embedder instead of a model.
    pub stub: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_id: DEFAULT_MODEL_ID.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            model_dir: None,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            batch_size: DEFAULT_BATCH_SIZE,
            normalize: true,
            device: DevicePreference::Auto,
            stub: false,
        }
    }
}

impl Config {
    pub(crate) const ENV_MODEL_ID: &'static str = "EMBED_MODEL_ID";
    pub(crate) const ENV_REVISION: &'static str = "EMBED_REVISION";
    pub(crate) const ENV_MODEL_DIR: &'static str = "EMBED_MODEL_DIR";
    pub(crate) const ENV_MAX_SEQ_LEN: &'static str = "EMBED_MAX_SEQ_LEN";
    pub(crate) const ENV_BATCH_SIZE: &'static str = "EMBED_BATCH_SIZE";
    pub(crate) const ENV_NORMALIZE: &'static str = "EMBED_NORMALIZE";
    pub(crate) const ENV_DEVICE: &'static str = "EMBED_DEVICE";
    pub(crate) const ENV_STUB: &'static str = "EMBED_STUB";

    /// Loads model settings from environment variables (falling back to defaults).
    ///
    /// Listener settings are not read here; see [`ServeConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let model_id = Self::parse_string_from_env(Self::ENV_MODEL_ID, defaults.model_id);
        let revision = Self::parse_string_from_env(Self::ENV_REVISION, defaults.revision);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let max_seq_len = Self::parse_usize_from_env(Self::ENV_MAX_SEQ_LEN, defaults.max_seq_len)?;
        let batch_size = Self::parse_usize_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?;
        let normalize = Self::parse_bool_from_env(Self::ENV_NORMALIZE, defaults.normalize)?;
        let device = Self::parse_device_from_env(defaults.device)?;
        let stub = Self::parse_bool_from_env(Self::ENV_STUB, defaults.stub)?;

        Ok(Self {
            model_id,
            revision,
            model_dir,
            max_seq_len,
            batch_size,
            normalize,
            device,
            stub,
        })
    }

    /// Validates paths (the Hub is not contacted).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Builds the embedder configuration described by these settings.
    pub fn sentence_config(&self) -> SentenceConfig {
        if self.stub {
            return SentenceConfig {
                model_id: self.model_id.clone(),
                ..SentenceConfig::stub()
            };
        }

        SentenceConfig {
            model_id: self.model_id.clone(),
            revision: self.revision.clone(),
            model_dir: self.model_dir.clone(),
            max_seq_len: self.max_seq_len,
            batch_size: self.batch_size,
            normalize: self.normalize,
            device: self.device,
            ..SentenceConfig::default()
        }
    }

    fn parse_device_from_env(default: DevicePreference) -> Result<DevicePreference, ConfigError> {
        match Self::non_empty_var(Self::ENV_DEVICE) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidDevice { value }),
            None => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::non_empty_var(var_name).map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::non_empty_var(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => match value.parse::<usize>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(ConfigError::InvalidNumber { name, value }),
            },
            None => Ok(default),
        }
    }

    fn parse_bool_from_env(name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match Self::non_empty_var(name) {
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::InvalidBool { name, value }),
            },
            None => Ok(default),
        }
    }

    fn non_empty_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Listener settings, only read by `serve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServeConfig {
    /// HTTP port. Default: `8090`.
    pub port: u16,

    /// IP address to bind. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        }
    }
}

impl ServeConfig {
    pub(crate) const ENV_PORT: &'static str = "EMBED_PORT";
    pub(crate) const ENV_BIND_ADDR: &'static str = "EMBED_BIND_ADDR";

    /// Loads `EMBED_PORT` and `EMBED_BIND_ADDR` (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            port: Self::parse_port_from_env(defaults.port)?,
            bind_addr: Self::parse_bind_addr_from_env(defaults.bind_addr)?,
        })
    }

    /// Returns the address `serve` binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}
