use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zigjoin_core::config::CommissionConfig;
use zigjoin_model::channels::{FIRST_2_4GHZ_CHANNEL, LAST_2_4GHZ_CHANNEL};

use crate::error::ConfigError;

/// Environment variable naming a TOML or JSON config file.
pub const CONFIG_PATH_ENV: &str = "ZIGJOIN_CONFIG_PATH";
/// Environment variable carrying an inline JSON config.
pub const CONFIG_JSON_ENV: &str = "ZIGJOIN_CONFIG_JSON";

/// Largest scan duration exponent the stack accepts.
pub const MAX_SCAN_DURATION: u8 = 14;

const DEFAULT_CANDIDATES: &[&str] = &[
    "zigjoin.toml",
    "zigjoin.json",
    "config/zigjoin.toml",
    "config/zigjoin.json",
];

/// Serial flow control used on the coordinator link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowControl {
    #[default]
    Software,
    Hardware,
}

/// Where the coordinator lives. Consumed by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Serial device path or `socket://host:port` for a TCP bridge.
    pub path: String,
    pub baudrate: u32,
    pub flow_control: FlowControl,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            path: "socket://127.0.0.1:8888".to_string(),
            baudrate: 115_200,
            flow_control: FlowControl::Software,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub commission: CommissionConfig,
}

/// Which input produced a loaded [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File named by `$ZIGJOIN_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// Inline JSON from `$ZIGJOIN_CONFIG_JSON`.
    EnvInline,
    /// File passed explicitly by the caller.
    Explicit(PathBuf),
    /// One of the well-known default files.
    File(PathBuf),
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::EnvPath(path) => {
                write!(f, "{} ({CONFIG_PATH_ENV})", path.display())
            }
            ConfigSource::EnvInline => f.write_str(CONFIG_JSON_ENV),
            ConfigSource::Explicit(path) | ConfigSource::File(path) => {
                write!(f, "{}", path.display())
            }
            ConfigSource::Default => f.write_str("built-in defaults"),
        }
    }
}

impl Config {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$ZIGJOIN_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$ZIGJOIN_CONFIG_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        Self::load_with(|key| env::var(key).ok(), Path::new("."))
    }

    /// [`Config::load_from_env`] with an injectable variable lookup and
    /// search root for the default files.
    pub fn load_with<F>(
        lookup: F,
        search_root: &Path,
    ) -> anyhow::Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path_str) = lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(search_root) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no zigjoin config found; using defaults");
        Ok((Self::default(), ConfigSource::Default))
    }

    /// Explicit path wins over everything else.
    pub fn load(path: Option<&Path>) -> anyhow::Result<(Self, ConfigSource)> {
        match path {
            Some(path) => Ok((
                Self::load_from_file(path)?,
                ConfigSource::Explicit(path.to_path_buf()),
            )),
            None => Self::load_from_env(),
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read zigjoin config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid zigjoin config {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid zigjoin config {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // TOML first, JSON as a fallback.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse zigjoin config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid zigjoin config json: {err}"))
    }

    /// Render as TOML, the format the default files use.
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string(self).context("failed to render zigjoin config as toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.path.trim().is_empty() {
            return Err(ConfigError::EmptyDevicePath);
        }

        let commission = &self.commission;
        if commission.channels.is_empty() {
            return Err(ConfigError::NoChannels);
        }
        if let Some(&channel) = commission.channels.iter().find(|&&channel| {
            !(FIRST_2_4GHZ_CHANNEL..=LAST_2_4GHZ_CHANNEL).contains(&channel)
        }) {
            return Err(ConfigError::ChannelOutOfRange(channel));
        }
        if commission.scan_duration > MAX_SCAN_DURATION {
            return Err(ConfigError::ScanDurationTooLong(
                commission.scan_duration,
            ));
        }
        if commission.join_timeout_ms == 0 {
            return Err(ConfigError::ZeroJoinTimeout);
        }
        if commission.status_event.trim().is_empty() {
            return Err(ConfigError::EmptyStatusEvent);
        }
        Ok(())
    }

    fn find_default_file(root: &Path) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }
}
