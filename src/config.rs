use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File};
use humantime::parse_duration;
use secrecy::SecretString;
use serde::Deserialize;
use serde_with::{DeserializeAs, serde_as};
use url::Url;

use crate::Result;
use crate::error::ConfigError;
use crate::types::ValueType;

const ENV_PREFIX: &str = "ZBXDASH";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: Url,
    pub token: SecretString,
    pub value_type: ValueType,
    pub user_lang: String,
    pub http_connect_timeout: Duration,
    pub http_request_timeout: Duration,
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
}

impl Config {
    /// Loads `path` (optional), then `ZBXDASH__*` variables, then the short
    /// `ZBX_*` variables, then `overrides`.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be parsed or a required field is missing
    /// or invalid.
    pub fn from_env_and_file(path: impl AsRef<Path>, overrides: &Overrides) -> Result<Self> {
        let builder = ::config::Config::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder, overrides)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>, overrides: &Overrides) -> Result<Self> {
        let mut raw: RawConfig = builder
            .build()
            .map_err(|err| ConfigError::Other(err.to_string()))?
            .try_deserialize()
            .map_err(|err| ConfigError::Parse(err.to_string()))?;

        raw.apply_env_overrides()?;
        if let Some(url) = &overrides.url {
            raw.zabbix.url = Some(url.clone());
        }
        raw.validate_and_build()
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    zabbix: RawZabbix,
    #[serde(default)]
    users: RawUsers,
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct RawZabbix {
    url: Option<String>,
    token: Option<String>,
    #[serde(default)]
    value_type: Option<String>,
    #[serde(default = "default_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    timeout: Duration,
    #[serde(default = "default_connect_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    connect_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct RawUsers {
    #[serde(default = "default_lang")]
    lang: String,
}

impl Default for RawZabbix {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            value_type: None,
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Default for RawUsers {
    fn default() -> Self {
        Self {
            lang: default_lang(),
        }
    }
}

impl RawConfig {
    fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(url) = env_string("ZBX_URL")? {
            self.zabbix.url = Some(url);
        }
        if let Some(token) = env_string("ZBX_TOKEN")? {
            self.zabbix.token = Some(token);
        }
        if let Some(value_type) = env_string("ZBX_VALUE_TYPE")? {
            self.zabbix.value_type = Some(value_type);
        }
        if let Some(timeout) = env_duration("ZBX_TIMEOUT")? {
            self.zabbix.timeout = timeout;
        }
        Ok(())
    }

    fn validate_and_build(self) -> Result<Config> {
        let url_str = self.zabbix.url.ok_or(ConfigError::MissingField {
            field: "zabbix.url",
        })?;
        let token = self.zabbix.token.ok_or(ConfigError::MissingField {
            field: "zabbix.token",
        })?;
        if token.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.token",
                message: "token cannot be empty".to_string(),
            }
            .into());
        }
        let endpoint = Url::parse(url_str.trim()).map_err(|err| ConfigError::InvalidField {
            field: "zabbix.url",
            message: err.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidField {
                field: "zabbix.url",
                message: format!("unsupported scheme {}", endpoint.scheme()),
            }
            .into());
        }

        let value_type = self
            .zabbix
            .value_type
            .as_deref()
            .map(ValueType::from_str)
            .transpose()
            .map_err(|message| ConfigError::InvalidField {
                field: "zabbix.value_type",
                message,
            })?
            .unwrap_or_default();

        if self.zabbix.timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.zabbix.connect_timeout.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "zabbix.connect_timeout",
                message: "timeout must be greater than zero".to_string(),
            }
            .into());
        }
        if self.users.lang.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "users.lang",
                message: "language cannot be empty".to_string(),
            }
            .into());
        }

        Ok(Config {
            endpoint,
            token: token.into(),
            value_type,
            user_lang: self.users.lang,
            http_connect_timeout: self.zabbix.connect_timeout,
            http_request_timeout: self.zabbix.timeout,
        })
    }
}

struct HumantimeDuration;

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}

fn env_string(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(err.to_string())),
    }
}

fn env_duration(key: &'static str) -> std::result::Result<Option<Duration>, ConfigError> {
    if let Some(value) = env_string(key)? {
        return parse_duration(value.trim())
            .map(Some)
            .map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            });
    }
    Ok(None)
}

const fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

const fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_lang() -> String {
    "es_ES".to_string()
}
