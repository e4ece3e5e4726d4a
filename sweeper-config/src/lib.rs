//! Loader for sweeper configuration: built-in defaults, YAML files, then
//! `SWEEPER__`-prefixed environment overrides, with `${VAR}` expansion.
//!
//! The built-in layer reads the conventional variables `CONSUMER_KEY`,
//! `CONSUMER_SECRET`, `ACCESS_TOKEN_KEY`, `ACCESS_TOKEN_SECRET` and
//! `TWITTER_USERNAME`, so a bare environment is enough to run the job:
//!
//! ```yaml
//! account:
//!   handle: "${TWITTER_USERNAME}"
//! credentials:
//!   consumer_key: "${CONSUMER_KEY}"
//!   consumer_secret: "${CONSUMER_SECRET}"
//!   access_token_key: "${ACCESS_TOKEN_KEY}"
//!   access_token_secret: "${ACCESS_TOKEN_SECRET}"
//! api:
//!   base_url: "https://api.twitter.com/1.1/"
//!   timeout_secs: 30        # optional; unset waits indefinitely
//! retention:
//!   keep: [20, 1050118621198921728]
//! logging:
//!   format: json
//! ```
//!
//! Any placeholder still unresolved after expansion is a load error.
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use sweeper_common::Secret;
use url::Url;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SWEEPER";
const CONFIG_FILE_NAME: &str = "sweeper.yaml";

const DEFAULT_YAML: &str = r#"
version: "1"
account:
  handle: "${TWITTER_USERNAME}"
credentials:
  consumer_key: "${CONSUMER_KEY}"
  consumer_secret: "${CONSUMER_SECRET}"
  access_token_key: "${ACCESS_TOKEN_KEY}"
  access_token_secret: "${ACCESS_TOKEN_SECRET}"
api:
  base_url: "https://api.twitter.com/1.1/"
"#;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("unresolved placeholder(s): {}", .0.join(", "))]
    Unresolved(Vec<String>),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct SweeperConfig {
    pub version: Option<String>,
    pub account: AccountConfig,
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct AccountConfig {
    /// Screen name whose timeline and follows are processed.
    pub handle: String,
}

/// User-context OAuth 1.0a credentials; `Debug` never shows the values.
#[derive(Debug, Deserialize)]
pub struct CredentialsConfig {
    pub consumer_key: Secret,
    pub consumer_secret: Secret,
    pub access_token_key: Secret,
    pub access_token_secret: Secret,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RetentionConfig {
    /// Status ids kept forever, in addition to the ones compiled in.
    #[serde(default)]
    pub keep: Vec<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub stderr: Option<bool>,
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_base_url() -> String {
    "https://api.twitter.com/1.1/".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Collect dotted paths of strings that still hold a `${...}` placeholder.
fn find_unresolved(v: &Value, path: &str, out: &mut Vec<String>) {
    match v {
        Value::String(s) if s.contains("${") => out.push(path.to_string()),
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                find_unresolved(item, &format!("{path}[{i}]"), out);
            }
        }
        Value::Object(obj) => {
            for (k, item) in obj {
                let child = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                find_unresolved(item, &child, out);
            }
        }
        _ => {}
    }
}

impl SweeperConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.account.handle.trim().is_empty() {
            return Err(ConfigLoadError::Invalid("account.handle is empty".into()));
        }
        let creds = [
            ("consumer_key", &self.credentials.consumer_key),
            ("consumer_secret", &self.credentials.consumer_secret),
            ("access_token_key", &self.credentials.access_token_key),
            ("access_token_secret", &self.credentials.access_token_secret),
        ];
        if let Some((name, _)) = creds.iter().find(|(_, secret)| secret.is_empty()) {
            return Err(ConfigLoadError::Invalid(format!(
                "credentials.{name} is empty"
            )));
        }
        let base = Url::parse(&self.api.base_url)
            .map_err(|e| ConfigLoadError::Invalid(format!("api.base_url: {e}")))?;
        if !base.path().ends_with('/') {
            return Err(ConfigLoadError::Invalid(
                "api.base_url must end with '/'".into(),
            ));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigLoadError::Invalid(
                "api.timeout_secs must be positive; omit it to disable".into(),
            ));
        }
        Ok(())
    }
}

/// Builder hiding the `config` crate wiring.
pub struct SweeperConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SweeperConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SweeperConfigLoader {
    /// Start from the built-in defaults.
    ///
    /// ```
    /// use sweeper_config::SweeperConfigLoader;
    ///
    /// let config = SweeperConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// account: { handle: "someone" }
    /// credentials:
    ///   consumer_key: "a"
    ///   consumer_secret: "b"
    ///   access_token_key: "c"
    ///   access_token_secret: "d"
    /// "#,
    ///     )
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.account.handle, "someone");
    /// assert_eq!(config.api.base_url, "https://api.twitter.com/1.1/");
    /// assert!(config.retention.keep.is_empty());
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// `./sweeper.yaml`, then `<config_dir>/sweeper/sweeper.yaml`, both optional.
    pub fn with_default_locations(self) -> Self {
        let loader = self.with_optional_file(CONFIG_FILE_NAME);
        match dirs::config_dir() {
            Some(dir) => loader.with_optional_file(dir.join("sweeper").join(CONFIG_FILE_NAME)),
            None => loader,
        }
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all layers, apply environment overrides, expand placeholders and validate.
    pub fn load(self) -> Result<SweeperConfig, ConfigLoadError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let mut unresolved = Vec::new();
        find_unresolved(&v, "", &mut unresolved);
        if !unresolved.is_empty() {
            unresolved.sort();
            return Err(ConfigLoadError::Unresolved(unresolved));
        }

        let typed: SweeperConfig =
            serde_json::from_value(v).map_err(|e| ConfigLoadError::Invalid(e.to_string()))?;
        typed.validate()?;
        Ok(typed)
    }
}
