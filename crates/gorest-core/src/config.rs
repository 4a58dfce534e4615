//! Suite configuration: target service, credentials, seed data

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::seed::DEFAULT_SEED_PATH;

/// Public GoREST v2 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://gorest.co.in/public/v2";

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "GOREST_BEARER_TOKEN";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "GOREST_BASE_URL";

/// Suite configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GoREST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token (overridden by `GOREST_BEARER_TOKEN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Extra HTTP headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Seed user file
    #[serde(default = "default_seed_data")]
    pub seed_data: PathBuf,

    /// Request timeout in seconds (unset: HTTP client default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Dump all request/response pairs to JSONL files
    #[serde(default)]
    pub dump: bool,

    /// Directory for dump files (default: ".gorest/dumps")
    #[serde(default)]
    pub dump_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_seed_data() -> PathBuf {
    PathBuf::from(DEFAULT_SEED_PATH)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            headers: HashMap::new(),
            seed_data: default_seed_data(),
            timeout_secs: None,
            dump: false,
            dump_dir: None,
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.gorest.toml)
    ///
    /// Falls back to [`Config::default`] when no candidate file exists.
    ///
    /// # Errors
    ///
    /// Returns error if a candidate file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".gorest.toml", ".gorest.json", "gorest.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        // No config file, return default
        Ok(Self::default())
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; non-empty values win over the file.
    #[must_use]
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    /// The configured bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] if no non-empty token is set.
    pub fn bearer_token(&self) -> Result<&str, ConfigError> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingToken)
    }

    /// Dump directory, falling back to `.gorest/dumps`.
    #[must_use]
    pub fn dump_dir_or_default(&self) -> PathBuf {
        self.dump_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".gorest/dumps"))
    }

    /// Create example config file
    pub fn example() -> &'static str {
        r#"# gorest-suite configuration

# GoREST API root
base_url = "https://gorest.co.in/public/v2"

# Bearer token. Prefer the GOREST_BEARER_TOKEN environment variable.
# token = "your-token-here"

# Seed users used as creation templates
seed_data = "json_repo/users.json"

# Request timeout in seconds (default: HTTP client default)
# timeout_secs = 30

# Extra HTTP headers
# [headers]
# X-Request-Source = "gorest-suite"

# Dump all request/response pairs to JSONL files (default: false)
# dump = true
# dump_dir = ".gorest/dumps"
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("No bearer token configured (set GOREST_BEARER_TOKEN or `token` in the config file)")]
    MissingToken,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| owned.get(key).cloned()
    }

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://gorest.co.in/public/v2");
        assert_eq!(config.seed_data, PathBuf::from("json_repo/users.json"));
        assert!(config.token.is_none());
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn parse_toml() {
        let toml = r#"
base_url = "http://localhost:3000/public/v2"
token = "token123"
seed_data = "data/users.json"
timeout_secs = 15

[headers]
X-Trace = "on"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.base_url, "http://localhost:3000/public/v2");
        assert_eq!(config.token.as_deref(), Some("token123"));
        assert_eq!(config.seed_data, PathBuf::from("data/users.json"));
        assert_eq!(config.timeout_secs, Some(15));
        assert_eq!(config.headers.get("X-Trace"), Some(&"on".to_string()));
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.seed_data, PathBuf::from(DEFAULT_SEED_PATH));
    }

    #[test]
    fn load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gorest.json");
        std::fs::write(&path, r#"{"base_url": "http://127.0.0.1:9/v2", "dump": true}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9/v2");
        assert!(config.dump);
    }

    #[test]
    fn load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/.gorest.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gorest.toml");
        std::fs::write(&path, "base_url = [").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_token_overrides_file() {
        let config = Config {
            token: Some("from-file".into()),
            ..Config::default()
        }
        .apply_env(env_from(&[(TOKEN_ENV, "from-env")]));
        assert_eq!(config.bearer_token().unwrap(), "from-env");
    }

    #[test]
    fn blank_env_token_is_ignored() {
        let config = Config {
            token: Some("from-file".into()),
            ..Config::default()
        }
        .apply_env(env_from(&[(TOKEN_ENV, "  ")]));
        assert_eq!(config.bearer_token().unwrap(), "from-file");
    }

    #[test]
    fn env_base_url_override() {
        let config = Config::default().apply_env(env_from(&[(BASE_URL_ENV, "http://localhost:1")]));
        assert_eq!(config.base_url, "http://localhost:1");
    }

    #[test]
    fn missing_token_error() {
        let config = Config::default().apply_env(env_from(&[]));
        assert!(matches!(config.bearer_token(), Err(ConfigError::MissingToken)));
        assert!(
            ConfigError::MissingToken
                .to_string()
                .contains("GOREST_BEARER_TOKEN")
        );
    }

    #[test]
    fn token_is_not_serialized_when_absent() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert!(!text.contains("token"));
    }

    #[test]
    fn example_parses() {
        let config: Config = toml::from_str(Config::example()).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn dump_dir_fallback() {
        assert_eq!(
            Config::default().dump_dir_or_default(),
            PathBuf::from(".gorest/dumps")
        );
    }
}
