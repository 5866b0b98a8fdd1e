//! Assistant configuration: the `agrirent.toml` file plus flag and environment
//! overrides.
//!
//! Every section is optional. A missing file yields [`AppConfig::default`].
//! The API key itself never lives in the file; `[gemini].api_key_env` names
//! the environment variable it is read from.

use std::path::{Path, PathBuf};
use std::time::Duration;

use llm::GeminiConfig;
use pipeline::ListingOwner;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "agrirent.toml";

const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("environment variable {var} is not set; it must hold the Gemini API key")]
    MissingApiKey { var: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub gemini: GeminiSection,
    pub catalog: CatalogSection,
    pub owner: OwnerSection,
    pub telemetry: TelemetrySection,
}

/// `[gemini]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeminiSection {
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GeminiSection {
    fn default() -> Self {
        let provider = GeminiConfig::default();
        Self {
            model: provider.model,
            endpoint: provider.endpoint,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: provider.temperature,
            timeout_secs: provider.timeout.as_secs(),
        }
    }
}

/// `[catalog]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogSection {
    /// Directory holding `machinery.json` and `training.json`.
    pub data_dir: PathBuf,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// `[owner]`: contact details stamped onto every committed machinery listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OwnerSection {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Default for OwnerSection {
    fn default() -> Self {
        Self {
            name: "Agrirent Operator".to_string(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

impl From<OwnerSection> for ListingOwner {
    fn from(section: OwnerSection) -> Self {
        ListingOwner {
            name: section.name,
            phone: section.phone,
            address: section.address,
        }
    }
}

/// `[telemetry]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TelemetrySection {
    /// Emit log lines as JSON instead of human-readable text.
    pub json_logs: bool,
    /// OTLP gRPC collector, e.g. `http://localhost:4317`. Export is off when unset.
    pub otlp_endpoint: Option<String>,
}

impl AppConfig {
    /// Reads `path`, falling back to defaults when the file does not exist.
    ///
    /// The result is not validated; call [`AppConfig::validate`] after
    /// applying overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies command-line overrides. `data_dir` also carries `AGRIRENT_DATA_DIR`.
    pub fn apply_overrides(&mut self, data_dir: Option<PathBuf>, model: Option<String>) {
        if let Some(dir) = data_dir {
            self.catalog.data_dir = dir;
        }
        if let Some(model) = model {
            self.gemini.model = model;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gemini;
        if g.model.trim().is_empty() {
            return Err(invalid("gemini.model", "must not be empty"));
        }
        if !(g.endpoint.starts_with("https://") || g.endpoint.starts_with("http://")) {
            return Err(invalid(
                "gemini.endpoint",
                format!("must be an http(s) URL, got '{}'", g.endpoint),
            ));
        }
        if g.api_key_env.trim().is_empty() {
            return Err(invalid("gemini.api_key_env", "must name an environment variable"));
        }
        if !(0.0..=2.0).contains(&g.temperature) {
            return Err(invalid(
                "gemini.temperature",
                format!("must be between 0.0 and 2.0, got {}", g.temperature),
            ));
        }
        if g.timeout_secs == 0 {
            return Err(invalid("gemini.timeout_secs", "must be greater than zero"));
        }
        if self.catalog.data_dir.as_os_str().is_empty() {
            return Err(invalid("catalog.data_dir", "must not be empty"));
        }
        if self.owner.name.trim().is_empty() {
            return Err(invalid("owner.name", "must not be empty"));
        }
        if let Some(endpoint) = &self.telemetry.otlp_endpoint {
            if endpoint.trim().is_empty() {
                return Err(invalid("telemetry.otlp_endpoint", "must not be empty when set"));
            }
        }
        Ok(())
    }

    /// Looks up the API key through `lookup`, normally [`std::env::var`].
    pub fn resolve_api_key<F>(&self, lookup: F) -> Result<String, ConfigError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let var = self.gemini.api_key_env.as_str();
        lookup(var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingApiKey {
                var: var.to_string(),
            })
    }

    pub fn gemini_config(&self, api_key: String) -> GeminiConfig {
        GeminiConfig {
            api_key,
            model: self.gemini.model.clone(),
            endpoint: self.gemini.endpoint.clone(),
            temperature: self.gemini.temperature,
            timeout: Duration::from_secs(self.gemini.timeout_secs),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_valid_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = AppConfig::load(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        config.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r#"
[gemini]
model = "gemini-2.5-pro"
temperature = 0.2

[owner]
name = "Ravi Kulkarni"
phone = "+91 90000 11111"
address = "Plot 7, Baramati"

[telemetry]
json_logs = true
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.temperature, 0.2);
        assert_eq!(config.gemini.timeout_secs, 60);
        assert_eq!(config.catalog.data_dir, PathBuf::from("data"));
        assert_eq!(ListingOwner::from(config.owner.clone()).name, "Ravi Kulkarni");
        assert!(config.telemetry.json_logs);
        assert_eq!(config.telemetry.otlp_endpoint, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[gemini]\nmodle = \"typo\"\n").unwrap();

        let err = AppConfig::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::from_toml("[catalog]\ndata_dir = \"/srv/agrirent\"\n").unwrap();

        config.apply_overrides(Some(PathBuf::from("/tmp/catalog")), Some("gemini-x".to_string()));

        assert_eq!(config.catalog.data_dir, PathBuf::from("/tmp/catalog"));
        assert_eq!(config.gemini.model, "gemini-x");
    }

    #[test]
    fn validation_names_the_offending_field() {
        let mut config = AppConfig::default();
        config.gemini.temperature = 3.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "gemini.temperature", .. })
        ));

        let mut config = AppConfig::default();
        config.gemini.endpoint = "generativelanguage.googleapis.com".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "gemini.endpoint", .. })
        ));

        let mut config = AppConfig::default();
        config.owner.name = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "owner.name", .. })
        ));
    }

    #[test]
    fn api_key_comes_from_the_named_variable() {
        let mut config = AppConfig::default();
        config.gemini.api_key_env = "AGRIRENT_TEST_KEY".to_string();

        let key = config
            .resolve_api_key(|var| (var == "AGRIRENT_TEST_KEY").then(|| "secret".to_string()))
            .unwrap();
        assert_eq!(key, "secret");

        let err = config.resolve_api_key(|_| Some("   ".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey { var } if var == "AGRIRENT_TEST_KEY"));
    }

    #[test]
    fn provider_config_carries_file_settings() {
        let config = AppConfig::default();

        let provider = config.gemini_config("k".to_string());

        assert_eq!(provider.api_key, "k");
        assert_eq!(provider.model, config.gemini.model);
        assert_eq!(provider.timeout, Duration::from_secs(60));
    }
}
