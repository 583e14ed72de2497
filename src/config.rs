use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read secrets file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse secrets file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Credentials and oracle settings, loaded from a TOML file at startup and
/// injected into the oracle client. The controller never touches these.
#[derive(Debug, Clone, Deserialize)]
pub struct Secrets {
    pub openai_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Secrets {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_secrets(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_file_gets_defaults() {
        let file = write_secrets("openai_key = \"sk-test\"\n");
        let secrets = Secrets::load(file.path()).unwrap();

        assert_eq!(secrets.openai_key, "sk-test");
        assert_eq!(secrets.model, DEFAULT_MODEL);
        assert_eq!(secrets.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_overrides_respected() {
        let file = write_secrets(
            "openai_key = \"sk-test\"\nmodel = \"gpt-4o\"\nendpoint = \"http://localhost:8080/v1\"\n",
        );
        let secrets = Secrets::load(file.path()).unwrap();

        assert_eq!(secrets.model, "gpt-4o");
        assert_eq!(secrets.endpoint, "http://localhost:8080/v1");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Secrets::load("/nonexistent/secrets.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_missing_key_is_parse_error() {
        let file = write_secrets("model = \"gpt-4o\"\n");
        let err = Secrets::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
