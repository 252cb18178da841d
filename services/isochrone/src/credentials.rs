//! API key providers for the distance-matrix client.
//!
//! Key file format: `#` lines are comments, blank lines are ignored, and
//! exactly one remaining line holds the key.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Environment variable read by [`EnvKeyProvider`].
pub const API_KEY_ENV: &str = "DISTANCE_MATRIX_API_KEY";

/// Key file read by default.
pub const DEFAULT_KEY_FILE: &str = "key.txt";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("cannot open {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("invalid key file format in {path}: line {line} holds a second key")]
    MultipleKeys { path: String, line: usize },

    #[error("no key in {location}")]
    Missing { location: String },
}

/// Supplies the API key. Consulted once, when the client is built.
pub trait CredentialProvider: Send + Sync {
    fn api_key(&self) -> Result<String, CredentialError>;

    /// Where the key comes from, for log messages.
    fn describe(&self) -> String;
}

/// Reads the key from a `key.txt` style file.
#[derive(Debug, Clone)]
pub struct KeyFileProvider {
    path: PathBuf,
}

impl KeyFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for KeyFileProvider {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_FILE)
    }
}

impl CredentialProvider for KeyFileProvider {
    fn api_key(&self) -> Result<String, CredentialError> {
        let label = self.path.display().to_string();
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| CredentialError::Unreadable {
                path: label.clone(),
                message: e.to_string(),
            })?;
        let key = parse_key_file(&content, &label)?;
        debug!(path = %label, "Loaded API key from file");
        Ok(key)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

/// Extract the single key line from key file contents.
pub fn parse_key_file(content: &str, label: &str) -> Result<String, CredentialError> {
    let mut key: Option<&str> = None;

    for (idx, line) in content.lines().enumerate() {
        if line.starts_with('#') {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if key.is_some() {
            return Err(CredentialError::MultipleKeys {
                path: label.to_string(),
                line: idx + 1,
            });
        }
        key = Some(line);
    }

    key.map(str::to_string).ok_or_else(|| CredentialError::Missing {
        location: label.to_string(),
    })
}

/// Reads the key from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvKeyProvider {
    var: String,
}

impl EnvKeyProvider {
    pub fn new() -> Self {
        Self::with_var(API_KEY_ENV)
    }

    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Whether the variable is set to something non-blank.
    pub fn is_available(&self) -> bool {
        std::env::var(&self.var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

impl Default for EnvKeyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvKeyProvider {
    fn api_key(&self) -> Result<String, CredentialError> {
        match std::env::var(&self.var) {
            Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(CredentialError::Missing {
                location: format!("environment variable {}", self.var),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_key_file_skips_comments() {
        let content = "# Distance Matrix key\n# rotate monthly\nAIzaSyExample\n";
        assert_eq!(parse_key_file(content, "key.txt").unwrap(), "AIzaSyExample");
    }

    #[test]
    fn test_parse_key_file_trims_whitespace() {
        assert_eq!(parse_key_file("\n  abc123  \r\n\n", "k").unwrap(), "abc123");
    }

    #[test]
    fn test_parse_key_file_rejects_second_key() {
        let err = parse_key_file("first\n#comment\nsecond\n", "key.txt").unwrap_err();
        assert_eq!(
            err,
            CredentialError::MultipleKeys {
                path: "key.txt".into(),
                line: 3
            }
        );
    }

    #[test]
    fn test_parse_key_file_requires_a_key() {
        let err = parse_key_file("# only comments\n", "key.txt").unwrap_err();
        assert!(matches!(err, CredentialError::Missing { .. }));
        assert!(parse_key_file("", "key.txt").is_err());
    }

    #[test]
    fn test_key_file_provider_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# key").unwrap();
        writeln!(file, "secret-key").unwrap();

        let provider = KeyFileProvider::new(file.path());
        assert_eq!(provider.api_key().unwrap(), "secret-key");
    }

    #[test]
    fn test_key_file_provider_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let provider = KeyFileProvider::new(dir.path().join("key.txt"));
        assert!(matches!(
            provider.api_key(),
            Err(CredentialError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_env_provider() {
        let var = "ISOCHRONE_TEST_KEY_ENV_PROVIDER";
        let provider = EnvKeyProvider::with_var(var);

        std::env::remove_var(var);
        assert!(!provider.is_available());
        assert!(provider.api_key().is_err());

        std::env::set_var(var, " from-env ");
        assert!(provider.is_available());
        assert_eq!(provider.api_key().unwrap(), "from-env");
        std::env::remove_var(var);
    }
}
