//! Configuration errors.
//!
//! # Error Codes
//!
//! | Variant | Code | Recoverable |
//! |---------|------|-------------|
//! | [`ConfigError::ReadFile`] | `CONFIG_READ_FAILED` | No |
//! | [`ConfigError::ParseToml`] | `CONFIG_PARSE_FAILED` | No |
//! | [`ConfigError::InvalidEnvVar`] | `CONFIG_INVALID_ENV` | No |
//! | [`ConfigError::Invalid`] | `CONFIG_INVALID` | No |

use applier_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config file '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// The merged layers do not form a valid config.
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    /// Creates a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse TOML error.
    pub fn parse_toml(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ParseToml {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid config error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::ReadFile { .. } => "CONFIG_READ_FAILED",
            Self::ParseToml { .. } => "CONFIG_PARSE_FAILED",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV",
            Self::Invalid { .. } => "CONFIG_INVALID",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use applier_types::assert_error_codes;

    #[test]
    fn error_display() {
        let err = ConfigError::invalid_env_var("APPLIER_DEBUG", "expected bool");
        assert!(err.to_string().contains("APPLIER_DEBUG"));
        assert!(err.to_string().contains("expected bool"));
    }

    #[test]
    fn all_codes_have_prefix() {
        let parse_err = toml::from_str::<toml::Table>("= nope").expect_err("invalid toml");
        assert_error_codes(
            &[
                ConfigError::read_file("/x", std::io::Error::other("boom")),
                ConfigError::parse_toml("/x", parse_err),
                ConfigError::invalid_env_var("APPLIER_DEBUG", "expected bool"),
                ConfigError::invalid("bad"),
            ],
            "CONFIG_",
        );
    }
}
