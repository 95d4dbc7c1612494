use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slipway operations.
///
/// `InvalidConfig` and `ConflictingPaths` are the resolver's own taxonomy;
/// both are static configuration defects, reported synchronously before any
/// build work or filesystem mutation. The remaining variants belong to the
/// config-file loader.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error(
        "conflicting paths: outDir {out_dir} resolves to rootDir {root_dir} while emptyOutDir is true"
    )]
    ConflictingPaths {
        out_dir: PathBuf,
        root_dir: PathBuf,
    },

    #[error("failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },
}

impl Error {
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable error code (SCREAMING_SNAKE_CASE).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::ConflictingPaths { .. } => "CONFLICTING_PATHS",
            Self::ConfigRead { .. } => "CONFIG_READ_ERROR",
            Self::ConfigParse { .. } => "CONFIG_PARSE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_screaming_snake_case() {
        let errors = [
            Error::invalid("x"),
            Error::ConflictingPaths {
                out_dir: PathBuf::from("a"),
                root_dir: PathBuf::from("a"),
            },
            Error::ConfigParse {
                path: PathBuf::from("slipway.config.js"),
                reason: "bad".into(),
            },
        ];

        for err in &errors {
            let code = err.code();
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_' || c.is_ascii_digit()));
            assert!(!code.starts_with('_') && !code.ends_with('_'));
        }
    }

    #[test]
    fn test_invalid_message_contains_reason() {
        let err = Error::invalid("entryPoints must be a non-empty mapping");
        assert!(err.to_string().contains("non-empty mapping"));
    }
}
