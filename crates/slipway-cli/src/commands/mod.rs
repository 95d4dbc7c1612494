pub mod check;
pub mod resolve;
pub mod version;

use serde::Serialize;
use slipway_core::{load_options, Error, RawOptions};
use std::path::{Path, PathBuf};

/// Machine-readable error payload. Codes are SCREAMING_SNAKE_CASE and
/// stable.
#[derive(Serialize)]
pub struct ErrorJson {
    pub code: String,
    pub message: String,
}

impl From<&Error> for ErrorJson {
    fn from(err: &Error) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Load the config for a command, turning "nothing discovered" into an
/// error payload the caller can report.
pub fn load_config(
    cwd: &Path,
    config: Option<&Path>,
) -> Result<(PathBuf, RawOptions), ErrorJson> {
    match load_options(cwd, config) {
        Ok(Some((path, options))) => {
            tracing::debug!(config = %path.display(), "loaded config");
            Ok((path, options))
        }
        Ok(None) => Err(ErrorJson {
            code: "CONFIG_NOT_FOUND".to_string(),
            message: format!("no config file found in {}", cwd.display()),
        }),
        Err(err) => Err(ErrorJson::from(&err)),
    }
}
