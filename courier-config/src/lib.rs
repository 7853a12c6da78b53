// Configuration for the Courier dispatch worker
//
// Options are read once at start-up from the process environment (optionally
// seeded from a `.env` file) into a typed `WorkerConfig`, which is then
// passed by reference to the components that need it.

use std::path::PathBuf;

pub mod env;
pub mod error;
pub mod validation;
pub mod worker;

pub use env::EnvLoader;
pub use error::{ConfigError, Result};
pub use validation::{ConfigValidator, Validate};
pub use worker::{CallbackAuthMode, CallbackSettings, DeliverySettings, EmailProvider, WorkerConfig};

/// Load variables from a `.env` file into the process environment and
/// return the file that was read.
///
/// With no path, a missing `.env` in the working directory is ignored.
/// An explicit path that cannot be read is an error.
pub fn load_dotenv(path: Option<&str>) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| ConfigError::LoadError(e.to_string()))?;
            Ok(Some(PathBuf::from(path)))
        }
        None => Ok(dotenvy::dotenv().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_explicit_dotenv_is_error() {
        let result = load_dotenv(Some("/nonexistent/courier/.env"));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
