// Environment variable loading

use crate::{ConfigError, Result};
use std::collections::HashMap;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Environment variable loader
///
/// Reads from the process environment by default. Tests and embedders can
/// supply any lookup function instead, which avoids mutating the process
/// environment (`std::env::set_var` is unsafe since Rust 1.78).
pub struct EnvLoader {
    lookup: Lookup,
}

impl EnvLoader {
    /// Create a loader over the process environment
    pub fn new() -> Self {
        Self {
            lookup: Box::new(|key| env::var(key).ok()),
        }
    }

    /// Create a loader over a custom lookup function
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Create a loader over a fixed set of variables
    pub fn from_map(vars: HashMap<String, String>) -> Self {
        Self::from_lookup(move |key| vars.get(key).cloned())
    }

    /// Load a specific environment variable
    pub fn load_var(&self, key: &str) -> Result<String> {
        (self.lookup)(key).ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Load the first non-blank value among `keys`.
    ///
    /// The first key is the canonical name; the rest are accepted aliases.
    pub fn load_first(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.load_var(key).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }

    /// Load and parse a variable, falling back to `default` when unset or blank
    pub fn load_parsed<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.load_first(&[key]) {
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::parse(key, e)),
            None => Ok(default),
        }
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new()
    }
}
