use std::sync::Arc;

use anyhow::Context;
use common_errors::errors::EnvError;
use log::warn;

/// # EnvSource
///
/// Read access to an environment table: a mapping from string keys to string values.
///
/// - `var` returns `Ok(None)` if there is no such key in the table.
///   `Err` means the table could not be read for this key at all.
/// - `keys` returns all keys of the table in its own iteration order.
#[cfg_attr(test, mockall::automock)]
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> anyhow::Result<Option<String>>;

    fn keys(&self) -> anyhow::Result<Vec<String>>;
}

/// Environment of the current process, provided by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> anyhow::Result<Option<String>> {
        check_key(key).with_context(|| format!("Invalid environment key {key:?}"))?;
        match std::env::var_os(key) {
            None => Ok(None),
            Some(value) => value
                .into_string()
                .map(Some)
                .map_err(|value| EnvError::read(format!("value {value:?} is not valid unicode")))
                .with_context(|| format!("Error reading environment variable {key}")),
        }
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        let keys = std::env::vars_os()
            .filter_map(|(key, _)| match key.into_string() {
                Ok(key) => Some(key),
                Err(key) => {
                    warn!("Skipping environment key {key:?}: not valid unicode");
                    None
                }
            })
            .collect();
        Ok(keys)
    }
}

/// The platform can not look up these keys, `std::env` would panic on some of them.
fn check_key(key: &str) -> Result<(), EnvError> {
    if key.is_empty() {
        return Err(EnvError::read("key is empty"));
    }
    if key.contains(['=', '\0']) {
        return Err(EnvError::read("key contains '=' or NUL character"));
    }
    Ok(())
}

/// # MapEnv
///
/// In-memory environment table. Keeps keys in insertion order,
/// inserting an existing key replaces its value in place.
///
/// ### Example:
/// ```rust
/// use common_env::{EnvSource, MapEnv};
///
/// let table = MapEnv::new()
///     .with("POSTGRES_USER", "postgres")
///     .with("POSTGRES_PORT", "5432");
/// assert_eq!(table.var("POSTGRES_PORT").unwrap(), Some("5432".to_owned()));
/// assert_eq!(table.keys().unwrap(), vec!["POSTGRES_USER", "POSTGRES_PORT"]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv(Vec<(String, String)>);

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the replaced value if the key was already present.
    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, old)) => Some(std::mem::replace(old, value)),
            None => {
                self.0.push((key, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = MapEnv::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self
            .0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.to_owned()))
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.0.iter().map(|(key, _)| key.to_owned()).collect())
    }
}

impl<S: EnvSource + ?Sized> EnvSource for Box<S> {
    fn var(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).var(key)
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        (**self).keys()
    }
}

impl<S: EnvSource + ?Sized> EnvSource for Arc<S> {
    fn var(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).var(key)
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        (**self).keys()
    }
}
