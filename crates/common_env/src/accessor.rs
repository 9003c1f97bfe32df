use log::{debug, error};
use once_cell::sync::Lazy;

use crate::{
    keys::Keys,
    number::{Number, NumberFormat},
    source::{EnvSource, ProcessEnv},
};

/// # Environment
///
/// Typed, default-aware reads over an environment table.
///
/// A property is present only if its value is a non-empty string:
/// an empty value and a missing key are the same thing for every method.
/// No method fails. Errors reading the table are logged and treated as absence.
pub trait Environment {
    /// Checks if the environment has a non-empty `key` property.
    fn has_property(&self, key: &str) -> bool;

    /// Checks if the `feature` property is `true`.
    ///
    /// The value is trimmed and compared case-insensitively,
    /// so `" TrUe"` is `true`, while `"fAlSe "`, `"yes"` and `"1"` are `false`.
    /// Returns `false` if there is no such property.
    fn supports(&self, feature: &str) -> bool;

    /// Same as [Environment::supports], but returns `default`
    /// if there is no such property.
    fn supports_or(&self, feature: &str, default: bool) -> bool;

    fn get_optional_property(&self, key: &str) -> Option<String>;

    /// Alias for [Environment::get_optional_property],
    /// additionally logs absence of the property.
    fn get_property(&self, key: &str) -> Option<String>;

    /// Returns the property value untouched (not trimmed), or `default` if there is no such property.
    fn get_property_or(&self, key: &str, default: &str) -> String;

    /// Parses the property value with the locale-aware [NumberFormat].
    /// Returns `None` if there is no such property or it is not a number.
    fn get_optional_number(&self, key: &str) -> Option<Number>;

    fn get_number(&self, key: &str) -> Option<Number>;

    fn get_number_or(&self, key: &str, default: Number) -> Number;

    /// All keys of the environment table. Empty if the table can not be read.
    fn get_keys(&self) -> Keys;
}

/// # EnvironmentAccessor
///
/// [Environment] implementation reading through an [EnvSource].
/// Holds no copy of the table: every call reads the source again.
///
/// Numbers are parsed with the format of the locale configured in the table
/// (`LC_ALL`, `LC_NUMERIC`, `LANG`), resolved once at construction.
///
/// ### Example:
/// ```rust
/// use common_env::{Environment, EnvironmentAccessor, MapEnv, Number, NumberFormat};
///
/// let env = EnvironmentAccessor::new(MapEnv::new().with("TIMEOUT", "2,5"))
///     .with_number_format(NumberFormat::for_locale("de_DE"));
/// assert_eq!(env.get_number("TIMEOUT"), Some(Number::Decimal(2.5)));
/// assert_eq!(env.get_number("RETRIES"), None);
/// ```
#[derive(Debug, Clone)]
pub struct EnvironmentAccessor<S = ProcessEnv> {
    source: S,
    number_format: NumberFormat,
}

static SYSTEM: Lazy<EnvironmentAccessor> = Lazy::new(EnvironmentAccessor::default);

/// Process-wide accessor over the environment of the current process.
pub fn system() -> &'static EnvironmentAccessor {
    &SYSTEM
}

impl Default for EnvironmentAccessor<ProcessEnv> {
    fn default() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<S: EnvSource> EnvironmentAccessor<S> {
    pub fn new(source: S) -> Self {
        let number_format = NumberFormat::from_env(&source);
        Self {
            source,
            number_format,
        }
    }

    /// Override number format resolved from the environment locale.
    pub fn with_number_format(mut self, number_format: NumberFormat) -> Self {
        self.number_format = number_format;
        self
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: EnvSource> Environment for EnvironmentAccessor<S> {
    fn has_property(&self, key: &str) -> bool {
        debug!("Checking if environment has the [{key}] property...");
        self.get_optional_property(key).is_some()
    }

    fn supports(&self, feature: &str) -> bool {
        debug!("Checking if environment supports the [{feature}] feature...");
        self.get_optional_property(feature)
            .is_some_and(|value| is_true(&value))
    }

    fn supports_or(&self, feature: &str, default: bool) -> bool {
        debug!("Checking if environment supports the [{feature}] feature...");
        match self.get_optional_property(feature) {
            Some(value) => is_true(&value),
            None => {
                debug!("Environment has no [{feature}] feature, returning default value [{default}]");
                default
            }
        }
    }

    fn get_optional_property(&self, key: &str) -> Option<String> {
        debug!("Getting [{key}] property from environment...");
        match self.source.var(key) {
            Ok(value) => value.filter(|value| !value.is_empty()),
            Err(err) => {
                error!("Error getting environment property for key [{key}]: {err:?}");
                None
            }
        }
    }

    fn get_property(&self, key: &str) -> Option<String> {
        let property = self.get_optional_property(key);
        if property.is_none() {
            debug!("Environment has no [{key}] property");
        }
        property
    }

    fn get_property_or(&self, key: &str, default: &str) -> String {
        self.get_optional_property(key).unwrap_or_else(|| {
            debug!("Environment has no [{key}] property, returning default value [{default}]");
            default.to_owned()
        })
    }

    fn get_optional_number(&self, key: &str) -> Option<Number> {
        let value = self.get_optional_property(key)?;
        match self.number_format.parse(&value) {
            Ok(number) => Some(number),
            Err(err) => {
                error!("Error getting number from [{key}] property: {err}");
                None
            }
        }
    }

    fn get_number(&self, key: &str) -> Option<Number> {
        let number = self.get_optional_number(key);
        if number.is_none() {
            debug!("Environment has no [{key}] property number");
        }
        number
    }

    fn get_number_or(&self, key: &str, default: Number) -> Number {
        self.get_optional_number(key).unwrap_or_else(|| {
            debug!("Environment has no [{key}] property number, returning default value [{default}]");
            default
        })
    }

    fn get_keys(&self) -> Keys {
        debug!("Getting environment keys...");
        match self.source.keys() {
            Ok(keys) if !keys.is_empty() => Keys::from(keys),
            Ok(_) => {
                debug!("Environment has no properties...");
                Keys::default()
            }
            Err(err) => {
                error!("Error getting environment keys: {err:?}");
                Keys::default()
            }
        }
    }
}

fn is_true(value: &str) -> bool {
    value.trim().to_lowercase() == "true"
}
