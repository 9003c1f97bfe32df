use std::{error::Error, fmt::Display};

/// # EnvError
///
/// Failures of environment reads fall into two categories:
/// - `ReadError` - the environment table could not be read for the requested key
///   (invalid key, value is not valid unicode, table unavailable).
/// - `ParseError` - the value was read, but it can not be converted to the requested type.
///
/// Table sources should wrap their root/leaf errors with `EnvError`.
/// Accessors never return it to the caller: they log it and fall back to absence.
#[derive(Debug)]
pub enum EnvError {
    ReadError(String),
    ParseError(String),
}

impl EnvError {
    /// Alias for [EnvError::ReadError], immediately convert argument to string.
    pub fn read<E: Display>(e: E) -> EnvError {
        EnvError::ReadError(e.to_string())
    }

    /// Alias for [EnvError::ParseError], immediately convert argument to string.
    pub fn parse<E: Display>(e: E) -> EnvError {
        EnvError::ParseError(e.to_string())
    }
}

impl Display for EnvError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvError::ReadError(s) => write!(f, "Environment read error: {s}"),
            EnvError::ParseError(s) => write!(f, "Environment value parse error: {s}"),
        }
    }
}

impl Error for EnvError {}

pub trait EnvErrorExt {
    fn as_env_error(&self) -> Option<&EnvError>;
}

impl EnvErrorExt for anyhow::Error {
    fn as_env_error(&self) -> Option<&EnvError> {
        self.chain().find_map(|err| err.downcast_ref::<EnvError>())
    }
}
