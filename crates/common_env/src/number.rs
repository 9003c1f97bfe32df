use std::fmt::Display;

use common_errors::errors::EnvError;
use log::{debug, error};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::source::EnvSource;

/// Numeric value of an environment property.
///
/// Integral values that fit into `i64` are kept as `Integer`, anything else is `Decimal`:
/// `"2.0"` is `Integer(2)`, `"2.5"` is `Decimal(2.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Decimal(f64),
}

impl Number {
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{n}"),
            Number::Decimal(n) => write!(f, "{n}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Integer(value.into())
    }
}

impl From<u32> for Number {
    fn from(value: u32) -> Self {
        Number::Integer(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Decimal(value)
    }
}

/// Decimal values are truncated towards zero, `None` if the value does not fit.
impl ToPrimitive for Number {
    fn to_i64(&self) -> Option<i64> {
        match *self {
            Number::Integer(n) => Some(n),
            Number::Decimal(n) => n.to_i64(),
        }
    }

    fn to_u64(&self) -> Option<u64> {
        match *self {
            Number::Integer(n) => n.to_u64(),
            Number::Decimal(n) => n.to_u64(),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        match *self {
            Number::Integer(n) => n.to_f64(),
            Number::Decimal(n) => Some(n),
        }
    }
}

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';
const RIGHT_QUOTE: char = '\u{2019}';

/// Checked in this order, the first non-empty one wins.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_NUMERIC", "LANG"];

/// Languages writing `1.234.567,89`
const DOT_GROUPING: &[&str] = &[
    "da", "de", "el", "es", "hr", "id", "it", "nl", "pt", "ro", "sl", "sr", "tr",
];

/// Languages writing `1 234 567,89`
const SPACE_GROUPING: &[&str] = &[
    "be", "bg", "cs", "et", "fi", "fr", "hu", "kk", "lt", "lv", "nb", "nn", "no", "pl", "ru",
    "sk", "sv", "uk",
];

/// # NumberFormat
///
/// Locale-aware number parsing: grouping and decimal separators of the locale.
///
/// Parsing is strict, the whole (trimmed) string must be a number:
/// - optional leading `-`, no `+`, no exponent
/// - grouping separators only between digits of the integer part
/// - optional decimal separator followed by digits
///
/// ### Example:
/// ```rust
/// use common_env::{Number, NumberFormat};
///
/// let english = NumberFormat::default();
/// assert_eq!(english.parse("1,000,000").unwrap(), Number::Integer(1_000_000));
/// assert!(english.parse("abc123").is_err());
///
/// let german = NumberFormat::for_locale("de_DE.UTF-8");
/// assert_eq!(german.parse("2,5").unwrap(), Number::Decimal(2.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    grouping: Option<char>,
    decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl NumberFormat {
    /// `1,234,567.89`, also used for `C` and `POSIX` locales.
    pub const ENGLISH: NumberFormat = NumberFormat {
        grouping: Some(','),
        decimal: '.',
    };

    pub fn new(grouping: Option<char>, decimal: char) -> Self {
        Self { grouping, decimal }
    }

    pub fn grouping(&self) -> Option<char> {
        self.grouping
    }

    pub fn decimal(&self) -> char {
        self.decimal
    }

    /// Number format for a locale tag in POSIX (`de_DE.UTF-8`, `fr_FR@euro`)
    /// or BCP 47 (`pt-BR`) form. Unknown locales get [NumberFormat::ENGLISH].
    pub fn for_locale(tag: &str) -> Self {
        let (language, region) = split_locale(tag);
        match (language.as_str(), region.as_deref()) {
            ("de", Some("ch" | "li")) | ("it", Some("ch")) => Self::new(Some('\''), '.'),
            (language, _) if DOT_GROUPING.contains(&language) => Self::new(Some('.'), ','),
            (language, _) if SPACE_GROUPING.contains(&language) => Self::new(Some(NBSP), ','),
            _ => Self::ENGLISH,
        }
    }

    /// Number format of the locale configured in the environment table itself
    /// via `LC_ALL`, `LC_NUMERIC` or `LANG`.
    pub fn from_env<S: EnvSource + ?Sized>(source: &S) -> Self {
        for var in LOCALE_VARS {
            match source.var(var) {
                Ok(Some(tag)) if !tag.is_empty() => {
                    let format = Self::for_locale(&tag);
                    debug!("Using number format of locale [{tag}] from {var}: {format:?}");
                    return format;
                }
                Ok(_) => continue,
                Err(err) => error!("Error getting locale from {var}: {err:?}"),
            }
        }
        Self::ENGLISH
    }

    pub fn parse(&self, text: &str) -> Result<Number, EnvError> {
        let invalid = || EnvError::parse(format!("'{text}' is not a number"));
        let trimmed = text.trim();
        let (sign, body) = match trimmed.strip_prefix('-') {
            Some(body) => ("-", body),
            None => ("", trimmed),
        };

        let mut integer_digits = String::with_capacity(body.len());
        let mut fraction_digits = String::new();
        let mut in_fraction = false;
        let mut after_digit = false;
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            if c.is_ascii_digit() {
                if in_fraction {
                    fraction_digits.push(c);
                } else {
                    integer_digits.push(c);
                }
                after_digit = true;
            } else if c == self.decimal && !in_fraction {
                in_fraction = true;
                after_digit = false;
            } else if !in_fraction
                && after_digit
                && self.is_grouping(c)
                && chars.peek().is_some_and(char::is_ascii_digit)
            {
                after_digit = false;
            } else {
                return Err(invalid());
            }
        }
        if integer_digits.is_empty() && fraction_digits.is_empty() {
            return Err(invalid());
        }
        if integer_digits.is_empty() {
            integer_digits.push('0');
        }

        if fraction_digits.bytes().all(|b| b == b'0') {
            if let Ok(n) = format!("{sign}{integer_digits}").parse::<i64>() {
                return Ok(Number::Integer(n));
            }
        }
        if fraction_digits.is_empty() {
            fraction_digits.push('0');
        }
        format!("{sign}{integer_digits}.{fraction_digits}")
            .parse::<f64>()
            .map(Number::Decimal)
            .map_err(|_| invalid())
    }

    fn is_grouping(&self, c: char) -> bool {
        match self.grouping {
            Some(' ' | NBSP | NARROW_NBSP) => matches!(c, ' ' | NBSP | NARROW_NBSP),
            Some('\'' | RIGHT_QUOTE) => matches!(c, '\'' | RIGHT_QUOTE),
            Some(grouping) => c == grouping,
            None => false,
        }
    }
}

/// `de_CH.UTF-8@euro` -> (`de`, Some(`ch`))
fn split_locale(tag: &str) -> (String, Option<String>) {
    let name = tag.split(['.', '@']).next().unwrap_or_default();
    let mut parts = name.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    let region = parts
        .next()
        .filter(|region| !region.is_empty())
        .map(str::to_ascii_lowercase);
    (language, region)
}

#[cfg(test)]
mod tests {
    use num_traits::ToPrimitive;

    use crate::source::MapEnv;

    use super::{Number, NumberFormat, NBSP};

    #[test]
    fn test_parse_english() {
        let format = NumberFormat::default();
        assert_eq!(format.parse("1000000").unwrap(), Number::Integer(1_000_000));
        assert_eq!(format.parse("2.5").unwrap(), Number::Decimal(2.5));
        assert_eq!(format.parse("-3").unwrap(), Number::Integer(-3));
        assert_eq!(format.parse("1,000,000").unwrap(), Number::Integer(1_000_000));
        assert_eq!(format.parse("-1,234.75").unwrap(), Number::Decimal(-1234.75));
        assert_eq!(format.parse("2.0").unwrap(), Number::Integer(2));
        assert_eq!(format.parse(".5").unwrap(), Number::Decimal(0.5));
        assert_eq!(format.parse("5.").unwrap(), Number::Integer(5));
        assert_eq!(format.parse(" 42\n").unwrap(), Number::Integer(42));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        let format = NumberFormat::default();
        for text in [
            "", " ", "-", ".", "abc123", "123abc", "+5", "1e5", "NaN", "inf", "1,,000", ",100",
            "100,", "1.2.3", "1.000,5", "--1", "1 000",
        ] {
            assert!(format.parse(text).is_err(), "'{text}' shall not be parsed");
        }
    }

    #[test]
    fn test_parse_out_of_integer_range_is_decimal() {
        let format = NumberFormat::default();
        assert_eq!(
            format.parse("9223372036854775808").unwrap(),
            Number::Decimal(9_223_372_036_854_775_808.0)
        );
        assert_eq!(
            format.parse("-9223372036854775808").unwrap(),
            Number::Integer(i64::MIN)
        );
    }

    #[test]
    fn test_parse_german() {
        let format = NumberFormat::for_locale("de_DE.UTF-8");
        assert_eq!(format.parse("2,5").unwrap(), Number::Decimal(2.5));
        assert_eq!(format.parse("1.000.000").unwrap(), Number::Integer(1_000_000));
        assert_eq!(format.parse("-1.234,75").unwrap(), Number::Decimal(-1234.75));
        assert!(format.parse("1,000,000").is_err());
    }

    #[test]
    fn test_parse_french() {
        let format = NumberFormat::for_locale("fr_FR@euro");
        assert_eq!(format.grouping(), Some(NBSP));
        assert_eq!(format.parse("1 000 000").unwrap(), Number::Integer(1_000_000));
        assert_eq!(format.parse("1\u{a0}000,5").unwrap(), Number::Decimal(1000.5));
        assert_eq!(format.parse("1\u{202f}000").unwrap(), Number::Integer(1000));
    }

    #[test]
    fn test_parse_swiss() {
        let format = NumberFormat::for_locale("de-CH");
        assert_eq!(format.parse("1'000.25").unwrap(), Number::Decimal(1000.25));
        assert_eq!(format.parse("1\u{2019}000").unwrap(), Number::Integer(1000));
    }

    #[test]
    fn test_parse_without_grouping() {
        let format = NumberFormat::new(None, '.');
        assert_eq!(format.parse("1000.5").unwrap(), Number::Decimal(1000.5));
        assert!(format.parse("1,000").is_err());
    }

    #[test]
    fn test_for_locale() {
        assert_eq!(NumberFormat::for_locale("C"), NumberFormat::ENGLISH);
        assert_eq!(NumberFormat::for_locale("POSIX"), NumberFormat::ENGLISH);
        assert_eq!(NumberFormat::for_locale(""), NumberFormat::ENGLISH);
        assert_eq!(NumberFormat::for_locale("en_US.UTF-8"), NumberFormat::ENGLISH);
        assert_eq!(
            NumberFormat::for_locale("pt-BR"),
            NumberFormat::new(Some('.'), ',')
        );
        assert_eq!(
            NumberFormat::for_locale("ru_RU.UTF-8"),
            NumberFormat::new(Some(NBSP), ',')
        );
        assert_eq!(
            NumberFormat::for_locale("de_AT"),
            NumberFormat::new(Some('.'), ',')
        );
    }

    #[test]
    fn test_from_env_precedence() {
        let table = MapEnv::new()
            .with("LANG", "en_US.UTF-8")
            .with("LC_NUMERIC", "de_DE.UTF-8")
            .with("LC_ALL", "");
        assert_eq!(
            NumberFormat::from_env(&table),
            NumberFormat::new(Some('.'), ',')
        );

        let table = MapEnv::new()
            .with("LANG", "de_DE.UTF-8")
            .with("LC_ALL", "ru_RU.UTF-8");
        assert_eq!(
            NumberFormat::from_env(&table),
            NumberFormat::new(Some(NBSP), ',')
        );

        assert_eq!(NumberFormat::from_env(&MapEnv::new()), NumberFormat::ENGLISH);
    }

    #[test]
    fn test_number_conversions() {
        assert_eq!(Number::Integer(7).to_f64(), Some(7.0));
        assert_eq!(Number::Decimal(2.5).to_i64(), Some(2));
        assert_eq!(Number::Integer(-1).to_u64(), None);
        assert_eq!(Number::Decimal(f64::NAN).to_i64(), None);
        assert_eq!(Number::from(3), Number::Integer(3));
        assert_eq!(Number::from(0.25), Number::Decimal(0.25));
        assert!(Number::from(3u32).is_integer());
        assert_ne!(Number::Integer(2), Number::Decimal(2.0));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Integer(1_000_000).to_string(), "1000000");
        assert_eq!(Number::Decimal(2.5).to_string(), "2.5");
        assert_eq!(Number::Integer(-3).to_string(), "-3");
    }

    #[test]
    fn test_number_serde() {
        assert_eq!(serde_json::to_string(&Number::Integer(3)).unwrap(), "3");
        assert_eq!(serde_json::to_string(&Number::Decimal(2.5)).unwrap(), "2.5");
        assert_eq!(
            serde_json::from_str::<Number>("1000000").unwrap(),
            Number::Integer(1_000_000)
        );
        assert_eq!(
            serde_json::from_str::<Number>("-0.5").unwrap(),
            Number::Decimal(-0.5)
        );
    }
}
