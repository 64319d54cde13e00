use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidKeyValue(String),

    #[error("Invalid {expected} value for {key}: '{value}'")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("Value for {0} cannot be empty.")]
    EmptyValue(String),
}

/// Splits a `KEY=VALUE` override at its first `=`.
pub fn split_key_value(kv_pair: &str) -> Result<(&str, &str), ParseError> {
    let (key, value) = kv_pair
        .split_once('=')
        .ok_or_else(|| ParseError::InvalidKeyValue(kv_pair.to_string()))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ParseError::InvalidKeyValue(kv_pair.to_string()));
    }
    let value = value.trim();
    if value.is_empty() {
        return Err(ParseError::EmptyValue(key.to_string()));
    }
    Ok((key, value))
}

/// Parses a setting value, naming the key and the expected kind on failure.
pub fn parse_setting<T: FromStr>(
    key: &str,
    value: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    value.trim().parse().map_err(|_| ParseError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    })
}
