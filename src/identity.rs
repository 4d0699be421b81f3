//! The disposable test identity and identifier checks for string-built DDL.

use crate::error::{Error, Result};

/// Username of the test identity: the Polish pangram, one of each diacritic.
pub const TEST_USERNAME: &str = "ZAŻÓŁĆGĘŚLĄJAŹŃ";

/// Password of the test identity.
pub const TEST_PASSWORD: &str = "TEST";

/// NLS language forced on every session.
pub const SESSION_LANGUAGE: &str = "POLISH";

/// Longest identifier Oracle accepts (12.2+), in bytes.
pub const MAX_IDENTIFIER_BYTES: usize = 128;

/// User created and dropped within one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestIdentity {
    pub username: String,
    pub password: String,
}

impl Default for TestIdentity {
    fn default() -> Self {
        Self {
            username: TEST_USERNAME.to_string(),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Check that `ident` is a nonquoted Oracle identifier and safe to concatenate.
///
/// Letters are matched with [`char::is_alphabetic`], so non-ASCII names such
/// as [`TEST_USERNAME`] pass.
pub fn validate_identifier(ident: &str) -> Result<&str> {
    let mut chars = ident.chars();
    let first = chars
        .next()
        .ok_or_else(|| Error::invalid_identifier(ident, "empty"))?;

    if ident.len() > MAX_IDENTIFIER_BYTES {
        return Err(Error::invalid_identifier(
            ident,
            format!("longer than {} bytes", MAX_IDENTIFIER_BYTES),
        ));
    }
    if !first.is_alphabetic() {
        return Err(Error::invalid_identifier(ident, "must start with a letter"));
    }
    if let Some(bad) = chars.find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '#'))) {
        return Err(Error::invalid_identifier(
            ident,
            format!("invalid character {:?}", bad),
        ));
    }
    Ok(ident)
}

/// Render `value` as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
