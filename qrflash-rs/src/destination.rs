//! Destination normalization.
//!
//! A raw user string is accepted when it parses as an absolute URL either as
//! typed or with `https://` prepended. Canonicalization returns the first of
//! those two strings that parses, so a scheme is always present.

use crate::error::ValidationError;
use std::fmt;
use url::Url;

const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// A string guaranteed to parse as an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalDestination(String);

impl CanonicalDestination {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalDestination {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `raw` parses as an absolute URL, as typed or with `https://` prepended.
///
/// Empty and whitespace-only input is rejected without trying the prefix.
pub fn validate(raw: &str) -> bool {
    resolve(raw).is_ok()
}

/// Canonicalize `raw` into an absolute destination.
///
/// Surrounding whitespace is trimmed first. The result is the trimmed input
/// when it already parses as absolute, else the `https://`-prefixed form.
/// Canonicalizing a canonical destination returns it unchanged.
pub fn canonicalize(raw: &str) -> Result<CanonicalDestination, ValidationError> {
    resolve(raw).map(CanonicalDestination)
}

fn resolve(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if Url::parse(trimmed).is_ok() {
        return Ok(trimmed.to_string());
    }

    let prefixed = format!("{DEFAULT_SCHEME_PREFIX}{trimmed}");
    match Url::parse(&prefixed) {
        Ok(_) => Ok(prefixed),
        Err(err) => {
            log::debug!("rejecting destination {:?}: {}", raw, err);
            Err(ValidationError::Invalid(raw.to_string()))
        }
    }
}
