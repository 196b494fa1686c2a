// src/types.rs
//! Domain-specific newtypes for type safety and validation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

use crate::constants::PLACEHOLDER_IMAGE_REF;

/// Validation errors for domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid API key: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid Notion ID: {0}")]
    InvalidId(String),
}

/// API key for Notion API authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new API key with validation
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();

        if key.is_empty() {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key cannot be empty".to_string(),
            });
        }

        if !key.starts_with("secret_") && !key.starts_with("ntn_") {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key must start with 'secret_' or 'ntn_'".to_string(),
            });
        }

        if key.len() < 20 {
            return Err(ValidationError::InvalidApiKey {
                reason: "API key is too short".to_string(),
            });
        }

        Ok(Self(key))
    }

    /// Get the API key as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create an API key without validation (only for testing)
    pub fn new_unchecked(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact API key in display
        write!(f, "{}...", &self.0[..self.0.len().min(10)])
    }
}

/// Strong typing for Notion IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker type for database IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

/// Marker type for page (row) IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

/// A Notion database identifier
pub type DatabaseId = Id<DatabaseMarker>;
/// A Notion page (database row) identifier
pub type PageId = Id<PageMarker>;

impl<T> Id<T> {
    /// Parse a Notion ID, accepting both the 32-hex and the hyphenated
    /// UUID form. The value is stored without hyphens.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized: String = input.trim().chars().filter(|c| *c != '-').collect();
        if normalized.len() != 32 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidId(format!(
                "expected a 32-character hex ID, got '{}'",
                input
            )));
        }
        Ok(Self {
            value: normalized.to_lowercase(),
            _phantom: PhantomData,
        })
    }

    /// Create an ID from an already normalized string (internal use)
    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Get the ID with dashes for API calls
    pub fn to_hyphenated(&self) -> String {
        if self.value.len() == 32 && !self.value.contains('-') {
            format!(
                "{}-{}-{}-{}-{}",
                &self.value[0..8],
                &self.value[8..12],
                &self.value[12..16],
                &self.value[16..20],
                &self.value[20..32]
            )
        } else {
            self.value.clone()
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_normalized(value.replace('-', "")))
    }
}

/// A site-relative reference to a mirrored (or placeholder) image.
///
/// Values look like `/images/notion/{filename}`; the placeholder is the
/// fixed `/images/img-placeholder.webp` substituted whenever a real image
/// could not be resolved or mirrored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalImageRef(String);

impl LocalImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The fixed fallback reference.
    pub fn placeholder() -> Self {
        Self(PLACEHOLDER_IMAGE_REF.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER_IMAGE_REF
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocalImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9-]").expect("static regex"));
static REPEATED_HYPHENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-{2,}").expect("static regex"));

/// Deterministic transform of free text into a URL/filename-safe token:
/// lowercase, whitespace to hyphens, strip everything outside
/// `[a-z0-9-]`, collapse hyphen runs, trim leading/trailing hyphens.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let hyphenated: String = lowered
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    let stripped = NON_SLUG_CHARS.replace_all(&hyphenated, "");
    let collapsed = REPEATED_HYPHENS.replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn slugify_strips_punctuation_and_lowercases() {
        assert_eq!(slugify("Rooftop Pool!"), "rooftop-pool");
    }

    #[test]
    fn slugify_collapses_hyphen_runs() {
        assert_eq!(slugify("Gym  &  Spa -- Area"), "gym-spa-area");
        assert_eq!(slugify("--edge case--"), "edge-case");
    }

    #[test]
    fn slugify_of_only_symbols_is_empty() {
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn id_parse_accepts_hyphenated_and_plain() {
        let plain = DatabaseId::parse("1234567812345678123456781234ABCD").unwrap();
        let dashed = DatabaseId::parse("12345678-1234-5678-1234-56781234abcd").unwrap();
        assert_eq!(plain, dashed);
        assert_eq!(
            plain.to_hyphenated(),
            "12345678-1234-5678-1234-56781234abcd"
        );
    }

    #[test]
    fn id_parse_rejects_garbage() {
        assert!(PageId::parse("not-an-id").is_err());
    }

    #[test]
    fn api_key_requires_known_prefix() {
        assert!(ApiKey::new("secret_0123456789abcdef0123").is_ok());
        assert!(ApiKey::new("ntn_0123456789abcdef01234").is_ok());
        assert!(ApiKey::new("plaintext").is_err());
    }

    #[test]
    fn placeholder_ref_roundtrip() {
        let p = LocalImageRef::placeholder();
        assert!(p.is_placeholder());
        assert!(!LocalImageRef::new("/images/notion/a.webp").is_placeholder());
    }
}
