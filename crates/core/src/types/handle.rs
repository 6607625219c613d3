//! URL handles (slugs) for brands and products.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Handle`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum HandleError {
    /// The input string is empty, or empties out after slugging.
    #[error("handle cannot be empty")]
    Empty,
}

/// A URL-safe slug identifying a brand or product.
///
/// Handles are lowercase with runs of non-alphanumeric characters
/// collapsed to single hyphens and no leading/trailing hyphen. Uniqueness
/// is enforced per-entity by a partial unique index; product handles
/// additionally carry a random suffix (see [`Handle::suffixed`]) so that
/// vendors can reuse titles without colliding. That makes product-handle
/// uniqueness probabilistic, not guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Handle(String);

impl Handle {
    /// Parse a client-supplied handle, normalizing it into slug form.
    ///
    /// # Errors
    ///
    /// Returns `HandleError::Empty` if nothing survives normalization.
    pub fn parse(s: &str) -> Result<Self, HandleError> {
        let slug = slugify(s);
        if slug.is_empty() {
            return Err(HandleError::Empty);
        }
        Ok(Self(slug))
    }

    /// Derive a handle from a display name ("Acme Shoes!" -> "acme-shoes").
    ///
    /// # Errors
    ///
    /// Returns `HandleError::Empty` if the name contains no alphanumerics.
    pub fn derive(name: &str) -> Result<Self, HandleError> {
        Self::parse(name)
    }

    /// Append a random 5-character base-36 suffix ("acme" -> "acme-x7k2q").
    #[must_use]
    pub fn suffixed(&self) -> Self {
        Self(format!("{}-{}", self.0, random_suffix()))
    }

    /// Returns the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Handle` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generate a random 5-character base-36 suffix.
#[must_use]
pub fn random_suffix() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::rng();
    (0..5)
        .map(|_| {
            let idx = rng.random_range(0..ALPHABET.len());
            char::from(ALPHABET[idx])
        })
        .collect()
}

/// Lowercase, collapse runs of non-alphanumerics into single hyphens, and
/// strip leading/trailing hyphens.
fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_lowercases_and_hyphenates() {
        let h = Handle::derive("Acme Shoes").expect("valid");
        assert_eq!(h.as_str(), "acme-shoes");
    }

    #[test]
    fn test_derive_collapses_runs_and_trims() {
        let h = Handle::derive("  --Über!! Brand++ ").expect("valid");
        // Non-ASCII characters are treated as separators
        assert_eq!(h.as_str(), "ber-brand");

        let h = Handle::derive("...Plain...").expect("valid");
        assert_eq!(h.as_str(), "plain");
    }

    #[test]
    fn test_derive_rejects_no_alphanumerics() {
        assert!(matches!(Handle::derive("!!!"), Err(HandleError::Empty)));
        assert!(matches!(Handle::derive(""), Err(HandleError::Empty)));
    }

    #[test]
    fn test_suffix_shape() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 5);
        assert!(suffix.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_suffixed_appends_with_hyphen() {
        let h = Handle::derive("acme").expect("valid").suffixed();
        assert_eq!(h.as_str().len(), "acme".len() + 6);
        assert!(h.as_str().starts_with("acme-"));
    }
}
