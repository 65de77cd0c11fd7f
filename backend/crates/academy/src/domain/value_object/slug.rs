//! Course Slug Value Object
//!
//! Human-readable unique identifier, e.g. `ai-launchpad-academy`.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum slug length
const SLUG_MAX_LENGTH: usize = 80;

/// URL-safe course identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// Create a slug with validation
    pub fn new(slug: impl Into<String>) -> AppResult<Self> {
        let slug = slug.into().trim().to_lowercase();

        if slug.is_empty() {
            return Err(AppError::bad_request("Slug cannot be empty"));
        }

        if slug.len() > SLUG_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Slug must be at most {} characters",
                SLUG_MAX_LENGTH
            )));
        }

        let valid = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
            && !slug.starts_with('-')
            && !slug.ends_with('-');

        if !valid {
            return Err(AppError::bad_request("Invalid slug format"));
        }

        Ok(Self(slug))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_db(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert!(Slug::new("ai-launchpad-academy").is_ok());
        assert!(Slug::new("course-101").is_ok());
        // Lesson-style identifiers with dots are allowed
        assert!(Slug::new("0.1-welcome").is_ok());
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(Slug::new("").is_err());
        assert!(Slug::new("has space").is_err());
        assert!(Slug::new("-leading").is_err());
        assert!(Slug::new("trailing-").is_err());
        assert!(Slug::new("uns@fe").is_err());
    }

    #[test]
    fn test_slug_is_lowercased() {
        assert_eq!(Slug::new("My-Course").unwrap().as_str(), "my-course");
    }
}
