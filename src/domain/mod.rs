//! Validated storefront primitives.
//!
//! [`Rating`], [`HexColor`] and [`ThemeStyle`] reject malformed input before
//! it reaches the database.

pub mod moderation;
pub mod validate;

pub use moderation::{ModerationError, ReviewState};

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

/// Errors raised while constructing validated domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i32),

    #[error("Invalid color '{0}', expected #rrggbb")]
    InvalidColor(String),

    #[error("Unknown theme style '{0}', expected modern, classic or minimal")]
    UnknownTheme(String),
}

/// Star rating in the inclusive range 1-5.
///
/// ```
/// use claystore::domain::Rating;
///
/// assert_eq!(Rating::try_from(4).unwrap().value(), 4);
/// assert!(Rating::try_from(6).is_err());
/// assert_eq!(Rating::default().value(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Maps an optional submitted value, defaulting to five stars when absent.
    pub fn from_optional(value: Option<i32>) -> Result<Self, DomainError> {
        value.map_or_else(|| Ok(Self::default()), Self::try_from)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<i32> for Rating {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::RatingOutOfRange(value))
        }
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("hex color pattern is valid"));

/// A `#rrggbb` theme color, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for HexColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if HEX_COLOR.is_match(trimmed) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(DomainError::InvalidColor(s.to_string()))
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Visual theme of the public site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeStyle {
    #[default]
    Modern,
    Classic,
    Minimal,
}

impl ThemeStyle {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for ThemeStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Self::Modern),
            "classic" => Ok(Self::Classic),
            "minimal" => Ok(Self::Minimal),
            _ => Err(DomainError::UnknownTheme(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
