//! Review moderation state machine.
//!
//! A review is stored as two flags (`is_approved`, `is_featured`). Only three
//! combinations are legal; featuring requires approval.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("Only approved reviews can be featured")]
    FeatureRequiresApproval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewState {
    Pending,
    Approved,
    Featured,
}

impl ReviewState {
    /// Reads the state from the stored flags.
    ///
    /// Legacy rows that are featured but not approved are treated as pending.
    #[must_use]
    pub const fn from_flags(is_approved: bool, is_featured: bool) -> Self {
        match (is_approved, is_featured) {
            (false, _) => Self::Pending,
            (true, false) => Self::Approved,
            (true, true) => Self::Featured,
        }
    }

    /// Returns `(is_approved, is_featured)`.
    #[must_use]
    pub const fn flags(self) -> (bool, bool) {
        match self {
            Self::Pending => (false, false),
            Self::Approved => (true, false),
            Self::Featured => (true, true),
        }
    }

    #[must_use]
    pub const fn approve(self) -> Self {
        match self {
            Self::Pending => Self::Approved,
            other => other,
        }
    }

    /// Sends the review back to moderation, dropping any featured mark.
    #[must_use]
    pub const fn reject(self) -> Self {
        Self::Pending
    }

    pub const fn toggle_feature(self) -> Result<Self, ModerationError> {
        match self {
            Self::Pending => Err(ModerationError::FeatureRequiresApproval),
            Self::Approved => Ok(Self::Featured),
            Self::Featured => Ok(Self::Approved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approve_is_idempotent() {
        assert_eq!(ReviewState::Pending.approve(), ReviewState::Approved);
        assert_eq!(ReviewState::Approved.approve(), ReviewState::Approved);
        assert_eq!(ReviewState::Featured.approve(), ReviewState::Featured);
    }

    #[test]
    fn reject_clears_featured() {
        assert_eq!(ReviewState::Featured.reject(), ReviewState::Pending);
        assert_eq!(ReviewState::Pending.reject(), ReviewState::Pending);
        assert_eq!(ReviewState::Pending.reject().flags(), (false, false));
    }

    #[test]
    fn featuring_requires_approval() {
        assert_eq!(
            ReviewState::Pending.toggle_feature(),
            Err(ModerationError::FeatureRequiresApproval)
        );
        assert_eq!(
            ReviewState::Approved.toggle_feature(),
            Ok(ReviewState::Featured)
        );
        assert_eq!(
            ReviewState::Featured.toggle_feature(),
            Ok(ReviewState::Approved)
        );
    }

    #[test]
    fn unapproved_featured_flags_read_as_pending() {
        assert_eq!(ReviewState::from_flags(false, true), ReviewState::Pending);
        assert_eq!(ReviewState::from_flags(true, true), ReviewState::Featured);
    }
}
