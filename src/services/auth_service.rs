//! Domain service for admin authentication.
//!
//! Handles login verification, the current-admin lookup and password changes.
//! Session storage itself lives in the API layer.

use serde::Serialize;
use thiserror::Error;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Admin not found")]
    AdminNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Admin info DTO for responses.
#[derive(Debug, Clone, Serialize)]
pub struct AdminInfo {
    pub id: i32,
    pub username: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::db::Admin> for AdminInfo {
    fn from(admin: crate::db::Admin) -> Self {
        Self {
            id: admin.id,
            username: admin.username,
            created_at: admin.created_at,
            updated_at: admin.updated_at,
        }
    }
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, username: &str, password: &str) -> Result<AdminInfo, AuthError>;

    async fn get_admin(&self, id: i32) -> Result<AdminInfo, AuthError>;

    /// Changes an admin's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if the current password is incorrect
    /// or the new one is too weak.
    async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
