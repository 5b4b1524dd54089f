use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};

use super::ApiError;

/// `Json` extractor that reports malformed bodies as a 400 in the API envelope.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64, max: u64) -> Result<u64, ApiError> {
    if !(1..=max).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between 1 and {max}"
        )));
    }
    Ok(limit)
}

/// Rejects bulk requests that name no ids or any invalid id.
pub fn validate_ids(ids: &[i32]) -> Result<&[i32], ApiError> {
    if ids.is_empty() {
        return Err(ApiError::validation("At least one ID is required"));
    }
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(ApiError::validation(format!("Invalid ID: {bad}")));
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("product", 1).is_ok());
        assert!(validate_id("product", 0).is_err());
        assert!(validate_id("review", -4).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1, 50).is_ok());
        assert!(validate_limit(50, 50).is_ok());
        assert!(validate_limit(0, 50).is_err());
        assert!(validate_limit(51, 50).is_err());
    }

    #[test]
    fn test_validate_ids() {
        assert!(validate_ids(&[1, 2, 3]).is_ok());
        assert!(validate_ids(&[]).is_err());
        assert!(validate_ids(&[4, 0]).is_err());
    }
}
