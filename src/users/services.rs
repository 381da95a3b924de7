use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::ApiError, users::dto::RegisterRequest};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_AGE: i32 = 18;
pub const MAX_AGE: i32 = 120;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex =
            Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Checks a registration payload field by field, stopping at the first
/// failure. Nothing here touches the store.
pub fn validate_registration(req: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_email(&req.email) {
        return Err(ApiError::InvalidInput("Invalid email format"));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::InvalidInput(
            "Password must be at least 8 characters",
        ));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("Name is required"));
    }
    if !(MIN_AGE..=MAX_AGE).contains(&req.age) {
        return Err(ApiError::InvalidInput("Age must be between 18 and 120"));
    }
    Ok(())
}

/// Parses the lookup `id` query value.
pub fn parse_user_id(raw: Option<&str>) -> Result<i64, ApiError> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ApiError::InvalidInput("User ID is required"))?;
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidInput("Invalid user ID"))
}
