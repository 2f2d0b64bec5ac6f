// src/domain/user.rs
use serde::Serialize;

use crate::errors::ServerError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// The public view of a user, as embedded in auth responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub email: String,
    pub photo: Option<String>,
}

/// Validated registration input (password still in plain text).
#[derive(Debug, Clone)]
pub struct Registration {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn new(fullname: &str, email: &str, password: &str) -> Result<Self, ServerError> {
        let fullname = fullname.trim();
        if fullname.is_empty() {
            return Err(ServerError::BadRequest("fullname is required".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServerError::BadRequest(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(Self {
            fullname: fullname.to_string(),
            email: normalize_email(email)?,
            password: password.to_string(),
        })
    }
}

/// Trim + lowercase, minimal sanity check.
pub fn normalize_email(email: &str) -> Result<String, ServerError> {
    let e = email.trim().to_lowercase();
    if e.is_empty() || !e.contains('@') || e.starts_with('@') || e.ends_with('@') {
        return Err(ServerError::BadRequest("invalid email".into()));
    }
    Ok(e)
}
