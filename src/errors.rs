// errors.rs
use std::fmt;

/// Errors originating from either the server logic
/// (routing, validation, auth) or downstream layers (DB, disk).
#[derive(Debug)]
pub enum ServerError {
    NotFound(String),
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    DbError(String),
    InternalError,
}

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden(_) => 403,
            ServerError::NotFound(_) => 404,
            ServerError::DbError(_) | ServerError::InternalError => 500,
        }
    }

    /// The message shown to the client. Store failures pass through unredacted.
    pub fn message(&self) -> &str {
        match self {
            ServerError::NotFound(msg)
            | ServerError::BadRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Forbidden(msg)
            | ServerError::DbError(msg) => msg,
            ServerError::InternalError => "Internal Server Error",
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound(msg) => write!(f, "Not Found: {msg}"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            ServerError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            ServerError::DbError(msg) => write!(f, "Database Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}
