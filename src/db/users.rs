// src/db/users.rs
use chrono::Utc;
use rusqlite::{ffi, params, Connection, ErrorCode, OptionalExtension};

use crate::domain::User;
use crate::errors::ServerError;

/// A user row including the stored password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Insert a user and return its id.
/// Email should already be normalized by caller (trim/lowercase).
/// Losing a race on the unique email reads the same as the up-front check.
pub fn insert_user(
    conn: &Connection,
    fullname: &str,
    email: &str,
    password_hash: &str,
    photo: Option<&str>,
) -> Result<i64, ServerError> {
    conn.execute(
        "insert into users (fullname, email, password_hash, photo, created_at)
         values (?, ?, ?, ?, ?)",
        params![fullname, email, password_hash, photo, Utc::now().naive_utc()],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == ErrorCode::ConstraintViolation
                && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            ServerError::BadRequest("User already exists".into())
        }
        other => ServerError::from(other),
    })?;
    Ok(conn.last_insert_rowid())
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool, ServerError> {
    let found: Option<i64> = conn
        .query_row(
            "select id from users where email = ?",
            params![email],
            |r| r.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserRecord>, ServerError> {
    let row = conn
        .query_row(
            "select id, fullname, email, photo, password_hash from users where email = ?",
            params![email],
            |r| {
                Ok(UserRecord {
                    user: User {
                        id: r.get(0)?,
                        fullname: r.get(1)?,
                        email: r.get(2)?,
                        photo: r.get(3)?,
                    },
                    password_hash: r.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn find_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>, ServerError> {
    let row = conn
        .query_row(
            "select id, fullname, email, photo from users where id = ?",
            params![user_id],
            |r| {
                Ok(User {
                    id: r.get(0)?,
                    fullname: r.get(1)?,
                    email: r.get(2)?,
                    photo: r.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}
