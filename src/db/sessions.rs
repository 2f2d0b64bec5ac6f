// src/db/sessions.rs
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::ServerError;

/// Insert a session row (token_hash should be SHA-256 bytes).
pub fn insert_session(
    conn: &Connection,
    user_id: i64,
    token_hash: &[u8],
    created_at: i64,
    expires_at: i64,
) -> Result<(), ServerError> {
    conn.execute(
        r#"
        insert into sessions (user_id, token_hash, created_at, expires_at)
        values (?, ?, ?, ?)
        "#,
        params![user_id, token_hash, created_at, expires_at],
    )
    .map_err(|e| ServerError::DbError(format!("create session failed: {e}")))?;
    Ok(())
}

/// Resolve a live (unexpired, unrevoked) session to its user id.
pub fn find_session_user(
    conn: &Connection,
    token_hash: &[u8],
    now: i64,
) -> Result<Option<i64>, ServerError> {
    conn.query_row(
        r#"
        select s.user_id
        from sessions s
        join users u on u.id = s.user_id
        where s.token_hash = ?
          and s.expires_at > ?
          and s.revoked_at is null
        "#,
        params![token_hash, now],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| ServerError::DbError(format!("session lookup failed: {e}")))
}

/// Mark a session revoked. Returns false when nothing matched.
pub fn revoke_session(conn: &Connection, token_hash: &[u8], now: i64) -> Result<bool, ServerError> {
    let updated = conn
        .execute(
            "update sessions set revoked_at = ? where token_hash = ? and revoked_at is null",
            params![now, token_hash],
        )
        .map_err(|e| ServerError::DbError(format!("revoke session failed: {e}")))?;
    Ok(updated > 0)
}
