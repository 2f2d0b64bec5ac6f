// src/auth/gateway.rs
use astra::Request;
use rusqlite::Connection;
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{SessionToken, TokenDigest};
use crate::db::{sessions, users};
use crate::domain::user::normalize_email;
use crate::domain::{Registration, User};
use crate::errors::ServerError;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session lifetime in seconds.
    pub session_ttl_secs: i64,
    /// PBKDF2 rounds for newly hashed passwords.
    pub password_rounds: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 60 * 60 * 24 * 7,
            password_rounds: 100_000,
        }
    }
}

/// A signed-in user plus the raw bearer token (never stored).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

pub struct AuthService {
    cfg: AuthConfig,
}

impl AuthService {
    pub fn new(cfg: AuthConfig) -> Self {
        Self { cfg }
    }

    /// Create the account and sign it in.
    pub fn register(
        &self,
        conn: &Connection,
        reg: &Registration,
        photo: Option<&str>,
        now: i64,
    ) -> Result<AuthSession, ServerError> {
        if users::email_exists(conn, &reg.email)? {
            return Err(ServerError::BadRequest("User already exists".into()));
        }

        let hash = hash_password(&reg.password, self.cfg.password_rounds);
        let id = users::insert_user(conn, &reg.fullname, &reg.email, &hash, photo)?;
        info!(user_id = id, "user registered");

        let user = User {
            id,
            fullname: reg.fullname.clone(),
            email: reg.email.clone(),
            photo: photo.map(str::to_string),
        };
        let token = self.issue_session(conn, id, now)?;
        Ok(AuthSession { token, user })
    }

    /// Unknown email and wrong password fail the same way.
    pub fn login(
        &self,
        conn: &Connection,
        email: &str,
        password: &str,
        now: i64,
    ) -> Result<AuthSession, ServerError> {
        let invalid = || ServerError::BadRequest("Invalid credentials".into());

        let email = normalize_email(email).map_err(|_| invalid())?;
        let Some(record) = users::find_by_email(conn, &email)? else {
            return Err(invalid());
        };
        if !verify_password(password, &record.password_hash) {
            return Err(invalid());
        }

        let token = self.issue_session(conn, record.user.id, now)?;
        Ok(AuthSession {
            token,
            user: record.user,
        })
    }

    pub fn issue_session(
        &self,
        conn: &Connection,
        user_id: i64,
        now: i64,
    ) -> Result<String, ServerError> {
        let token = SessionToken::generate();
        let expires_at = now + self.cfg.session_ttl_secs;
        sessions::insert_session(conn, user_id, token.digest().as_bytes(), now, expires_at)?;
        Ok(token.into_string())
    }

    /// Resolve a bearer token to the user id it was issued for.
    pub fn authenticate(
        &self,
        conn: &Connection,
        token: Option<&str>,
        now: i64,
    ) -> Result<i64, ServerError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        let Some(token) = token else {
            return Err(ServerError::Unauthorized("Access token required".into()));
        };

        sessions::find_session_user(conn, TokenDigest::of(token).as_bytes(), now)?
            .ok_or_else(|| ServerError::Forbidden("Invalid token".into()))
    }

    pub fn logout(&self, conn: &Connection, token: &str, now: i64) -> Result<(), ServerError> {
        sessions::revoke_session(conn, TokenDigest::of(token.trim()).as_bytes(), now)?;
        Ok(())
    }
}

/// Token from `Authorization: Bearer …`, falling back to the session cookie.
pub fn request_token(req: &Request) -> Option<String> {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let (scheme, rest) = v.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then(|| rest.trim().to_string())
        });

    bearer.or_else(|| cookie(req, SESSION_COOKIE))
}

fn cookie(req: &Request, name: &str) -> Option<String> {
    req.headers()
        .get_all("Cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.to_string())
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value for a fresh session.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
