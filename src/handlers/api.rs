// src/handlers/api.rs
//
// JSON endpoints under /api. Errors are rendered as `{"error": …}` by the router.
use astra::Request;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::app::App;
use crate::auth::{request_token, AuthSession};
use crate::db::listings;
use crate::domain::{ListingFilter, ListingType, NewListing, Registration};
use crate::errors::ServerError;
use crate::requests::{param, parse_listing_id, query_params, read_json};
use crate::responses::{json_message, json_response, ResultResp};
use crate::uploads::{FileKind, FormData};

#[derive(Deserialize)]
struct LoginBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

fn session_json(message: &str, session: &AuthSession) -> ResultResp {
    json_response(
        200,
        &json!({
            "message": message,
            "token": session.token,
            "user": session.user,
        }),
    )
}

/// Resolve the caller from the bearer token (or session cookie).
pub fn require_user(req: &Request, app: &App) -> Result<i64, ServerError> {
    let token = request_token(req);
    app.db
        .with_conn(|conn| app.auth.authenticate(conn, token.as_deref(), app.now()))
}

/// Validates the registration form and creates the account. The uploaded
/// photo is removed again if anything fails.
pub fn register_from_form(app: &App, form: &FormData) -> Result<AuthSession, ServerError> {
    let result = Registration::new(
        form.get("fullname").unwrap_or_default(),
        form.get("email").unwrap_or_default(),
        form.get("password").unwrap_or_default(),
    )
    .and_then(|reg| {
        let photo = form.file(FileKind::Photo).map(|f| f.stored_name.as_str());
        app.db
            .with_conn(|conn| app.auth.register(conn, &reg, photo, app.now()))
    });

    if result.is_err() {
        form.discard_files(&app.uploads);
    }
    result
}

/// Validates the listing form and stores it. The uploaded video is removed
/// again if anything fails.
pub fn create_from_form(app: &App, user_id: i64, form: &FormData) -> Result<i64, ServerError> {
    let video = form
        .file(FileKind::Video)
        .map(|f| f.stored_name.clone());

    let result = NewListing::from_fields(user_id, |name| form.get(name), video)
        .and_then(|listing| app.db.with_conn(|conn| listings::insert_listing(conn, &listing)));

    match &result {
        Ok(id) => info!(listing_id = id, user_id, "listing created"),
        Err(_) => form.discard_files(&app.uploads),
    }
    result
}

/// Deletes the caller's listing and its video file.
pub fn delete_owned(app: &App, id: i64, user_id: i64) -> Result<(), ServerError> {
    let video = app
        .db
        .with_conn(|conn| listings::delete_owned_listing(conn, id, user_id))?;
    info!(listing_id = id, user_id, "listing deleted");

    if let Some(video) = video {
        app.uploads.remove(FileKind::Video, &video);
    }
    Ok(())
}

// POST /api/auth/register
pub fn register(req: Request, app: &App) -> ResultResp {
    let form = app.uploads.read_multipart(req)?;
    let session = register_from_form(app, &form)?;
    session_json("User registered successfully", &session)
}

// POST /api/auth/login
pub fn login(req: Request, app: &App) -> ResultResp {
    let body: LoginBody = read_json(req)?;
    let session = app
        .db
        .with_conn(|conn| app.auth.login(conn, &body.email, &body.password, app.now()))?;
    info!(user_id = session.user.id, "login");
    session_json("Login successful", &session)
}

// POST /api/properties
pub fn create_property(req: Request, app: &App) -> ResultResp {
    let user_id = require_user(&req, app)?;
    let form = app.uploads.read_multipart(req)?;
    let id = create_from_form(app, user_id, &form)?;

    json_response(
        200,
        &json!({ "message": "Property created successfully", "propertyId": id }),
    )
}

// GET /api/properties?block=&type=
pub fn list_properties(req: Request, app: &App) -> ResultResp {
    let params = query_params(&req);
    let filter = ListingFilter {
        block: param(&params, "block").map(str::to_string),
        kind: param(&params, "type").map(ListingType::parse).transpose()?,
    };

    let rows = app
        .db
        .with_conn(|conn| listings::list_listings(conn, &filter, listings::LIST_LIMIT))?;
    json_response(200, &rows)
}

// GET /api/properties/recent
pub fn recent_properties(_req: Request, app: &App) -> ResultResp {
    let rows = app.db.with_conn(|conn| listings::recent_listings(conn))?;
    json_response(200, &rows)
}

// DELETE /api/properties/{id}
pub fn delete_property(req: Request, app: &App, raw_id: &str) -> ResultResp {
    let user_id = require_user(&req, app)?;
    let id = parse_listing_id(raw_id)?;
    delete_owned(app, id, user_id)?;
    json_message("Property deleted successfully")
}
