// src/handlers/pages.rs
//
// Server-rendered pages. Signed-out visitors are sent back to `/`.
use astra::Request;
use tracing::info;

use crate::app::App;
use crate::auth::gateway::{clear_session_cookie, session_cookie};
use crate::auth::request_token;
use crate::db::{listings, users};
use crate::domain::{Coordinates, Listing, ListingStats, User};
use crate::errors::ServerError;
use crate::handlers::api::{create_from_form, delete_owned, register_from_form};
use crate::map::query::MAP_WIDTH_PX;
use crate::map::{ClickEvent, ClickOutcome, DashboardState, MapQuery, PixelPoint};
use crate::requests::{param, parse_listing_id, query_params, read_form};
use crate::responses::{html_response, html_with_status, redirect, redirect_with_cookie, ResultResp};
use crate::templates::pages::{
    dashboard_page, edit_placeholder_page, login_page, new_listing_page, property_page,
    DashboardVm,
};

/// Fixed flash messages, picked by the `notice` query parameter.
fn notice_text(code: &str) -> Option<&'static str> {
    match code {
        "no_block" => Some("Please select a block first."),
        "outside" => Some("Please click inside the block image."),
        "created" => Some("Property added successfully!"),
        "deleted" => Some("Property deleted successfully"),
        _ => None,
    }
}

fn with_notice(href: String, code: &str) -> String {
    format!("{href}&notice={code}")
}

/// The signed-in user, or `None` for a missing, expired or revoked session.
fn current_user(req: &Request, app: &App) -> Result<Option<User>, ServerError> {
    let token = request_token(req);
    app.db.with_conn(|conn| {
        match app.auth.authenticate(conn, token.as_deref(), app.now()) {
            Ok(user_id) => users::find_by_id(conn, user_id),
            Err(ServerError::Unauthorized(_) | ServerError::Forbidden(_)) => Ok(None),
            Err(e) => Err(e),
        }
    })
}

fn container_height(app: &App) -> f64 {
    MAP_WIDTH_PX * app.config.block_aspect
}

/// Dashboard state for `query`, with the block's listings loaded as markers.
fn load_dashboard(
    app: &App,
    user: &User,
    query: &MapQuery,
) -> Result<(DashboardState, Vec<Listing>), ServerError> {
    let viewport = query
        .viewport(app.config.block_aspect)
        .map_err(|e| ServerError::BadRequest(e.to_string()))?;

    let mut state = DashboardState::new(viewport, Some(user.id));
    state.select_block(query.block.clone());
    state.apply_filter(query.kind);
    state.set_markers_visible(query.show_markers);

    let rows = match state.current_block() {
        Some(_) => app
            .db
            .with_conn(|conn| listings::list_listings(conn, &state.filter(), listings::LIST_LIMIT))?,
        None => Vec::new(),
    };
    state.load_listings(&rows);
    Ok((state, rows))
}

// GET /
pub fn login(req: Request, app: &App) -> ResultResp {
    if current_user(&req, app)?.is_some() {
        return redirect("/dashboard");
    }
    html_response(login_page(None))
}

// POST /login
pub fn login_submit(req: Request, app: &App) -> ResultResp {
    let form = read_form(req)?;
    let email = form.get("email").map(String::as_str).unwrap_or_default();
    let password = form.get("password").map(String::as_str).unwrap_or_default();

    match app
        .db
        .with_conn(|conn| app.auth.login(conn, email, password, app.now()))
    {
        Ok(session) => {
            info!(user_id = session.user.id, "login");
            let cookie = session_cookie(&session.token, app.config.session_ttl_secs);
            redirect_with_cookie("/dashboard", Some(&cookie))
        }
        Err(ServerError::BadRequest(msg)) => html_with_status(400, login_page(Some(&msg))),
        Err(e) => Err(e),
    }
}

// POST /register
pub fn register_submit(req: Request, app: &App) -> ResultResp {
    let result = app
        .uploads
        .read_multipart(req)
        .and_then(|form| register_from_form(app, &form));

    match result {
        Ok(session) => {
            let cookie = session_cookie(&session.token, app.config.session_ttl_secs);
            redirect_with_cookie("/dashboard", Some(&cookie))
        }
        Err(ServerError::BadRequest(msg)) => html_with_status(400, login_page(Some(&msg))),
        Err(e) => Err(e),
    }
}

// POST /logout
pub fn logout(req: Request, app: &App) -> ResultResp {
    if let Some(token) = request_token(&req) {
        app.db
            .with_conn(|conn| app.auth.logout(conn, &token, app.now()))?;
    }
    redirect_with_cookie("/", Some(&clear_session_cookie()))
}

// GET /dashboard
pub fn dashboard(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let params = query_params(&req);
    let mut query = MapQuery::from_params(&params);
    let height = container_height(app);

    let (mut state, rows) = load_dashboard(app, &user, &query)?;
    if let Some(id) = query.focus.take() {
        if state.focus_listing(id, height) {
            query = query.with_viewport(state.viewport());
        }
    } else if param(&params, "fit").is_some() && state.zoom_to_markers(height) {
        query = query.with_viewport(state.viewport());
    }

    let recent = app.db.with_conn(|conn| listings::recent_listings(conn))?;
    let cards = if state.current_block().is_some() {
        &rows
    } else {
        &recent
    };

    let vm = DashboardVm {
        user: &user,
        blocks: &app.config.blocks,
        state: &state,
        query: &query,
        listings: cards,
        stats: ListingStats::from_listings(&recent),
        container_height: height,
        notice: param(&params, "notice").and_then(notice_text),
    };
    html_response(dashboard_page(&vm))
}

// GET /dashboard/click?…&map.x=&map.y=
pub fn map_click(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let params = query_params(&req);
    let query = MapQuery::from_params(&params);

    let offset = |key: &str| {
        param(&params, key)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| ServerError::BadRequest("click position missing".into()))
    };
    let (x, y) = (offset("map.x")?, offset("map.y")?);

    let (state, _) = load_dashboard(app, &user, &query)?;
    // map.x/map.y are relative to the image, which sits at the pan offset
    let event = ClickEvent {
        position: PixelPoint::new(query.pan.x + x, query.pan.y + y),
    };

    match state.click(&event) {
        ClickOutcome::ShowListing(id) => {
            redirect(&query.href(&format!("/dashboard/properties/{id}")))
        }
        ClickOutcome::PlaceListing(point) => {
            let block = state.current_block().unwrap_or_default();
            html_response(new_listing_page(&user, &query, block, point, None))
        }
        ClickOutcome::OutsideImage(_) => {
            redirect(&with_notice(query.href("/dashboard"), "outside"))
        }
        ClickOutcome::NoBlockSelected => {
            redirect(&with_notice(query.href("/dashboard"), "no_block"))
        }
    }
}

fn find_listing(app: &App, raw_id: &str) -> Result<Listing, ServerError> {
    let id = parse_listing_id(raw_id)?;
    app.db
        .with_conn(|conn| listings::find_listing(conn, id))?
        .ok_or_else(|| ServerError::NotFound("Property not found".into()))
}

// GET /dashboard/properties/{id}
pub fn property_detail(req: Request, app: &App, raw_id: &str) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let query = MapQuery::from_params(&query_params(&req));
    let listing = find_listing(app, raw_id)?;
    let is_owner = listing.user_id == user.id;

    html_response(property_page(&user, &listing, is_owner, &query))
}

// POST /dashboard/properties
pub fn create_property(req: Request, app: &App) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let query = MapQuery::from_params(&query_params(&req));
    let form = app.uploads.read_multipart(req)?;

    match create_from_form(app, user.id, &form) {
        Ok(_) => {
            let back = MapQuery {
                block: form.get("block_name").map(|b| b.trim().to_string()),
                ..query
            };
            redirect(&with_notice(back.href("/dashboard"), "created"))
        }
        Err(ServerError::BadRequest(msg)) => {
            // Show the form again when we still know where the listing goes.
            let block = form.get("block_name").map(str::trim).filter(|b| !b.is_empty());
            let point = form
                .get("coordinates")
                .and_then(|c| Coordinates::parse_json(c).ok());
            match (block, point) {
                (Some(block), Some(point)) => html_with_status(
                    400,
                    new_listing_page(&user, &query, block, point, Some(&msg)),
                ),
                _ => Err(ServerError::BadRequest(msg)),
            }
        }
        Err(e) => Err(e),
    }
}

// POST /dashboard/properties/{id}/delete
pub fn delete_property(req: Request, app: &App, raw_id: &str) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let id = parse_listing_id(raw_id)?;
    delete_owned(app, id, user.id)?;
    redirect(&with_notice(MapQuery::default().href("/dashboard"), "deleted"))
}

// GET /dashboard/properties/{id}/edit
pub fn edit_property(req: Request, app: &App, raw_id: &str) -> ResultResp {
    let Some(user) = current_user(&req, app)? else {
        return redirect("/");
    };
    let listing = find_listing(app, raw_id)?;
    if listing.user_id != user.id {
        return Err(ServerError::Forbidden(
            "You can only edit your own properties".into(),
        ));
    }
    html_response(edit_placeholder_page(&user, &listing))
}
