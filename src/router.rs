use crate::app::App;
use crate::errors::ServerError;
use crate::handlers::{api, pages};
use crate::responses::{html_error_response, json_error_response, serve_file, ResultResp};
use astra::{Request, Response};
use tracing::warn;

/// Route a request and turn any error into a response: JSON for `/api`
/// paths, an HTML page for everything else.
pub fn handle(req: Request, app: &App) -> Response {
    let is_api = req.uri().path().starts_with("/api/");

    match route(req, app) {
        Ok(resp) => resp,
        Err(err) => {
            if err.status() >= 500 {
                warn!(error = %err, "request failed");
            }
            if is_api {
                json_error_response(&err)
            } else {
                html_error_response(&err)
            }
        }
    }
}

pub fn route(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method.as_str(), segments.as_slice()) {
        // JSON API
        ("POST", ["api", "auth", "register"]) => api::register(req, app),
        ("POST", ["api", "auth", "login"]) => api::login(req, app),
        ("GET", ["api", "properties"]) => api::list_properties(req, app),
        ("POST", ["api", "properties"]) => api::create_property(req, app),
        ("GET", ["api", "properties", "recent"]) => api::recent_properties(req, app),
        ("DELETE", ["api", "properties", id]) => api::delete_property(req, app, id),

        // Pages
        ("GET", [""]) => pages::login(req, app),
        ("POST", ["login"]) => pages::login_submit(req, app),
        ("POST", ["register"]) => pages::register_submit(req, app),
        ("POST", ["logout"]) => pages::logout(req, app),
        ("GET", ["dashboard"]) => pages::dashboard(req, app),
        ("GET", ["dashboard", "click"]) => pages::map_click(req, app),
        ("POST", ["dashboard", "properties"]) => pages::create_property(req, app),
        ("GET", ["dashboard", "properties", id]) => pages::property_detail(req, app, id),
        ("POST", ["dashboard", "properties", id, "delete"]) => {
            pages::delete_property(req, app, id)
        }
        ("GET", ["dashboard", "properties", id, "edit"]) => pages::edit_property(req, app, id),

        // Static files
        ("GET", ["uploads", rest @ ..]) => serve_file(&app.config.upload_dir, &rest.join("/")),
        ("GET", [dir @ ("css" | "js" | "images"), rest @ ..]) => {
            serve_file(&app.config.frontend_dir.join(dir), &rest.join("/"))
        }

        _ => Err(ServerError::NotFound("Not Found".into())),
    }
}
