use crate::app::App;
use crate::config::Config;
use crate::db::init_db;
use crate::router::handle;
use astra::{Body, Response};
use http::{Method, Request};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub const BOUNDARY: &str = "----listingsTestBoundary";

fn unique_dir(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{tag}_{}_{}",
        std::process::id(),
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// A fresh app on its own database file, upload dir and frontend dir, using
/// the production schema. Password hashing is turned down to keep tests fast.
pub fn test_app() -> App {
    let root = unique_dir("listings_test");
    let frontend = root.join("frontend");
    fs::create_dir_all(frontend.join("css")).unwrap();
    fs::create_dir_all(frontend.join("images")).unwrap();
    fs::write(frontend.join("css/style.css"), "body { margin: 0; }").unwrap();
    fs::write(frontend.join("images/a.jpg"), b"\xff\xd8\xff").unwrap();

    let config = Config {
        database_path: root.join("test.sqlite3").display().to_string(),
        upload_dir: root.join("uploads"),
        frontend_dir: frontend,
        password_rounds: 1_000,
        ..Config::default()
    };
    let app = App::new(config);
    app.uploads.ensure_dirs().unwrap();

    init_db(&app.db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    app
}

pub fn send(app: &App, req: Request<Body>) -> Response {
    handle(req, app)
}

pub fn get(app: &App, uri: &str, token: Option<&str>) -> Response {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    send(app, builder.body(Body::empty()).unwrap())
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_json(resp: Response) -> Value {
    serde_json::from_str(&body_string(resp)).unwrap()
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// `session=<token>; …` → `<token>`
pub fn cookie_token(resp: &Response) -> String {
    let cookie = header(resp, "Set-Cookie");
    cookie
        .strip_prefix("session=")
        .and_then(|rest| rest.split(';').next())
        .unwrap_or("")
        .to_string()
}

pub struct FilePart<'a> {
    pub field: &'a str,
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[FilePart]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for f in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                f.field, f.filename, f.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(f.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    fields: &[(&str, &str)],
    files: &[FilePart],
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder
        .body(Body::from(multipart_body(fields, files)))
        .unwrap()
}

/// Registers through the API; returns (token, user id).
pub fn register_user(app: &App, fullname: &str, email: &str) -> (String, i64) {
    let req = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[("fullname", fullname), ("email", email), ("password", "secret1")],
        &[],
    );
    let resp = send(app, req);
    assert_eq!(resp.status(), 200, "register failed");
    let json = body_json(resp);
    (
        json["token"].as_str().unwrap().to_string(),
        json["user"]["id"].as_i64().unwrap(),
    )
}

pub fn listing_fields<'a>(block: &'a str, kind: &'a str, coordinates: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("block_name", block),
        ("property_type", kind),
        ("coordinates", coordinates),
        ("measures", "120 m2"),
        ("bedrooms", "3"),
        ("bathrooms", "2"),
        ("kitchens", "1"),
        ("description", "Sunny corner house"),
        ("price", "1200"),
    ]
}

/// Creates a listing through the API and returns its id.
pub fn create_listing(app: &App, token: &str, block: &str, kind: &str, x: f64, y: f64) -> i64 {
    let coords = format!(r#"{{"x":{x},"y":{y}}}"#);
    let req = multipart_request(
        Method::POST,
        "/api/properties",
        Some(token),
        &listing_fields(block, kind, &coords),
        &[],
    );
    let resp = send(app, req);
    assert_eq!(resp.status(), 200, "create failed");
    body_json(resp)["propertyId"].as_i64().unwrap()
}
