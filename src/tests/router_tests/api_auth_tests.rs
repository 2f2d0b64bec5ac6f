use crate::tests::utils::*;
use astra::Body;
use http::{Method, Request};

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

#[test]
fn register_returns_token_and_user() {
    let app = test_app();
    let req = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[("fullname", "Ann Lee"), ("email", "Ann@Example.com"), ("password", "secret1")],
        &[FilePart {
            field: "photo",
            filename: "me.png",
            content_type: "image/png",
            data: b"\x89PNG",
        }],
    );

    let resp = send(&app, req);
    assert_eq!(resp.status(), 200);

    let json = body_json(resp);
    assert_eq!(json["message"], "User registered successfully");
    assert_eq!(json["user"]["fullname"], "Ann Lee");
    assert_eq!(json["user"]["email"], "ann@example.com");
    assert!(!json["token"].as_str().unwrap().is_empty());

    let photo = json["user"]["photo"].as_str().unwrap();
    assert!(photo.ends_with(".png"));
    assert!(app.config.photos_dir().join(photo).exists());
}

#[test]
fn duplicate_registration_is_rejected_and_photo_discarded() {
    let app = test_app();
    register_user(&app, "Ann", "dup@example.com");

    let req = multipart_request(
        Method::POST,
        "/api/auth/register",
        None,
        &[("fullname", "Other"), ("email", "dup@example.com"), ("password", "secret1")],
        &[FilePart {
            field: "photo",
            filename: "x.jpg",
            content_type: "image/jpeg",
            data: b"jpg",
        }],
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "User already exists");

    let left = std::fs::read_dir(app.config.photos_dir()).unwrap().count();
    assert_eq!(left, 0);
}

#[test]
fn registration_validates_fields() {
    let app = test_app();
    for fields in [
        vec![("email", "a@b.com"), ("password", "secret1")],
        vec![("fullname", "Ann"), ("email", "not-an-email"), ("password", "secret1")],
        vec![("fullname", "Ann"), ("email", "a@b.com"), ("password", "123")],
    ] {
        let req = multipart_request(Method::POST, "/api/auth/register", None, &fields, &[]);
        let resp = send(&app, req);
        assert_eq!(resp.status(), 400, "{fields:?}");
        assert!(body_json(resp)["error"].is_string());
    }
}

#[test]
fn login_succeeds_and_rejects_bad_credentials() {
    let app = test_app();
    let (_, user_id) = register_user(&app, "Ann", "ann@example.com");

    let resp = send(&app, login_request("ann@example.com", "secret1"));
    assert_eq!(resp.status(), 200);
    let json = body_json(resp);
    assert_eq!(json["message"], "Login successful");
    assert_eq!(json["user"]["id"], user_id);

    for (email, password) in [("ann@example.com", "wrong!"), ("ghost@example.com", "secret1")] {
        let resp = send(&app, login_request(email, password));
        assert_eq!(resp.status(), 400);
        assert_eq!(body_json(resp)["error"], "Invalid credentials");
    }
}

#[test]
fn protected_routes_distinguish_missing_and_invalid_tokens() {
    let app = test_app();
    let coords = r#"{"x":0.5,"y":0.5}"#;
    let fields = listing_fields("A", "rent", coords);

    let resp = send(
        &app,
        multipart_request(Method::POST, "/api/properties", None, &fields, &[]),
    );
    assert_eq!(resp.status(), 401);
    assert_eq!(body_json(resp)["error"], "Access token required");

    let resp = send(
        &app,
        multipart_request(Method::POST, "/api/properties", Some("forged"), &fields, &[]),
    );
    assert_eq!(resp.status(), 403);
    assert_eq!(body_json(resp)["error"], "Invalid token");
}
