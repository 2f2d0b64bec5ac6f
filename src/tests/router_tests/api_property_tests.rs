use crate::tests::utils::*;
use astra::Body;
use http::{Method, Request};

fn delete(app: &crate::app::App, id: i64, token: &str) -> astra::Response {
    let req = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/properties/{id}"))
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req)
}

#[test]
fn created_listing_is_found_by_block() {
    let app = test_app();
    let (token, user_id) = register_user(&app, "Ann Lee", "ann@example.com");

    let id = create_listing(&app, &token, "A", "rent", 0.5, 0.5);
    create_listing(&app, &token, "B", "rent", 0.2, 0.2);

    let rows = body_json(get(&app, "/api/properties?block=A", None));
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row["id"], id);
    assert_eq!(row["user_id"], user_id);
    assert_eq!(row["property_type"], "rent");
    assert_eq!(row["coordinates"]["x"], 0.5);
    assert_eq!(row["coordinates"]["y"], 0.5);
    assert_eq!(row["fullname"], "Ann Lee");
    assert_eq!(row["price"], 1200.0);
}

#[test]
fn filters_combine_and_newest_comes_first() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let first = create_listing(&app, &token, "A", "rent", 0.1, 0.1);
    create_listing(&app, &token, "A", "sell", 0.2, 0.2);
    let last = create_listing(&app, &token, "A", "rent", 0.3, 0.3);

    let rows = body_json(get(&app, "/api/properties?block=A&type=rent", None));
    let ids: Vec<i64> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![last, first]);

    let resp = get(&app, "/api/properties?type=castle", None);
    assert_eq!(resp.status(), 400);
}

#[test]
fn invalid_listing_input_is_a_bad_request() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    for coords in [r#"{"x":"a","y":1}"#, r#"{"x":0.5}"#, "not json"] {
        let req = multipart_request(
            Method::POST,
            "/api/properties",
            Some(&token),
            &listing_fields("A", "rent", coords),
            &[],
        );
        let resp = send(&app, req);
        assert_eq!(resp.status(), 400, "{coords}");
        let msg = body_json(resp)["error"].as_str().unwrap().to_string();
        assert!(msg.contains("coordinates"), "{msg}");
    }

    let req = multipart_request(
        Method::POST,
        "/api/properties",
        Some(&token),
        &[("block_name", "A"), ("property_type", "rent")],
        &[],
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 400);
    assert_eq!(body_json(resp)["error"], "coordinates is required");
}

#[test]
fn recent_never_returns_more_than_ten() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    for i in 0..12 {
        let block = if i % 2 == 0 { "A" } else { "B" };
        create_listing(&app, &token, block, "sell", 0.5, 0.5);
    }

    let rows = body_json(get(&app, "/api/properties/recent", None));
    assert_eq!(rows.as_array().unwrap().len(), 10);

    let all = body_json(get(&app, "/api/properties", None));
    assert_eq!(all.as_array().unwrap().len(), 12);
}

#[test]
fn only_the_owner_can_delete() {
    let app = test_app();
    let (owner, _) = register_user(&app, "Owner", "owner@example.com");
    let (other, _) = register_user(&app, "Other", "other@example.com");
    let id = create_listing(&app, &owner, "A", "rent", 0.5, 0.5);

    let resp = delete(&app, id, &other);
    assert_eq!(resp.status(), 403);
    assert_eq!(
        body_json(resp)["error"],
        "You can only delete your own properties"
    );
    let rows = body_json(get(&app, "/api/properties?block=A", None));
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let resp = delete(&app, id, &owner);
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(resp)["message"], "Property deleted successfully");
    let rows = body_json(get(&app, "/api/properties?block=A", None));
    assert!(rows.as_array().unwrap().is_empty());

    let resp = delete(&app, id, &owner);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["error"], "Property not found");
}

#[test]
fn non_numeric_id_is_not_found() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let req = Request::builder()
        .method(Method::DELETE)
        .uri("/api/properties/abc")
        .header("Authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req);
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(resp)["error"], "Property not found");
}

#[test]
fn video_is_stored_served_and_removed_with_listing() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let req = multipart_request(
        Method::POST,
        "/api/properties",
        Some(&token),
        &listing_fields("A", "farm", r#"{"x":0.25,"y":0.75}"#),
        &[FilePart {
            field: "video",
            filename: "tour.mp4",
            content_type: "video/mp4",
            data: b"not-really-a-video",
        }],
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 200);
    let id = body_json(resp)["propertyId"].as_i64().unwrap();

    let rows = body_json(get(&app, "/api/properties?block=A", None));
    let video = rows[0]["video_path"].as_str().unwrap().to_string();

    let resp = get(&app, &format!("/uploads/videos/{video}"), None);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "video/mp4");
    assert_eq!(body_string(resp), "not-really-a-video");

    assert_eq!(delete(&app, id, &token).status(), 200);
    assert!(!app.config.videos_dir().join(&video).exists());
}

#[test]
fn non_video_upload_is_rejected() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let req = multipart_request(
        Method::POST,
        "/api/properties",
        Some(&token),
        &listing_fields("A", "rent", r#"{"x":0.5,"y":0.5}"#),
        &[FilePart {
            field: "video",
            filename: "notes.txt",
            content_type: "text/plain",
            data: b"hello",
        }],
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 400);

    let rows = body_json(get(&app, "/api/properties", None));
    assert!(rows.as_array().unwrap().is_empty());
}
