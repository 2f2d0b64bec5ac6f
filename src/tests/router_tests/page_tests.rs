use crate::tests::utils::*;
use astra::Body;
use http::{Method, Request};

fn form_post(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("session={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn with_cookie(mut req: Request<Body>, token: &str) -> Request<Body> {
    req.headers_mut()
        .insert("Cookie", format!("session={token}").parse().unwrap());
    req
}

#[test]
fn login_page_shows_both_forms() {
    let app = test_app();
    let resp = get(&app, "/", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("action=\"/login\""));
    assert!(body.contains("action=\"/register\""));
}

#[test]
fn dashboard_requires_a_session() {
    let app = test_app();

    let resp = get(&app, "/dashboard", None);
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/");

    let resp = get(&app, "/dashboard", Some("stale-token"));
    assert_eq!(resp.status(), 303);
}

#[test]
fn html_register_and_login_set_session_cookie() {
    let app = test_app();

    let req = multipart_request(
        Method::POST,
        "/register",
        None,
        &[("fullname", "Dash User"), ("email", "dash@example.com"), ("password", "secret1")],
        &[],
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/dashboard");
    let token = cookie_token(&resp);
    assert!(!token.is_empty());

    let resp = get(&app, "/dashboard", Some(&token));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Dash User"));
    assert!(body.contains("Select a block"));

    let resp = send(&app, form_post("/login", "email=dash%40example.com&password=secret1", None));
    assert_eq!(resp.status(), 303);
    assert!(!cookie_token(&resp).is_empty());

    let resp = send(&app, form_post("/login", "email=dash%40example.com&password=nope", None));
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Invalid credentials"));
}

#[test]
fn logout_revokes_the_session() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let resp = send(&app, form_post("/logout", "", Some(&token)));
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Set-Cookie").contains("Max-Age=0"));

    assert_eq!(get(&app, "/dashboard", Some(&token)).status(), 303);
}

#[test]
fn dashboard_places_markers_for_selected_block() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    let id = create_listing(&app, &token, "a", "rent", 0.5, 0.5);
    create_listing(&app, &token, "b", "sell", 0.5, 0.5);

    let resp = get(&app, "/dashboard?block=a", Some(&token));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    assert!(body.contains("/images/a.jpg"));
    // (0.5, 0.5) on an 800x600 map is (400, 300); the 16px marker starts 8px earlier
    assert!(body.contains("left: 392.0px; top: 292.0px"));
    assert_eq!(body.matches("class=\"marker ").count(), 1);
    assert!(body.contains(&format!("/dashboard/properties/{id}?")));
}

#[test]
fn focus_centers_and_highlights_one_listing() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    let id = create_listing(&app, &token, "a", "rent", 0.25, 0.25);
    create_listing(&app, &token, "a", "rent", 0.75, 0.75);

    let resp = get(&app, &format!("/dashboard?block=a&focus={id}"), Some(&token));
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);

    // zoom 5 puts (0.25, 0.25) at (1000, 750) in image space; centering on an
    // 800x600 map pans by (-600, -450) and the 32px marker starts 16px earlier
    assert_eq!(body.matches("marker-rent highlighted").count(), 1);
    assert!(body.contains("left: 384.0px; top: 284.0px"));
    assert!(body.contains("zoom=5&amp;pan_x=-600&amp;pan_y=-450"));
    assert!(body.contains("500%"));
    // the focus is applied once, not carried into the next click
    assert!(!body.contains("name=\"focus\""));
}

#[test]
fn cards_and_detail_link_back_to_the_map() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    let id = create_listing(&app, &token, "a", "rent", 0.5, 0.5);
    let show = format!(
        "href=\"/dashboard?block=a&amp;zoom=1&amp;pan_x=0&amp;pan_y=0&amp;view=grid&amp;focus={id}\""
    );

    let body = body_string(get(&app, "/dashboard?block=a", Some(&token)));
    assert!(body.contains("Show on map"));
    assert!(body.contains(&show), "{body}");

    let body = body_string(get(&app, &format!("/dashboard/properties/{id}"), Some(&token)));
    assert!(body.contains(&show), "{body}");
}

#[test]
fn hidden_markers_are_not_drawn_or_hit() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    create_listing(&app, &token, "a", "rent", 0.5, 0.5);

    let body = body_string(get(&app, "/dashboard?block=a", Some(&token)));
    assert!(body.contains("Hide markers"));
    assert!(body.contains("markers=hide"));

    let body = body_string(get(&app, "/dashboard?block=a&markers=hide", Some(&token)));
    assert_eq!(body.matches("class=\"marker ").count(), 0);
    assert!(body.contains("Show markers"));
    assert!(body.contains("name=\"markers\" value=\"hide\""));

    // the spot under the hidden marker is free to place a new listing
    let resp = get(
        &app,
        "/dashboard/click?block=a&zoom=1&pan_x=0&pan_y=0&markers=hide&map.x=400&map.y=300",
        Some(&token),
    );
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Add property in block a"));
}

#[test]
fn map_click_without_block_asks_for_one() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let resp = get(&app, "/dashboard/click?map.x=10&map.y=10", Some(&token));
    assert_eq!(resp.status(), 303);
    let location = header(&resp, "Location");
    assert!(location.ends_with("notice=no_block"), "{location}");

    let body = body_string(get(&app, &location, Some(&token)));
    assert!(body.contains("Please select a block first."));
}

#[test]
fn map_click_hits_marker_or_opens_new_listing_form() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    let id = create_listing(&app, &token, "a", "rent", 0.5, 0.5);

    let resp = get(
        &app,
        "/dashboard/click?block=a&zoom=1&pan_x=0&pan_y=0&map.x=410&map.y=290",
        Some(&token),
    );
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Location").starts_with(&format!("/dashboard/properties/{id}?")));

    let resp = get(
        &app,
        "/dashboard/click?block=a&zoom=1&pan_x=0&pan_y=0&map.x=80&map.y=60",
        Some(&token),
    );
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Add property in block a"));
    assert!(body.contains("&quot;x&quot;:0.1,&quot;y&quot;:0.1"));

    let resp = get(
        &app,
        "/dashboard/click?block=a&zoom=1&pan_x=0&pan_y=0&map.x=900&map.y=10",
        Some(&token),
    );
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Location").ends_with("notice=outside"));
}

#[test]
fn panned_click_accounts_for_image_offset() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");
    let id = create_listing(&app, &token, "a", "rent", 0.5, 0.5);

    // zoom 2: the listing sits at (800, 600) in image space, the image is
    // shifted by (-400, -300), so the marker is at (400, 300) on screen
    let resp = get(
        &app,
        "/dashboard/click?block=a&zoom=2&pan_x=-400&pan_y=-300&map.x=805&map.y=598",
        Some(&token),
    );
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Location").starts_with(&format!("/dashboard/properties/{id}?")));
}

#[test]
fn page_create_detail_edit_and_delete() {
    let app = test_app();
    let (owner, _) = register_user(&app, "Owner", "owner@example.com");
    let (other, _) = register_user(&app, "Other", "other@example.com");

    let req = with_cookie(
        multipart_request(
            Method::POST,
            "/dashboard/properties?block=a&zoom=1&pan_x=0&pan_y=0&view=grid",
            None,
            &listing_fields("a", "sell", r#"{"x":0.3,"y":0.6}"#),
            &[],
        ),
        &owner,
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 303);
    assert!(header(&resp, "Location").ends_with("notice=created"));

    let rows = body_json(get(&app, "/api/properties?block=a", None));
    let id = rows[0]["id"].as_i64().unwrap();

    let body = body_string(get(&app, &format!("/dashboard/properties/{id}"), Some(&owner)));
    assert!(body.contains("a Property Details"));
    assert!(body.contains("$1,200"));
    assert!(body.contains("X: 0.300, Y: 0.600"));
    assert!(body.contains(&format!("/dashboard/properties/{id}/delete")));

    let body = body_string(get(&app, &format!("/dashboard/properties/{id}"), Some(&other)));
    assert!(!body.contains(&format!("/dashboard/properties/{id}/delete")));

    let body = body_string(get(&app, &format!("/dashboard/properties/{id}/edit"), Some(&owner)));
    assert!(body.contains("Edit functionality coming soon!"));
    let resp = get(&app, &format!("/dashboard/properties/{id}/edit"), Some(&other));
    assert_eq!(resp.status(), 403);

    let resp = send(&app, form_post(&format!("/dashboard/properties/{id}/delete"), "", Some(&other)));
    assert_eq!(resp.status(), 403);
    assert!(body_string(resp).contains("You can only delete your own properties"));

    let resp = send(&app, form_post(&format!("/dashboard/properties/{id}/delete"), "", Some(&owner)));
    assert_eq!(resp.status(), 303);
    assert_eq!(
        get(&app, &format!("/dashboard/properties/{id}"), Some(&owner)).status(),
        404
    );
}

#[test]
fn page_create_with_bad_input_shows_form_again() {
    let app = test_app();
    let (token, _) = register_user(&app, "Ann", "ann@example.com");

    let mut fields = listing_fields("a", "rent", r#"{"x":0.4,"y":0.4}"#);
    fields.retain(|(name, _)| *name != "price");

    let req = with_cookie(
        multipart_request(Method::POST, "/dashboard/properties", None, &fields, &[]),
        &token,
    );
    let resp = send(&app, req);
    assert_eq!(resp.status(), 400);
    let body = body_string(resp);
    assert!(body.contains("price is required"));
    assert!(body.contains("Add property in block a"));
}
