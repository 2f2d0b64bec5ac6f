use crate::tests::utils::*;

#[test]
fn frontend_assets_are_served() {
    let app = test_app();

    let resp = get(&app, "/css/style.css", None);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "text/css; charset=utf-8");

    let resp = get(&app, "/images/a.jpg", None);
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "Content-Type"), "image/jpeg");
}

#[test]
fn traversal_and_missing_files_are_not_found() {
    let app = test_app();

    for uri in [
        "/css/../../etc/passwd",
        "/uploads/../test.sqlite3",
        "/images/missing.jpg",
        "/js/",
    ] {
        assert_eq!(get(&app, uri, None).status(), 404, "{uri}");
    }
}

#[test]
fn unknown_routes_render_by_surface() {
    let app = test_app();

    let resp = get(&app, "/api/nothing", None);
    assert_eq!(resp.status(), 404);
    assert_eq!(header(&resp, "Content-Type"), "application/json");
    assert_eq!(body_json(resp)["error"], "Not Found");

    let resp = get(&app, "/nowhere", None);
    assert_eq!(resp.status(), 404);
    assert!(body_string(resp).contains("Error 404"));
}
