use maud::{html, Markup};

use crate::map::query::{MapQuery, MAP_WIDTH_PX, PAN_STEP_PX, ZOOM_STEP};
use crate::map::{DashboardState, Marker, PixelPoint};

fn px(v: f64) -> String {
    format!("{:.1}px", v)
}

/// The block image with its markers on top. The image is an
/// `<input type="image">`, so a click submits `map.x`/`map.y` (relative to
/// the image) together with the current view as hidden fields.
pub fn map_view(state: &DashboardState, query: &MapQuery, container_height: f64) -> Markup {
    let Some(block) = state.current_block() else {
        return html! {
            div class="map-container map-empty" style=(format!("width: {}; height: {}", px(MAP_WIDTH_PX), px(container_height))) {
                p { "Select a block to see its map." }
            }
        };
    };

    let viewport = state.viewport();
    let pan = viewport.pan();
    let (img_w, img_h) = viewport.image_size();

    html! {
        div class="map-container"
            style=(format!("position: relative; overflow: hidden; width: {}; height: {}", px(MAP_WIDTH_PX), px(container_height)))
        {
            form method="get" action="/dashboard/click" {
                @for (name, value) in query.pairs() {
                    input type="hidden" name=(name) value=(value);
                }
                input
                    type="image"
                    name="map"
                    class="block-image"
                    src=(format!("/images/{block}.jpg"))
                    alt=(format!("Block {block} map"))
                    style=(format!(
                        "position: absolute; left: {}; top: {}; width: {}; height: {}",
                        px(pan.x), px(pan.y), px(img_w), px(img_h)
                    ));
            }
            @for marker in state.markers().iter().filter(|_| state.markers_visible()) {
                a
                    class=(marker_class(state, marker))
                    href=(query.href(&format!("/dashboard/properties/{}", marker.listing_id)))
                    title=(format!("{} #{}", marker.kind, marker.listing_id))
                    style=(format!(
                        "position: absolute; left: {}; top: {}; width: {}; height: {}; background: {}",
                        px(marker.center.x - marker.size / 2.0),
                        px(marker.center.y - marker.size / 2.0),
                        px(marker.size),
                        px(marker.size),
                        marker.kind.color()
                    )) {}
            }
        }
        (map_controls(state, query, container_height))
    }
}

fn marker_class(state: &DashboardState, marker: &Marker) -> String {
    if state.highlighted() == Some(marker.listing_id) {
        format!("marker marker-{} highlighted", marker.kind)
    } else {
        format!("marker marker-{}", marker.kind)
    }
}

fn map_controls(state: &DashboardState, query: &MapQuery, container_height: f64) -> Markup {
    let v = state.viewport();
    let center = PixelPoint::new(MAP_WIDTH_PX / 2.0, container_height / 2.0);
    let link = |next: &crate::map::ViewportState| query.with_viewport(next).href("/dashboard");

    let reset = MapQuery {
        zoom: 1.0,
        pan: PixelPoint::new(0.0, 0.0),
        ..query.clone()
    };

    html! {
        div class="map-controls" {
            a class="control" href=(link(&v.zoomed_about(center, ZOOM_STEP))) title="Zoom in" { "+" }
            a class="control" href=(link(&v.zoomed_about(center, 1.0 / ZOOM_STEP))) title="Zoom out" { "−" }
            a class="control" href=(link(&v.panned_by(PAN_STEP_PX, 0.0))) title="Pan left" { "←" }
            a class="control" href=(link(&v.panned_by(-PAN_STEP_PX, 0.0))) title="Pan right" { "→" }
            a class="control" href=(link(&v.panned_by(0.0, PAN_STEP_PX))) title="Pan up" { "↑" }
            a class="control" href=(link(&v.panned_by(0.0, -PAN_STEP_PX))) title="Pan down" { "↓" }
            a class="control" href=(reset.href("/dashboard")) { "Reset" }
            @if !state.markers().is_empty() {
                a class="control" href=(format!("{}&fit=1", query.href("/dashboard"))) { "Zoom to markers" }
            }
            @if state.markers_visible() {
                a class="control" href=(query.with_markers_shown(false).href("/dashboard")) { "Hide markers" }
            } @else {
                a class="control" href=(query.with_markers_shown(true).href("/dashboard")) { "Show markers" }
            }
            span class="zoom-level" { (format!("{:.0}%", v.zoom() * 100.0)) }
        }
    }
}
