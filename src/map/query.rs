// src/map/query.rs
use std::collections::HashMap;

use url::form_urlencoded;

use crate::domain::ListingType;
use crate::map::viewport::{clamp_zoom, PixelPoint, ViewportError, ViewportState};
use crate::requests::param;

/// Width of the map container on the dashboard, in CSS pixels.
pub const MAP_WIDTH_PX: f64 = 800.0;

/// Pixels moved by one pan button press.
pub const PAN_STEP_PX: f64 = 100.0;

/// Zoom multiplier of the +/- buttons.
pub const ZOOM_STEP: f64 = 1.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

/// Dashboard view settings carried in the URL, so every link and form on the
/// page can reproduce the current view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapQuery {
    pub block: Option<String>,
    pub kind: Option<ListingType>,
    pub zoom: f64,
    pub pan: PixelPoint,
    pub view: ViewMode,
    /// Listing to center on and highlight, consumed by the dashboard handler.
    pub focus: Option<i64>,
    pub show_markers: bool,
}

impl Default for MapQuery {
    fn default() -> Self {
        Self {
            block: None,
            kind: None,
            zoom: 1.0,
            pan: PixelPoint::new(0.0, 0.0),
            view: ViewMode::Grid,
            focus: None,
            show_markers: true,
        }
    }
}

impl MapQuery {
    /// Lenient: unknown or malformed values fall back to the defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let num = |key: &str| {
            param(params, key)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };

        Self {
            block: param(params, "block").map(str::to_string),
            kind: param(params, "type").and_then(|t| ListingType::parse(t).ok()),
            zoom: clamp_zoom(num("zoom").unwrap_or(1.0)),
            pan: PixelPoint::new(num("pan_x").unwrap_or(0.0), num("pan_y").unwrap_or(0.0)),
            view: match param(params, "view") {
                Some("list") => ViewMode::List,
                _ => ViewMode::Grid,
            },
            focus: param(params, "focus").and_then(|v| v.parse::<i64>().ok()),
            show_markers: param(params, "markers") != Some("hide"),
        }
    }

    pub fn viewport(&self, aspect: f64) -> Result<ViewportState, ViewportError> {
        ViewportState::from_zoom(MAP_WIDTH_PX, self.zoom, self.pan, aspect)
    }

    pub fn with_viewport(&self, viewport: &ViewportState) -> Self {
        Self {
            zoom: viewport.zoom(),
            pan: viewport.pan(),
            ..self.clone()
        }
    }

    pub fn with_view(&self, view: ViewMode) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    pub fn with_markers_shown(&self, show_markers: bool) -> Self {
        Self {
            show_markers,
            ..self.clone()
        }
    }

    /// "Show on map": switch to the listing's block and center on it.
    pub fn focused_on(&self, block: &str, listing_id: i64) -> Self {
        Self {
            block: Some(block.to_string()),
            focus: Some(listing_id),
            ..self.clone()
        }
    }

    /// Key/value pairs in a stable order, for links and hidden form inputs.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(block) = &self.block {
            out.push(("block", block.clone()));
        }
        if let Some(kind) = self.kind {
            out.push(("type", kind.as_str().to_string()));
        }
        out.push(("zoom", format_num(self.zoom)));
        out.push(("pan_x", format_num(self.pan.x)));
        out.push(("pan_y", format_num(self.pan.y)));
        out.push(("view", self.view.as_str().to_string()));
        if let Some(id) = self.focus {
            out.push(("focus", id.to_string()));
        }
        if !self.show_markers {
            out.push(("markers", "hide".to_string()));
        }
        out
    }

    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }

    /// `path?query`
    pub fn href(&self, path: &str) -> String {
        format!("{path}?{}", self.to_query_string())
    }
}

fn format_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}
