// src/map/dashboard.rs

use crate::domain::{Listing, ListingFilter, ListingType};
use crate::map::markers::{MarkerRegistry, HIT_RADIUS_PX};
use crate::map::viewport::{NormalizedPoint, PixelPoint, ViewportState, FOCUS_ZOOM};

/// A pointer click on the map, in container pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub position: PixelPoint,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    NoBlockSelected,
    /// The click landed on an existing marker.
    ShowListing(i64),
    /// Free spot on the image: start a new listing here.
    PlaceListing(NormalizedPoint),
    /// The click missed the image.
    OutsideImage(NormalizedPoint),
}

/// Everything the map view needs between events: the selected block and
/// filter, the viewport, the markers on screen and who is looking.
#[derive(Debug)]
pub struct DashboardState {
    current_block: Option<String>,
    type_filter: Option<ListingType>,
    viewport: ViewportState,
    registry: MarkerRegistry,
    markers_visible: bool,
    highlighted: Option<i64>,
    current_user: Option<i64>,
}

impl DashboardState {
    pub fn new(viewport: ViewportState, current_user: Option<i64>) -> Self {
        Self {
            current_block: None,
            type_filter: None,
            viewport,
            registry: MarkerRegistry::new(),
            markers_visible: true,
            highlighted: None,
            current_user,
        }
    }

    pub fn current_block(&self) -> Option<&str> {
        self.current_block.as_deref()
    }

    pub fn type_filter(&self) -> Option<ListingType> {
        self.type_filter
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn current_user(&self) -> Option<i64> {
        self.current_user
    }

    pub fn markers_visible(&self) -> bool {
        self.markers_visible
    }

    /// Hidden markers are neither drawn nor clickable.
    pub fn set_markers_visible(&mut self, visible: bool) {
        self.markers_visible = visible;
    }

    /// Listing last centered with `focus_listing`.
    pub fn highlighted(&self) -> Option<i64> {
        self.highlighted
    }

    /// Switch blocks. Markers of the old block are dropped straight away;
    /// the caller reloads listings for the new one.
    pub fn select_block(&mut self, block: Option<String>) {
        self.current_block = block.filter(|b| !b.is_empty());
        self.registry.clear();
        self.highlighted = None;
    }

    pub fn apply_filter(&mut self, kind: Option<ListingType>) {
        self.type_filter = kind;
    }

    /// Query for the listings this view shows.
    pub fn filter(&self) -> ListingFilter {
        ListingFilter {
            block: self.current_block.clone(),
            kind: self.type_filter,
        }
    }

    /// Replace all markers with a fresh fetch. Rows from other blocks are
    /// skipped, and with no block selected the map stays empty.
    pub fn load_listings(&mut self, listings: &[Listing]) {
        let Some(block) = self.current_block.as_deref() else {
            self.registry.clear();
            return;
        };
        let on_block = listings.iter().filter(|l| l.block_name == block);
        self.registry.rebuild(on_block, &self.viewport);
    }

    /// Pan/zoom happened: move and resize every marker.
    pub fn on_viewport_change(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
        self.registry.reposition_all(&self.viewport);
        self.registry.rescale_all(self.viewport.zoom());
    }

    pub fn click(&self, event: &ClickEvent) -> ClickOutcome {
        if self.current_block.is_none() {
            return ClickOutcome::NoBlockSelected;
        }
        if self.markers_visible {
            if let Some(marker) = self.registry.hit_test(event.position, HIT_RADIUS_PX) {
                return ClickOutcome::ShowListing(marker.listing_id);
            }
        }
        let point = self.viewport.to_normalized(event.position);
        if point.in_image() {
            ClickOutcome::PlaceListing(point)
        } else {
            ClickOutcome::OutsideImage(point)
        }
    }

    /// Fit the view to the markers. False when there are none.
    pub fn zoom_to_markers(&mut self, container_height: f64) -> bool {
        let Some(bounds) = self.registry.bounds() else {
            return false;
        };
        let next = self.viewport.fit_bounds(bounds, container_height);
        self.on_viewport_change(next);
        true
    }

    /// Center on one listing's marker at close zoom and highlight it.
    /// False if the listing has no marker in this view.
    pub fn focus_listing(&mut self, listing_id: i64, container_height: f64) -> bool {
        let Some(point) = self.registry.find_listing(listing_id).map(|m| m.point) else {
            return false;
        };
        let next = self.viewport.centered_on(point, FOCUS_ZOOM, container_height);
        self.on_viewport_change(next);
        self.highlighted = Some(listing_id);
        true
    }

    pub fn is_owner(&self, listing: &Listing) -> bool {
        self.current_user == Some(listing.user_id)
    }
}
