// src/map/markers.rs

use crate::domain::{Listing, ListingType};
use crate::map::viewport::{NormalizedPoint, NormalizedRect, PixelPoint, ViewportState};

/// Clicks within this many pixels (max-axis) of a marker select it.
pub const HIT_RADIUS_PX: f64 = 20.0;

pub const BASE_MARKER_SIZE: f64 = 16.0;
pub const MIN_MARKER_SIZE: f64 = 8.0;
pub const MAX_MARKER_SIZE: f64 = 32.0;

/// Padding added on each side by [`MarkerRegistry::bounds`], as a fraction
/// of the marker spread.
const BOUNDS_PADDING: f64 = 0.1;

/// Rendered marker edge length at `zoom`.
pub fn marker_size(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return BASE_MARKER_SIZE;
    }
    (BASE_MARKER_SIZE * zoom).clamp(MIN_MARKER_SIZE, MAX_MARKER_SIZE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerState {
    Active,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub point: NormalizedPoint,
    pub kind: ListingType,
    pub listing_id: i64,
    /// Screen position of the marker's center.
    pub center: PixelPoint,
    pub size: f64,
}

/// Markers for the block currently on screen, in insertion order.
#[derive(Debug, Default)]
pub struct MarkerRegistry {
    markers: Vec<Marker>,
    next_handle: u64,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a marker for a listing. Markers may overlap.
    pub fn add(
        &mut self,
        point: NormalizedPoint,
        kind: ListingType,
        listing_id: i64,
        viewport: &ViewportState,
    ) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;

        self.markers.push(Marker {
            handle,
            point,
            kind,
            listing_id,
            center: viewport.to_pixel(point),
            size: marker_size(viewport.zoom()),
        });
        handle
    }

    /// Drop every marker. Safe to call on an empty registry.
    pub fn clear(&mut self) {
        self.markers.clear();
    }

    /// Clear, then add one marker per listing.
    pub fn rebuild<'a, I>(&mut self, listings: I, viewport: &ViewportState)
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        self.clear();
        for l in listings {
            self.add(l.coordinates, l.property_type, l.id, viewport);
        }
    }

    /// First marker, in insertion order, whose center is strictly within
    /// `radius` pixels of `pixel` on both axes. Which of several overlapping
    /// markers wins is therefore an accident of load order.
    pub fn hit_test(&self, pixel: PixelPoint, radius: f64) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|m| m.center.chebyshev(&pixel) < radius)
    }

    pub fn reposition_all(&mut self, viewport: &ViewportState) {
        for m in &mut self.markers {
            m.center = viewport.to_pixel(m.point);
        }
    }

    pub fn rescale_all(&mut self, zoom: f64) {
        let size = marker_size(zoom);
        for m in &mut self.markers {
            m.size = size;
        }
    }

    /// Padded bounding box of all markers, for "zoom to markers".
    pub fn bounds(&self) -> Option<NormalizedRect> {
        let first = self.markers.first()?.point;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for m in &self.markers[1..] {
            min_x = min_x.min(m.point.x);
            min_y = min_y.min(m.point.y);
            max_x = max_x.max(m.point.x);
            max_y = max_y.max(m.point.y);
        }
        let rect = NormalizedRect {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        };
        Some(rect.padded(BOUNDS_PADDING))
    }

    pub fn state(&self, handle: MarkerHandle) -> MarkerState {
        if self.get(handle).is_some() {
            MarkerState::Active
        } else {
            MarkerState::Removed
        }
    }

    pub fn get(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.iter().find(|m| m.handle == handle)
    }

    pub fn find_listing(&self, listing_id: i64) -> Option<&Marker> {
        self.markers.iter().find(|m| m.listing_id == listing_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}
