// src/map/viewport.rs
//
// Coordinate mapping between screen pixels and normalized block-image space.
// A viewport is an affine map: scale the normalized point to the rendered
// image size, rotate about the image origin, then translate by the pan.

use std::fmt;

use crate::domain::Coordinates;

/// Normalized image-space point: `x` and `y` are fractions of the image
/// width and height.
pub type NormalizedPoint = Coordinates;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 20.0;
/// Zoom used when jumping to a single listing.
pub const FOCUS_ZOOM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Max-axis distance.
    pub fn chebyshev(&self, other: &PixelPoint) -> f64 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportError {
    /// Scale is zero, negative or not finite.
    DegenerateScale,
    /// Image aspect ratio is zero, negative or not finite.
    DegenerateAspect,
    /// Container width is zero, negative or not finite.
    DegenerateContainer,
    /// Pan or rotation is NaN or infinite.
    NonFinite,
}

impl fmt::Display for ViewportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewportError::DegenerateScale => write!(f, "viewport scale must be positive"),
            ViewportError::DegenerateAspect => write!(f, "image aspect must be positive"),
            ViewportError::DegenerateContainer => {
                write!(f, "container width must be positive")
            }
            ViewportError::NonFinite => write!(f, "viewport pan and rotation must be finite"),
        }
    }
}

impl std::error::Error for ViewportError {}

/// Axis-aligned rectangle in normalized space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormalizedRect {
    pub fn center(&self) -> NormalizedPoint {
        NormalizedPoint::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Grow by `frac` of the size on every side.
    pub fn padded(&self, frac: f64) -> Self {
        Self {
            x: self.x - self.width * frac,
            y: self.y - self.height * frac,
            width: self.width * (1.0 + 2.0 * frac),
            height: self.height * (1.0 + 2.0 * frac),
        }
    }
}

/// Pan/zoom/rotation snapshot of the block image on screen.
///
/// Fields are private: a `ViewportState` can only be built through the
/// validating constructors, so the inverse transform never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    /// Screen position of the image's top-left corner.
    pan: PixelPoint,
    /// Rendered width of the whole image, in pixels.
    scale: f64,
    /// Image height / width.
    aspect: f64,
    /// Radians, clockwise on screen, about the image's top-left corner.
    rotation: f64,
    container_width: f64,
}

impl ViewportState {
    pub fn new(
        pan: PixelPoint,
        scale: f64,
        aspect: f64,
        rotation: f64,
        container_width: f64,
    ) -> Result<Self, ViewportError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ViewportError::DegenerateScale);
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(ViewportError::DegenerateAspect);
        }
        if !(container_width.is_finite() && container_width > 0.0) {
            return Err(ViewportError::DegenerateContainer);
        }
        if !(pan.x.is_finite() && pan.y.is_finite() && rotation.is_finite()) {
            return Err(ViewportError::NonFinite);
        }
        Ok(Self {
            pan,
            scale,
            aspect,
            rotation,
            container_width,
        })
    }

    /// Zoom 1 shows the full image width across the container.
    pub fn from_zoom(
        container_width: f64,
        zoom: f64,
        pan: PixelPoint,
        aspect: f64,
    ) -> Result<Self, ViewportError> {
        Self::new(pan, container_width * zoom, aspect, 0.0, container_width)
    }

    pub fn pan(&self) -> PixelPoint {
        self.pan
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    pub fn zoom(&self) -> f64 {
        self.scale / self.container_width
    }

    /// Rendered image size in pixels (before rotation).
    pub fn image_size(&self) -> (f64, f64) {
        (self.scale, self.scale * self.aspect)
    }

    pub fn to_pixel(&self, p: NormalizedPoint) -> PixelPoint {
        let lx = p.x * self.scale;
        let ly = p.y * self.scale * self.aspect;
        let (sin, cos) = self.rotation.sin_cos();
        PixelPoint::new(
            self.pan.x + lx * cos - ly * sin,
            self.pan.y + lx * sin + ly * cos,
        )
    }

    /// Inverse of [`to_pixel`](Self::to_pixel). Points off the image come back
    /// outside [0,1] unchanged.
    pub fn to_normalized(&self, p: PixelPoint) -> NormalizedPoint {
        let dx = p.x - self.pan.x;
        let dy = p.y - self.pan.y;
        let (sin, cos) = self.rotation.sin_cos();
        let lx = dx * cos + dy * sin;
        let ly = -dx * sin + dy * cos;
        NormalizedPoint::new(lx / self.scale, ly / (self.scale * self.aspect))
    }

    /// Multiply zoom by `factor`, keeping the image point under `anchor` fixed.
    pub fn zoomed_about(&self, anchor: PixelPoint, factor: f64) -> Self {
        let target = clamp_zoom(self.zoom() * factor) * self.container_width;
        let held = self.to_normalized(anchor);
        let mut next = Self {
            scale: target,
            ..*self
        };
        let moved = next.to_pixel(held);
        next.pan = PixelPoint::new(
            next.pan.x + anchor.x - moved.x,
            next.pan.y + anchor.y - moved.y,
        );
        next
    }

    pub fn panned_by(&self, dx: f64, dy: f64) -> Self {
        Self {
            pan: PixelPoint::new(self.pan.x + dx, self.pan.y + dy),
            ..*self
        }
    }

    /// Zoom to `zoom` with `point` in the middle of the container.
    pub fn centered_on(&self, point: NormalizedPoint, zoom: f64, container_height: f64) -> Self {
        let mut next = Self {
            scale: clamp_zoom(zoom) * self.container_width,
            ..*self
        };
        let at = next.to_pixel(point);
        next.pan = PixelPoint::new(
            next.pan.x + self.container_width / 2.0 - at.x,
            next.pan.y + container_height / 2.0 - at.y,
        );
        next
    }

    /// Largest zoom at which `rect` fits the container, centered.
    /// Rotation is kept but not accounted for when sizing.
    pub fn fit_bounds(&self, rect: NormalizedRect, container_height: f64) -> Self {
        let by_width = self.container_width / rect.width.abs();
        let by_height = container_height / (rect.height.abs() * self.aspect);
        let scale = by_width.min(by_height);
        let zoom = if scale.is_finite() {
            scale / self.container_width
        } else {
            MAX_ZOOM
        };
        self.centered_on(rect.center(), zoom, container_height)
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
