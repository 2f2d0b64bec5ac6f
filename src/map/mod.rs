pub mod dashboard;
pub mod markers;
pub mod query;
pub mod viewport;

pub use dashboard::{ClickEvent, ClickOutcome, DashboardState};
pub use markers::{Marker, MarkerHandle, MarkerRegistry, MarkerState};
pub use query::{MapQuery, ViewMode};
pub use viewport::{NormalizedPoint, PixelPoint, ViewportError, ViewportState};
