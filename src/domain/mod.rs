pub mod listing;
pub mod user;

pub use listing::{Coordinates, Listing, ListingFilter, ListingStats, ListingType, NewListing};
pub use user::{Registration, User};
