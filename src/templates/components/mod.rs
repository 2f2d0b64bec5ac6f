pub mod card;
pub mod error;
pub mod map;

pub use card::{card, format_price, listing_card, type_badge};
pub use error::{error_page, notice};
pub use map::map_view;
