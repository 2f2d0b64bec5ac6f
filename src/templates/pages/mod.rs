pub mod dashboard;
pub mod login;
pub mod property;

pub use dashboard::{dashboard_page, DashboardVm};
pub use login::login_page;
pub use property::{edit_placeholder_page, new_listing_page, property_page};
