pub mod errors;
pub mod files;
pub mod html;
pub mod json;

pub use errors::{html_error_response, ResultResp};
pub use files::serve_file;
pub use html::{html_response, html_with_status, redirect, redirect_with_cookie};
pub use json::{json_error_response, json_message, json_response};
