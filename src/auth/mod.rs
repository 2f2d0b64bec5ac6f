pub mod gateway;
pub mod password;
pub mod token;

pub use gateway::{request_token, AuthConfig, AuthService, AuthSession};
