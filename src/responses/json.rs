// responses/json.rs
use astra::{Body, Response, ResponseBuilder};
use serde::Serialize;
use serde_json::json;

use crate::errors::ServerError;
use crate::responses::ResultResp;

pub fn json_response<T: Serialize>(status: u16, value: &T) -> ResultResp {
    let body = serde_json::to_vec(value).map_err(|_| ServerError::InternalError)?;

    ResponseBuilder::new()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .map_err(|_| ServerError::InternalError)
}

/// `{"message": …}` with a 200.
pub fn json_message(message: &str) -> ResultResp {
    json_response(200, &json!({ "message": message }))
}

/// `{"error": …}` carrying the error's status.
pub fn json_error_response(err: &ServerError) -> Response {
    let body = json!({ "error": err.message() }).to_string();

    ResponseBuilder::new()
        .status(err.status())
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::from("Internal Server Error")))
}
