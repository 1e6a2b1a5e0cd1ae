//! Reusable OpenAPI response types for consistent API documentation.

use crate::response::ApiResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - malformed JSON or missing fields",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Name is required"
    })
)]
pub struct BadRequestResponse(pub ApiResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error - the message could not be relayed",
    content_type = "application/json",
    example = json!({
        "success": false,
        "message": "Failed to send your message. Please try again later."
    })
)]
pub struct InternalServerErrorResponse(pub ApiResponse);
