use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_helpers::{
    ApiResponse, AppError, ValidatedJson,
    errors::responses::{BadRequestResponse, InternalServerErrorResponse},
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{ContactForm, OutboundMessage, SendRequest};
use crate::service::RelayService;

pub const SEND_SUCCESS: &str = "Email sent successfully";
pub const CONTACT_SUCCESS: &str =
    "Your message has been sent successfully! We will get back to you soon.";
pub const CONTACT_FAILURE: &str = "Failed to send your message. Please try again later.";

/// OpenAPI documentation for the mail API
#[derive(OpenApi)]
#[openapi(
    info(title = "Mail API", description = "Relays emails and contact forms over SMTP"),
    paths(send_email, submit_contact),
    components(
        schemas(SendRequest, ContactForm, ApiResponse),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "mail", description = "Outbound email"),
        (name = "contact", description = "Contact form submissions")
    )
)]
pub struct MailApiDoc;

/// OpenAPI documentation for the per-site contact API
#[derive(OpenApi)]
#[openapi(
    info(title = "Contact API", description = "Handles contact form submissions from websites"),
    paths(submit_site_contact, site_health),
    components(
        schemas(ContactForm, ApiResponse),
        responses(BadRequestResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = "contact", description = "Contact form submissions")
    )
)]
pub struct ContactApiDoc;

/// Routes of the mail API: `POST /send` and `POST /contact`.
pub fn mail_router(service: RelayService) -> Router {
    Router::new()
        .route("/send", post(send_email))
        .route("/contact", post(submit_contact))
        .with_state(Arc::new(service))
}

/// Routes of the contact API, one recipient per site.
pub fn contact_router(service: RelayService) -> Router {
    Router::new()
        .route("/api/v1/contact/{site}", post(submit_site_contact))
        .route("/api/v1/contact/{site}/health", get(site_health))
        .with_state(Arc::new(service))
}

/// Send an arbitrary email
#[utoipa::path(
    post,
    path = "/send",
    tag = "mail",
    request_body = SendRequest,
    responses(
        (status = 200, description = "Email relayed", body = ApiResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn send_email(
    State(service): State<Arc<RelayService>>,
    ValidatedJson(request): ValidatedJson<SendRequest>,
) -> Result<ApiResponse, AppError> {
    service.relay(&OutboundMessage::from(request)).await?;
    Ok(ApiResponse::ok(SEND_SUCCESS))
}

/// Submit a contact form to the default recipient
#[utoipa::path(
    post,
    path = "/contact",
    tag = "contact",
    request_body = ContactForm,
    responses(
        (status = 200, description = "Message relayed", body = ApiResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn submit_contact(
    State(service): State<Arc<RelayService>>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> Result<ApiResponse, AppError> {
    let to = service.config().default_to.clone();
    deliver_contact(&service, form, to).await
}

/// Submit a contact form for a website
#[utoipa::path(
    post,
    path = "/api/v1/contact/{site}",
    tag = "contact",
    params(
        ("site" = String, Path, description = "Website identifier")
    ),
    request_body = ContactForm,
    responses(
        (status = 200, description = "Message relayed", body = ApiResponse),
        (status = 400, response = BadRequestResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn submit_site_contact(
    State(service): State<Arc<RelayService>>,
    Path(site): Path<String>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> Result<ApiResponse, AppError> {
    let to = service.config().recipient_for(&site).to_string();
    tracing::info!(%site, %to, "Contact form received");
    deliver_contact(&service, form, to).await
}

/// Report the routing for a website without sending anything
#[utoipa::path(
    get,
    path = "/api/v1/contact/{site}/health",
    tag = "contact",
    params(
        ("site" = String, Path, description = "Website identifier")
    ),
    responses(
        (status = 200, description = "Site routing", body = ApiResponse)
    )
)]
async fn site_health(
    State(service): State<Arc<RelayService>>,
    Path(site): Path<String>,
) -> ApiResponse {
    let config = service.config();
    ApiResponse::ok(format!("Contact API for {} is running", site)).with_data(json!({
        "website": site,
        "recipient": config.recipient_for(&site),
        "smtp_host": config.smtp_host,
    }))
}

/// Relay failures are logged by the service; callers only see a generic message.
async fn deliver_contact(
    service: &RelayService,
    form: ContactForm,
    to: String,
) -> Result<ApiResponse, AppError> {
    let failed = |_| AppError::InternalServerError(CONTACT_FAILURE.to_string());
    let message = service.contact_message(form, to).map_err(failed)?;
    service.relay(&message).await.map_err(failed)?;
    Ok(ApiResponse::ok(CONTACT_SUCCESS))
}
