use std::sync::Arc;

use axum::extract::{Json, State};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    errors::HandlerError,
    models::{
        verification::{RequestCodePayload, SubmitCodePayload},
        PlainSuccessResponse,
    },
    state::AppState,
};

pub fn router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(request_verification_code))
        .routes(routes!(submit_verification_code))
}

/// Request a one-time code for guest participation.
#[utoipa::path(
    post,
    path = "/request-code",
    tag = "Verification",
    request_body = RequestCodePayload,
    responses(
        (status = OK, description = "Code generated and handed to delivery", body = PlainSuccessResponse),
        (status = SERVICE_UNAVAILABLE, description = "Email delivery unavailable", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn request_verification_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RequestCodePayload>,
) -> Result<PlainSuccessResponse, HandlerError> {
    if payload.email.trim().is_empty() {
        return Err(HandlerError::bad_request("Email must not be empty."));
    }

    state.verification.request_code(&payload.email).await?;

    Ok(PlainSuccessResponse::ok("Verification code sent."))
}

/// Submit the code received by email.
#[utoipa::path(
    post,
    path = "/submit-code",
    tag = "Verification",
    request_body = SubmitCodePayload,
    responses(
        (status = OK, description = "Email verified", body = PlainSuccessResponse),
        (status = NOT_FOUND, description = "No challenge for this email", body = HandlerError),
        (status = BAD_REQUEST, description = "Expired, consumed or mismatched code", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn submit_verification_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitCodePayload>,
) -> Result<PlainSuccessResponse, HandlerError> {
    state
        .verification
        .submit_code(&payload.email, &payload.code)
        .await?;

    Ok(PlainSuccessResponse::ok("Email verified."))
}
