use aws_sdk_dynamodb::{
    error::SdkError as DynamoSdkError,
    operation::{
        delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
        scan::ScanError,
    },
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use utoipa::{PartialSchema, ToSchema};

use crate::{models::ErrorResponse, traits::MailerError};

/// Repository-level failures. These are infrastructure errors; business rule
/// violations live in [`EngineError`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("DynamoDB Error: GetItem: {0}")]
    Get(#[from] DynamoSdkError<GetItemError>),
    #[error("DynamoDB Error: PutItem: {0}")]
    Put(#[from] DynamoSdkError<PutItemError>),
    #[error("DynamoDB Error: Scan: {0}")]
    Scan(#[from] DynamoSdkError<ScanError>),
    #[error("DynamoDB Error: DeleteItem: {0}")]
    Delete(#[from] DynamoSdkError<DeleteItemError>),
    #[error("SerdeDynamo failed to process DynamoDB data: {0}")]
    Serde(#[from] serde_dynamo::Error),
}

impl StoreError {
    fn inner_status(&self) -> Option<u16> {
        match self {
            StoreError::Get(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::Put(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::Scan(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::Delete(e) => e.raw_response().map(|r| r.status().as_u16()),
            StoreError::Serde(_) => None,
        }
    }
}

/// Business failures of the offer engine. Every message is short enough to
/// show to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Listing not found.")]
    ListingNotFound,
    #[error("Offer not found.")]
    BidNotFound,
    #[error("Offer amount must be greater than zero.")]
    InvalidAmount,
    #[error("{0}")]
    InvalidState(String),
    #[error("You cannot place an offer on your own listing.")]
    SelfBidNotAllowed,
    #[error("{0}")]
    Unauthorized(String),
    #[error("Verify your email before placing an offer.")]
    VerificationRequired,
    #[error("No verification code was requested for this email.")]
    ChallengeNotFound,
    #[error("This verification code has expired. Request a new one.")]
    ChallengeExpired,
    #[error("This verification code has already been used. Request a new one.")]
    ChallengeAlreadyUsed,
    #[error("The verification code does not match.")]
    CodeMismatch,
    #[error("Could not send the verification email. Try again later.")]
    EmailServiceUnavailable(#[from] MailerError),
    #[error("The operation could not be completed. Please try again.")]
    TransactionFailed,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    pub fn status(&self) -> StatusCode {
        match self {
            EngineError::ListingNotFound
            | EngineError::BidNotFound
            | EngineError::ChallengeNotFound => StatusCode::NOT_FOUND,
            EngineError::InvalidAmount
            | EngineError::InvalidState(_)
            | EngineError::SelfBidNotAllowed
            | EngineError::ChallengeExpired
            | EngineError::ChallengeAlreadyUsed
            | EngineError::CodeMismatch => StatusCode::BAD_REQUEST,
            EngineError::Unauthorized(_) => StatusCode::FORBIDDEN,
            EngineError::VerificationRequired => StatusCode::UNAUTHORIZED,
            EngineError::EmailServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            EngineError::TransactionFailed | EngineError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("{1}")]
    Handler(StatusCode, String),
}

impl From<StoreError> for HandlerError {
    fn from(value: StoreError) -> Self {
        Self::Engine(EngineError::Store(value))
    }
}

impl From<HandlerError> for ErrorResponse {
    fn from(value: HandlerError) -> Self {
        let status = match &value {
            HandlerError::Engine(e) => e.status(),
            HandlerError::Handler(s, _) => *s,
        };
        let inner_status = match &value {
            HandlerError::Engine(EngineError::Store(e)) => e.inner_status(),
            _ => None,
        };

        Self {
            status: status.as_u16(),
            inner_status,
            message: value.to_string(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

impl PartialSchema for HandlerError {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ErrorResponse::schema()
    }
}

impl ToSchema for HandlerError {
    fn schemas(
        schemas: &mut Vec<(
            String,
            utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
        )>,
    ) {
        <ErrorResponse as ToSchema>::schemas(schemas);
    }
}

impl HandlerError {
    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::Handler(StatusCode::BAD_REQUEST, message.into())
    }
}
