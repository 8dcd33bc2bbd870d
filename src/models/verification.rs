use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One pending guest identity check, keyed by email. A later request for the
/// same email replaces the record outright.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationChallenge {
    /// Normalized email address, hash key.
    pub email: String,
    /// 5-digit numeric code.
    pub code: String,
    /// Unix timestamp millis; the code is dead strictly after this.
    pub expires_at: u64,
    /// Set true exactly once, on successful submission.
    pub used: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodePayload {
    /// Email to challenge.
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCodePayload {
    /// Challenged email.
    pub email: String,
    /// Code as received in the email.
    pub code: String,
}
