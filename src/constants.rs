use chrono::{Duration, TimeDelta};

/// DynamoDB table holding listing documents (bids embedded).
pub const LISTING_TABLE: &str = "offer-house-listings";
/// DynamoDB table holding guest verification challenges, keyed by email.
pub const VERIFICATION_TABLE: &str = "offer-house-verifications";

/// JWT audience expected on caller tokens.
pub const JWT_AUDIENCE: &str = "offer-house-rs";

/// How long a guest verification code stays valid.
pub const CODE_TTL: TimeDelta = Duration::minutes(10);

/// Attempts of the read-compute-write cycle before giving up on a listing.
pub const MAX_COMMIT_ATTEMPTS: u32 = 8;
