use core::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

/// Bid lifecycle state. A bid leaves `Pending` exactly once and never
/// transitions out of the terminal states.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
    Archived,
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = match *self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
            BidStatus::Archived => "archived",
        };
        write!(f, "{}", out)
    }
}

/// Identity of an offering party. Registered users carry their account id,
/// guests carry the pseudo-identity derived from their verified email.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BidderId {
    Registered {
        /// Account id from the identity provider.
        id: String,
    },
    Guest {
        /// Deterministic hash of the verified email, see `utils::guest_identity`.
        pseudo_id: String,
    },
}

impl BidderId {
    /// Stable key used to address notifications to this party.
    pub fn notify_key(&self) -> &str {
        match self {
            BidderId::Registered { id } => id,
            BidderId::Guest { pseudo_id } => pseudo_id,
        }
    }

    /// Whether this bidder is the registered account `user_id`.
    pub fn is_account(&self, user_id: &str) -> bool {
        matches!(self, BidderId::Registered { id } if id == user_id)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Ulid, unique within the listing.
    pub id: Ulid,
    /// Offering party.
    pub bidder: BidderId,
    /// Display name of the offering party.
    pub bidder_name: String,
    /// Offer amount, > 0, currency-agnostic.
    pub amount: u64,
    /// Create time, in unix timestamp millis.
    pub create_at: u64,
    /// Bid state, see enum def.
    pub status: BidStatus,
    /// Opaque pre-authorized payment reference, stored and forwarded only.
    pub payment_token: Option<String>,
}

impl Bid {
    pub fn is_pending(&self) -> bool {
        self.status == BidStatus::Pending
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidPayload {
    /// Offer amount, > 0.
    pub amount: u64,
    /// Guest path: the challenged email. Ignored for authenticated callers.
    pub guest_email: Option<String>,
    /// Guest path: the code received for `guest_email`.
    pub guest_code: Option<String>,
    /// Opaque pre-authorized payment reference.
    pub payment_token: Option<String>,
}
