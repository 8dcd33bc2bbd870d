use core::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;
use utoipa::ToSchema;

use super::bid::{Bid, BidStatus};

/// Listing sale state. Listings are created and withdrawn by the listing
/// manager; this engine only moves `Available` listings to `Sold`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Sold,
    Withdrawn,
}

impl Default for ListingStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = match *self {
            ListingStatus::Available => "available",
            ListingStatus::Sold => "sold",
            ListingStatus::Withdrawn => "withdrawn",
        };
        write!(f, "{}", out)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Ulid, hash key.
    pub id: Ulid,
    /// Owner's user id.
    pub seller_id: String,
    /// Listing title.
    pub title: String,
    /// Asking price; rewritten to the accepted bid's amount on acceptance.
    pub price: u64,
    /// Offers are refused while false.
    pub bidding_enabled: bool,
    /// Listing state, see enum def.
    pub status: ListingStatus,
    /// Offers in commit order.
    pub bids: Vec<Bid>,
    /// Set exactly once, on acceptance.
    pub accepted_bid_id: Option<Ulid>,
    /// Unix timestamp millis, Some once sold.
    pub sold_at: Option<u64>,
    /// Create time, in unix timestamp millis.
    pub create_at: u64,
    /// Write counter for the repository's conditional commit.
    pub version: u64,
}

impl Listing {
    /// Whether new offers may be placed against this listing.
    pub fn is_biddable(&self) -> bool {
        self.bidding_enabled && self.status != ListingStatus::Sold
    }

    pub fn bid(&self, bid_id: Ulid) -> Option<&Bid> {
        self.bids.iter().find(|b| b.id == bid_id)
    }

    pub fn bid_mut(&mut self, bid_id: Ulid) -> Option<&mut Bid> {
        self.bids.iter_mut().find(|b| b.id == bid_id)
    }

    pub fn has_pending_bids(&self) -> bool {
        self.bids.iter().any(|b| b.status == BidStatus::Pending)
    }
}
