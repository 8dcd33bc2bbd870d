use crate::{
    models::{
        auth::{Claim, Role},
        bid::BidderId,
    },
    utils,
};

pub mod bids;
pub mod verification;

pub use bids::BidEngine;
pub use verification::VerificationService;

/// The party invoking a state-machine operation: a registered account or a
/// guest who passed the email challenge in the same request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub bidder: BidderId,
    pub display_name: String,
    pub role: Role,
}

impl Actor {
    pub fn registered(claim: Claim<'_>) -> Self {
        Self {
            bidder: BidderId::Registered {
                id: claim.id.to_string(),
            },
            display_name: claim.display_name.to_string(),
            role: claim.role,
        }
    }

    pub fn guest(email: &str) -> Self {
        Self {
            bidder: BidderId::Guest {
                pseudo_id: utils::guest_identity(email),
            },
            display_name: utils::guest_display_name(email),
            role: Role::User,
        }
    }
}
