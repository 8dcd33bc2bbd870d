//! The offer state machine. Every mutation is one optimistic transaction over
//! the listing document; notifications go out only after the commit sticks
//! and never change the reported outcome.

use std::sync::Arc;

use ulid::Ulid;

use crate::{
    errors::EngineError,
    models::{
        bid::{Bid, BidStatus, BidderId},
        listing::{Listing, ListingStatus},
    },
    store::{with_listing_transaction, ListingStore},
    traits::{NoticeKind, Notifier, TimeProvider},
};

use super::Actor;

#[derive(Clone)]
pub struct BidEngine {
    listings: Arc<dyn ListingStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn TimeProvider>,
}

/// The pending bid an incoming amount supersedes: highest amount strictly
/// below the new one, never the actor's own bids, ties excluded. Snapshot-time
/// computation; under contention the notice target is best-effort.
fn previous_highest<'a>(bids: &'a [Bid], amount: u64, bidder: &BidderId) -> Option<&'a Bid> {
    bids.iter()
        .filter(|b| b.is_pending())
        .filter(|b| &b.bidder != bidder)
        .filter(|b| b.amount < amount)
        .max_by_key(|b| b.amount)
}

fn authorize_decision(listing: &Listing, actor: &Actor) -> Result<(), EngineError> {
    if actor.bidder.is_account(&listing.seller_id) || actor.role.is_staff() {
        return Ok(());
    }
    Err(EngineError::Unauthorized(
        "Only the seller can decide offers on this listing.".to_string(),
    ))
}

fn listing_link(listing_id: Ulid) -> String {
    format!("/listings/{}", listing_id)
}

impl BidEngine {
    pub fn new(
        listings: Arc<dyn ListingStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            listings,
            notifier,
            clock,
        }
    }

    pub async fn listing(&self, listing_id: Ulid) -> Result<Listing, EngineError> {
        self.listings
            .load(listing_id)
            .await?
            .ok_or(EngineError::ListingNotFound)
    }

    /// Append a pending offer. Returns the created bid; the seller and, when
    /// one exists, the superseded highest bidder are notified post-commit.
    pub async fn place_bid(
        &self,
        listing_id: Ulid,
        amount: u64,
        actor: &Actor,
        payment_token: Option<String>,
    ) -> Result<Bid, EngineError> {
        let clock = self.clock.clone();
        let (bid, outbid, seller_id, title) =
            with_listing_transaction(self.listings.as_ref(), listing_id, |listing| {
                if amount == 0 {
                    return Err(EngineError::InvalidAmount);
                }
                if listing.status == ListingStatus::Sold {
                    return Err(EngineError::InvalidState(
                        "This item has already been sold.".to_string(),
                    ));
                }
                if !listing.is_biddable() {
                    return Err(EngineError::InvalidState(
                        "This listing is not accepting offers.".to_string(),
                    ));
                }
                if actor.bidder.is_account(&listing.seller_id) {
                    return Err(EngineError::SelfBidNotAllowed);
                }

                let outbid = previous_highest(&listing.bids, amount, &actor.bidder)
                    .map(|b| b.bidder.clone());
                let bid = Bid {
                    id: Ulid::new(),
                    bidder: actor.bidder.clone(),
                    bidder_name: actor.display_name.clone(),
                    amount,
                    create_at: clock.now_ms(),
                    status: BidStatus::Pending,
                    payment_token: payment_token.clone(),
                };

                let mut next = listing.clone();
                next.bids.push(bid.clone());

                Ok((
                    next,
                    (bid, outbid, listing.seller_id.clone(), listing.title.clone()),
                ))
            })
            .await?;

        let link = listing_link(listing_id);
        self.notifier
            .notify(
                &seller_id,
                NoticeKind::OfferReceived,
                "New offer received",
                &format!(
                    "{} offered {} for \"{}\".",
                    bid.bidder_name, bid.amount, title
                ),
                &link,
            )
            .await;
        if let Some(prev) = outbid {
            self.notifier
                .notify(
                    prev.notify_key(),
                    NoticeKind::Outbid,
                    "You have been outbid",
                    &format!("A higher offer of {} was placed on \"{}\".", bid.amount, title),
                    &link,
                )
                .await;
        }

        Ok(bid)
    }

    /// Accept one pending offer: the target becomes `accepted`, every other
    /// pending offer becomes `rejected`, and the listing is sold at the
    /// accepted amount, all in one commit.
    pub async fn accept_bid(
        &self,
        listing_id: Ulid,
        actor: &Actor,
        bid_id: Ulid,
    ) -> Result<Bid, EngineError> {
        let clock = self.clock.clone();
        let (accepted, title) =
            with_listing_transaction(self.listings.as_ref(), listing_id, |listing| {
                authorize_decision(listing, actor)?;
                let target = listing.bid(bid_id).ok_or(EngineError::BidNotFound)?;
                if !target.is_pending() {
                    return Err(EngineError::InvalidState(
                        "This offer has already been decided.".to_string(),
                    ));
                }

                let mut accepted = target.clone();
                accepted.status = BidStatus::Accepted;

                let mut next = listing.clone();
                for b in next.bids.iter_mut() {
                    if b.id == bid_id {
                        b.status = BidStatus::Accepted;
                    } else if b.is_pending() {
                        b.status = BidStatus::Rejected;
                    }
                }
                next.accepted_bid_id = Some(bid_id);
                next.price = accepted.amount;
                next.status = ListingStatus::Sold;
                next.sold_at = Some(clock.now_ms());

                Ok((next, (accepted, listing.title.clone())))
            })
            .await?;

        self.notifier
            .notify(
                accepted.bidder.notify_key(),
                NoticeKind::OfferAccepted,
                "Your offer was accepted",
                &format!(
                    "Your offer of {} for \"{}\" was accepted.",
                    accepted.amount, title
                ),
                &listing_link(listing_id),
            )
            .await;

        Ok(accepted)
    }

    /// Reject a single pending offer, leaving every other bid untouched.
    pub async fn reject_bid(
        &self,
        listing_id: Ulid,
        actor: &Actor,
        bid_id: Ulid,
    ) -> Result<Bid, EngineError> {
        let (rejected, title) =
            with_listing_transaction(self.listings.as_ref(), listing_id, |listing| {
                authorize_decision(listing, actor)?;
                let target = listing.bid(bid_id).ok_or(EngineError::BidNotFound)?;
                if !target.is_pending() {
                    return Err(EngineError::InvalidState(
                        "This offer has already been decided.".to_string(),
                    ));
                }

                let mut rejected = target.clone();
                rejected.status = BidStatus::Rejected;

                let mut next = listing.clone();
                if let Some(b) = next.bid_mut(bid_id) {
                    b.status = BidStatus::Rejected;
                }

                Ok((next, (rejected, listing.title.clone())))
            })
            .await?;

        self.notifier
            .notify(
                rejected.bidder.notify_key(),
                NoticeKind::OfferRejected,
                "Your offer was declined",
                &format!(
                    "Your offer of {} for \"{}\" was declined.",
                    rejected.amount, title
                ),
                &listing_link(listing_id),
            )
            .await;

        Ok(rejected)
    }

    /// Archive every pending and rejected offer on the listing. Seller only;
    /// staff override is deliberately not honored for this bulk operation.
    /// Accepted bids are left untouched. Returns how many offers were
    /// archived.
    pub async fn reset_offers(&self, listing_id: Ulid, actor: &Actor) -> Result<usize, EngineError> {
        let (cancelled, archived, title) =
            with_listing_transaction(self.listings.as_ref(), listing_id, |listing| {
                if !actor.bidder.is_account(&listing.seller_id) {
                    return Err(EngineError::Unauthorized(
                        "Only the seller can reset offers on this listing.".to_string(),
                    ));
                }

                let cancelled: Vec<BidderId> = listing
                    .bids
                    .iter()
                    .filter(|b| b.is_pending())
                    .map(|b| b.bidder.clone())
                    .collect();

                let mut archived = 0usize;
                let mut next = listing.clone();
                for b in next.bids.iter_mut() {
                    if matches!(b.status, BidStatus::Pending | BidStatus::Rejected) {
                        b.status = BidStatus::Archived;
                        archived += 1;
                    }
                }

                Ok((next, (cancelled, archived, listing.title.clone())))
            })
            .await?;

        let link = listing_link(listing_id);
        for bidder in &cancelled {
            self.notifier
                .notify(
                    bidder.notify_key(),
                    NoticeKind::OfferCancelled,
                    "Your offer was cancelled",
                    &format!("The seller reset all offers on \"{}\".", title),
                    &link,
                )
                .await;
        }

        Ok(archived)
    }

    /// The seller's active listings that hold at least one pending offer.
    /// Convenience projection off the eventually-consistent read path.
    pub async fn listings_with_pending(&self, seller_id: &str) -> Result<Vec<Listing>, EngineError> {
        let listings = self.listings.listings_by_seller(seller_id).await?;
        Ok(listings
            .into_iter()
            .filter(|l| {
                l.bidding_enabled && l.status == ListingStatus::Available && l.has_pending_bids()
            })
            .collect())
    }
}
