use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    Extension,
};
use ulid::Ulid;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{
    engine::Actor,
    errors::{EngineError, HandlerError},
    models::{
        auth::ClaimOwned,
        bid::{Bid, PlaceBidPayload},
        listing::Listing,
        PlainSuccessResponse,
    },
    state::AppState,
};

/// Routes open to guests; wired behind the soft auth layer.
pub fn public_router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(get_listing))
        .routes(routes!(place_bid))
}

/// Seller/staff routes; wired behind the required auth layer.
pub fn seller_router() -> OpenApiRouter<Arc<AppState>> {
    OpenApiRouter::new()
        .routes(routes!(pending_offers))
        .routes(routes!(accept_bid))
        .routes(routes!(reject_bid))
        .routes(routes!(reset_offers))
}

/// Get a listing with its offers.
#[utoipa::path(
    get,
    path = "/{listingId}",
    tag = "Offers",
    params(
        ("listingId" = String, Path, description = "Listing to fetch", format = Ulid),
    ),
    responses(
        (status = OK, description = "Returns the listing", body = Listing),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn get_listing(
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<Json<Listing>, HandlerError> {
    let listing = state.engine.listing(listing_id).await?;

    Ok(Json(listing))
}

/// Place an offer against a listing. Authenticated callers bid under their
/// account; guests must carry a fresh verification code for their email.
#[utoipa::path(
    post,
    path = "/{listingId}/bids",
    tag = "Offers",
    params(
        ("listingId" = String, Path, description = "Listing to bid on", format = Ulid),
    ),
    request_body = PlaceBidPayload,
    responses(
        (status = OK, description = "Offer placed", body = Bid),
        (status = BAD_REQUEST, description = "Offer refused", body = HandlerError),
        (status = UNAUTHORIZED, description = "Guest verification required", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
)]
async fn place_bid(
    claim: Option<Extension<ClaimOwned>>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
    Json(payload): Json<PlaceBidPayload>,
) -> Result<Json<Bid>, HandlerError> {
    let actor = match claim {
        Some(Extension(claim)) => Actor::registered(claim.as_claim()),
        None => {
            let (email, code) = match (&payload.guest_email, &payload.guest_code) {
                (Some(email), Some(code)) => (email.as_str(), code.as_str()),
                _ => return Err(EngineError::VerificationRequired.into()),
            };
            state.verification.authorize_guest(email, code).await?
        }
    };

    let bid = state
        .engine
        .place_bid(listing_id, payload.amount, &actor, payload.payment_token)
        .await?;

    Ok(Json(bid))
}

/// Accept one pending offer; every other pending offer is rejected and the
/// listing is sold at the accepted amount.
#[utoipa::path(
    post,
    path = "/{listingId}/bids/{bidId}/accept",
    tag = "Offers",
    params(
        ("listingId" = String, Path, description = "Listing the offer belongs to", format = Ulid),
        ("bidId" = String, Path, description = "Offer to accept", format = Ulid),
    ),
    responses(
        (status = OK, description = "Offer accepted", body = PlainSuccessResponse),
        (status = BAD_REQUEST, description = "Offer already decided", body = HandlerError),
        (status = FORBIDDEN, description = "Not the seller or staff", body = HandlerError),
        (status = NOT_FOUND, description = "Listing or offer not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn accept_bid(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path((listing_id, bid_id)): Path<(Ulid, Ulid)>,
) -> Result<PlainSuccessResponse, HandlerError> {
    let actor = Actor::registered(claim.as_claim());
    let accepted = state.engine.accept_bid(listing_id, &actor, bid_id).await?;

    Ok(PlainSuccessResponse::ok(format!(
        "Offer of {} accepted. The listing is now sold.",
        accepted.amount
    )))
}

/// Decline a single pending offer, leaving the rest untouched.
#[utoipa::path(
    post,
    path = "/{listingId}/bids/{bidId}/reject",
    tag = "Offers",
    params(
        ("listingId" = String, Path, description = "Listing the offer belongs to", format = Ulid),
        ("bidId" = String, Path, description = "Offer to decline", format = Ulid),
    ),
    responses(
        (status = OK, description = "Offer declined", body = PlainSuccessResponse),
        (status = BAD_REQUEST, description = "Offer already decided", body = HandlerError),
        (status = FORBIDDEN, description = "Not the seller or staff", body = HandlerError),
        (status = NOT_FOUND, description = "Listing or offer not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn reject_bid(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path((listing_id, bid_id)): Path<(Ulid, Ulid)>,
) -> Result<PlainSuccessResponse, HandlerError> {
    let actor = Actor::registered(claim.as_claim());
    state.engine.reject_bid(listing_id, &actor, bid_id).await?;

    Ok(PlainSuccessResponse::ok("Offer declined."))
}

/// Archive every open offer on the listing. Strictly the seller's own call.
#[utoipa::path(
    post,
    path = "/{listingId}/bids/reset",
    tag = "Offers",
    params(
        ("listingId" = String, Path, description = "Listing to reset", format = Ulid),
    ),
    responses(
        (status = OK, description = "Offers archived", body = PlainSuccessResponse),
        (status = FORBIDDEN, description = "Not the seller", body = HandlerError),
        (status = NOT_FOUND, description = "Listing not found", body = HandlerError),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn reset_offers(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
    Path(listing_id): Path<Ulid>,
) -> Result<PlainSuccessResponse, HandlerError> {
    let actor = Actor::registered(claim.as_claim());
    let archived = state.engine.reset_offers(listing_id, &actor).await?;

    Ok(PlainSuccessResponse::ok(format!(
        "{} offers archived.",
        archived
    )))
}

/// The caller's active listings holding at least one pending offer.
#[utoipa::path(
    get,
    path = "/pending-offers",
    tag = "Offers",
    responses(
        (status = OK, description = "Listings with pending offers", body = Vec<Listing>),
        (status = INTERNAL_SERVER_ERROR, description = "Handler errors", body = HandlerError),
    ),
    security(
        ("http-jwt" = []),
    ),
)]
async fn pending_offers(
    Extension(claim): Extension<ClaimOwned>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Listing>>, HandlerError> {
    let listings = state.engine.listings_with_pending(&claim.id).await?;

    Ok(Json(listings))
}
