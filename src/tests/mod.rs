pub(crate) mod support;

use std::sync::Arc;

use axum::{
    body::{Body, HttpBody},
    http::Request,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use lambda_http::Error;
use serde::{de::DeserializeOwned, Serialize};
use ulid::Ulid;

use crate::{
    constants::JWT_AUDIENCE,
    engine::{BidEngine, VerificationService},
    models::{
        auth::{ClaimOwned, Role},
        bid::BidStatus,
        listing::{Listing, ListingStatus},
    },
    state::AppState,
    store::{ListingStore, MemoryStore},
    traits::TimeProvider,
};

use support::{MockTime, RecordingMailer, RecordingNotifier, SeededRandom};

const TEST_JWT_SECRET: &[u8] = b"offer-house-test-secret";

pub(crate) struct TestEnv {
    pub state: Arc<AppState>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<MockTime>,
    pub notices: Arc<RecordingNotifier>,
    pub outbox: Arc<RecordingMailer>,
}

pub(crate) fn test_env() -> TestEnv {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(MockTime::new(1_700_000_000_000));
    let notices = Arc::new(RecordingNotifier::default());
    let outbox = Arc::new(RecordingMailer::default());
    let random = Arc::new(SeededRandom::new(7));

    let state = AppState {
        engine: BidEngine::new(store.clone(), notices.clone(), clock.clone()),
        verification: VerificationService::new(
            store.clone(),
            outbox.clone(),
            clock.clone(),
            random,
        ),
        jwt: (
            EncodingKey::from_secret(TEST_JWT_SECRET),
            DecodingKey::from_secret(TEST_JWT_SECRET),
            Header::new(Algorithm::HS256),
        ),
    };

    TestEnv {
        state: Arc::new(state),
        store,
        clock,
        notices,
        outbox,
    }
}

/// Token exp is checked against the real clock by the JWT layer, so the
/// claim's times come from the system clock, not the mock.
pub(crate) fn mint_token(env: &TestEnv, id: &str, name: &str, role: Role) -> String {
    let now = chrono::Local::now().timestamp() as u64;
    let claim = ClaimOwned {
        id: id.to_string(),
        display_name: name.to_string(),
        email: format!("{}@test.org", id),
        role,
        aud: JWT_AUDIENCE.to_string(),
        exp: now + 3600,
        iat: now,
    };

    jsonwebtoken::encode(&env.state.jwt.2, &claim.as_claim(), &env.state.jwt.0)
        .expect("sign test token")
}

pub(crate) async fn seed_listing(
    env: &TestEnv,
    seller_id: &str,
    title: &str,
    price: u64,
) -> Listing {
    let listing = Listing {
        id: Ulid::new(),
        seller_id: seller_id.to_string(),
        title: title.to_string(),
        price,
        bidding_enabled: true,
        status: ListingStatus::Available,
        bids: Vec::new(),
        accepted_bid_id: None,
        sold_at: None,
        create_at: env.clock.now_ms(),
        version: 0,
    };
    env.store.insert(&listing).await.expect("seed listing");

    listing
}

pub(crate) async fn reload_listing(env: &TestEnv, listing_id: Ulid) -> Listing {
    env.store
        .load(listing_id)
        .await
        .expect("load listing")
        .expect("listing exists")
}

/// Consistency checks that must hold after any mix of operations.
pub(crate) fn assert_listing_consistent(listing: &Listing) {
    let accepted: Vec<_> = listing
        .bids
        .iter()
        .filter(|b| b.status == BidStatus::Accepted)
        .collect();
    assert!(accepted.len() <= 1, "more than one accepted bid");

    let mut ids: Vec<_> = listing.bids.iter().map(|b| b.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), listing.bids.len(), "duplicate bid ids");

    if let Some(bid) = accepted.first() {
        assert_eq!(listing.status, ListingStatus::Sold);
        assert_eq!(listing.accepted_bid_id, Some(bid.id));
        assert_eq!(listing.price, bid.amount);
    }

    for bid in &listing.bids {
        assert!(
            !bid.bidder.is_account(&listing.seller_id),
            "seller bid on own listing"
        );
    }
}

pub(crate) async fn parse_resp<T: DeserializeOwned>(resp: Response<Body>) -> Result<T, Error> {
    let body = resp.into_body();
    let limit = body.size_hint().upper().unwrap_or(u64::MAX) as usize;
    let data = axum::body::to_bytes(body, limit).await?;
    let res: T = serde_json::from_slice(&data)?;

    Ok(res)
}

pub(crate) fn build_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<T>,
) -> Result<Request<Body>, Error> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let req = match body {
        Some(v) => {
            let content = serde_json::to_string(&v)?;
            builder
                .header("Content-Type", "application/json")
                .body(Body::from(content))
        }
        None => builder.body(Body::empty()),
    }?;

    Ok(req)
}
