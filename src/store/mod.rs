use async_trait::async_trait;
use ulid::Ulid;

use crate::{
    constants::MAX_COMMIT_ATTEMPTS,
    errors::{EngineError, StoreError},
    models::{listing::Listing, verification::VerificationChallenge},
};

pub mod dynamo;
pub mod memory;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Transactional document store for listing aggregates. Implementations must
/// provide conditional writes keyed on the listing's `version` counter; the
/// optimistic retry loop lives in [`with_listing_transaction`] and is shared
/// by every backend.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn load(&self, listing_id: Ulid) -> Result<Option<Listing>, StoreError>;

    /// Conditional write: applies only while the stored version still equals
    /// `expected_version`. Returns false when a concurrent commit won.
    async fn store(&self, listing: &Listing, expected_version: u64) -> Result<bool, StoreError>;

    /// Insert a fresh listing document. Seam for the external listing manager.
    async fn insert(&self, listing: &Listing) -> Result<(), StoreError>;

    /// All listings owned by a seller. An eventually-consistent read is fine;
    /// this backs projections, not the commit path.
    async fn listings_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>, StoreError>;
}

/// Keyed store of guest verification challenges, one active record per email.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn get(&self, email: &str) -> Result<Option<VerificationChallenge>, StoreError>;
    async fn put(&self, challenge: &VerificationChallenge) -> Result<(), StoreError>;
    async fn remove(&self, email: &str) -> Result<(), StoreError>;
}

/// Run one read-validate-write cycle against a listing, retrying the whole
/// cycle transparently while concurrent commits invalidate the snapshot.
/// `apply` must be pure against its snapshot: no outbound I/O, all effects
/// expressed in the returned document. Callers see either success, a terminal
/// business error from `apply`, or `TransactionFailed` once attempts run out.
pub async fn with_listing_transaction<T, F>(
    store: &dyn ListingStore,
    listing_id: Ulid,
    mut apply: F,
) -> Result<T, EngineError>
where
    F: FnMut(&Listing) -> Result<(Listing, T), EngineError>,
{
    for _ in 0..MAX_COMMIT_ATTEMPTS {
        let current = store
            .load(listing_id)
            .await?
            .ok_or(EngineError::ListingNotFound)?;
        let expected = current.version;
        let (mut next, out) = apply(&current)?;
        next.version = expected + 1;
        if store.store(&next, expected).await? {
            return Ok(out);
        }
    }
    Err(EngineError::TransactionFailed)
}
