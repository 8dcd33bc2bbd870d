//! In-memory backend. Same conditional-write contract as the DynamoDB store,
//! used by the test suite and usable as a single-process backend.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use ulid::Ulid;

use crate::{
    errors::StoreError,
    models::{listing::Listing, verification::VerificationChallenge},
};

use super::{ChallengeStore, ListingStore};

#[derive(Debug, Default)]
pub struct MemoryStore {
    listings: Mutex<HashMap<Ulid, Listing>>,
    challenges: Mutex<HashMap<String, VerificationChallenge>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn listings(&self) -> MutexGuard<'_, HashMap<Ulid, Listing>> {
        self.listings.lock().expect("listing map poisoned")
    }

    fn challenges(&self) -> MutexGuard<'_, HashMap<String, VerificationChallenge>> {
        self.challenges.lock().expect("challenge map poisoned")
    }
}

#[async_trait]
impl ListingStore for MemoryStore {
    async fn load(&self, listing_id: Ulid) -> Result<Option<Listing>, StoreError> {
        Ok(self.listings().get(&listing_id).cloned())
    }

    async fn store(&self, listing: &Listing, expected_version: u64) -> Result<bool, StoreError> {
        let mut map = self.listings();
        match map.get(&listing.id) {
            Some(current) if current.version == expected_version => {
                map.insert(listing.id, listing.clone());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert(&self, listing: &Listing) -> Result<(), StoreError> {
        self.listings().insert(listing.id, listing.clone());
        Ok(())
    }

    async fn listings_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>, StoreError> {
        let mut out: Vec<Listing> = self
            .listings()
            .values()
            .filter(|l| l.seller_id == seller_id)
            .cloned()
            .collect();
        out.sort_by_key(|l| l.id);
        Ok(out)
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn get(&self, email: &str) -> Result<Option<VerificationChallenge>, StoreError> {
        Ok(self.challenges().get(email).cloned())
    }

    async fn put(&self, challenge: &VerificationChallenge) -> Result<(), StoreError> {
        self.challenges()
            .insert(challenge.email.clone(), challenge.clone());
        Ok(())
    }

    async fn remove(&self, email: &str) -> Result<(), StoreError> {
        self.challenges().remove(email);
        Ok(())
    }
}
