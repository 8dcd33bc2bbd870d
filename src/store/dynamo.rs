//! DynamoDB backend. Listings live as whole documents in `LISTING_TABLE`;
//! the optimistic contract is a put conditioned on the stored `version`.

use aws_config::SdkConfig;
use aws_sdk_dynamodb::{types::AttributeValue, Client};
use async_trait::async_trait;
use serde_dynamo::{from_item, from_items, to_item};
use ulid::Ulid;

use crate::{
    constants::{LISTING_TABLE, VERIFICATION_TABLE},
    errors::StoreError,
    models::{listing::Listing, verification::VerificationChallenge},
};

use super::{ChallengeStore, ListingStore};

pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ListingStore for DynamoStore {
    async fn load(&self, listing_id: Ulid) -> Result<Option<Listing>, StoreError> {
        let resp = self
            .client
            .get_item()
            .table_name(LISTING_TABLE)
            .key("id", AttributeValue::S(listing_id.to_string()))
            .consistent_read(true)
            .send()
            .await?;

        match resp.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn store(&self, listing: &Listing, expected_version: u64) -> Result<bool, StoreError> {
        let item = to_item(listing.clone())?;

        let resp = self
            .client
            .put_item()
            .table_name(LISTING_TABLE)
            .set_item(Some(item))
            .condition_expression("version = :expected")
            .expression_attribute_values(
                ":expected",
                AttributeValue::N(expected_version.to_string()),
            )
            .send()
            .await;

        match resp {
            Ok(_) => Ok(true),
            Err(e)
                if matches!(
                    e.as_service_error(),
                    Some(se) if se.is_conditional_check_failed_exception()
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn insert(&self, listing: &Listing) -> Result<(), StoreError> {
        let item = to_item(listing.clone())?;

        self.client
            .put_item()
            .table_name(LISTING_TABLE)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn listings_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>, StoreError> {
        let resp = self
            .client
            .scan()
            .table_name(LISTING_TABLE)
            .filter_expression("sellerId = :sid")
            .expression_attribute_values(":sid", AttributeValue::S(seller_id.to_string()))
            .send()
            .await?;

        Ok(from_items(resp.items().to_vec())?)
    }
}

#[async_trait]
impl ChallengeStore for DynamoStore {
    async fn get(&self, email: &str) -> Result<Option<VerificationChallenge>, StoreError> {
        let resp = self
            .client
            .get_item()
            .table_name(VERIFICATION_TABLE)
            .key("email", AttributeValue::S(email.to_string()))
            .consistent_read(true)
            .send()
            .await?;

        match resp.item {
            Some(item) => Ok(Some(from_item(item)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, challenge: &VerificationChallenge) -> Result<(), StoreError> {
        let item = to_item(challenge.clone())?;

        self.client
            .put_item()
            .table_name(VERIFICATION_TABLE)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(())
    }

    async fn remove(&self, email: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(VERIFICATION_TABLE)
            .key("email", AttributeValue::S(email.to_string()))
            .send()
            .await?;

        Ok(())
    }
}
