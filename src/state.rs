use std::{env, sync::Arc};

use aws_config::{BehaviorVersion, Region};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use lambda_http::Error;

use crate::{
    engine::{BidEngine, VerificationService},
    store::DynamoStore,
    traits::{OsRandom, SystemTime, TracingMailer, TracingNotifier},
};

pub struct AppState {
    pub engine: BidEngine,
    pub verification: VerificationService,
    pub jwt: (EncodingKey, DecodingKey, Header),
}

impl AppState {
    pub async fn new() -> Result<Self, Error> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .load()
            .await;
        let secret = env::var("JWT_SECRET").map_err(|e| e.to_string())?;

        let store = Arc::new(DynamoStore::new(&config));
        let clock = Arc::new(SystemTime::new());

        Ok(Self {
            engine: BidEngine::new(
                store.clone(),
                Arc::new(TracingNotifier::new()),
                clock.clone(),
            ),
            verification: VerificationService::new(
                store,
                Arc::new(TracingMailer::new()),
                clock,
                Arc::new(OsRandom::new()),
            ),
            jwt: (
                EncodingKey::from_base64_secret(&secret)?,
                DecodingKey::from_base64_secret(&secret)?,
                Header::new(Algorithm::HS256),
            ),
        })
    }
}
