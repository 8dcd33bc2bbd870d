//! Guest verification: one-time, time-bound email codes gating guest offers.

use std::sync::Arc;

use crate::{
    constants::CODE_TTL,
    errors::EngineError,
    models::verification::VerificationChallenge,
    store::ChallengeStore,
    traits::{Mailer, RandomSource, TimeProvider},
    utils,
};

use super::Actor;

#[derive(Clone)]
pub struct VerificationService {
    challenges: Arc<dyn ChallengeStore>,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn TimeProvider>,
    random: Arc<dyn RandomSource>,
}

impl VerificationService {
    pub fn new(
        challenges: Arc<dyn ChallengeStore>,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn TimeProvider>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            challenges,
            mailer,
            clock,
            random,
        }
    }

    /// Issue a fresh challenge for `email`, replacing any prior one, and hand
    /// the code to the delivery collaborator. If delivery fails the challenge
    /// is withdrawn so no usable, undelivered code remains.
    pub async fn request_code(&self, email: &str) -> Result<(), EngineError> {
        let email = utils::normalize_email(email);
        let code = format!("{:05}", self.random.next_u32() % 100_000);
        let challenge = VerificationChallenge {
            email: email.clone(),
            code: code.clone(),
            expires_at: self.clock.now_ms() + CODE_TTL.num_milliseconds() as u64,
            used: false,
        };
        self.challenges.put(&challenge).await?;

        let body = format!(
            "Your verification code is {}. It expires in {} minutes.",
            code,
            CODE_TTL.num_minutes()
        );
        if let Err(e) = self
            .mailer
            .send(&email, "Your offer verification code", &body)
            .await
        {
            self.challenges.remove(&email).await?;
            return Err(EngineError::EmailServiceUnavailable(e));
        }

        Ok(())
    }

    /// Consume the active challenge for `email`. Succeeds at most once per
    /// challenge; a repeat submission after success is an error, not a no-op.
    pub async fn submit_code(&self, email: &str, code: &str) -> Result<(), EngineError> {
        let email = utils::normalize_email(email);
        let mut challenge = self
            .challenges
            .get(&email)
            .await?
            .ok_or(EngineError::ChallengeNotFound)?;

        if challenge.used {
            return Err(EngineError::ChallengeAlreadyUsed);
        }
        if self.clock.now_ms() > challenge.expires_at {
            return Err(EngineError::ChallengeExpired);
        }
        if challenge.code != code.trim() {
            return Err(EngineError::CodeMismatch);
        }

        challenge.used = true;
        self.challenges.put(&challenge).await?;

        Ok(())
    }

    /// Gate for the guest bid path: consume the challenge and produce the
    /// guest actor. A challenge that was already consumed cannot authorize
    /// another action, so the guest is told to verify again.
    pub async fn authorize_guest(&self, email: &str, code: &str) -> Result<Actor, EngineError> {
        match self.submit_code(email, code).await {
            Ok(()) => Ok(Actor::guest(email)),
            Err(EngineError::ChallengeAlreadyUsed) => Err(EngineError::VerificationRequired),
            Err(e) => Err(e),
        }
    }
}
