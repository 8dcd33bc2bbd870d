//! Deterministic stand-ins for the engine's collaborator seams.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::traits::{Mailer, MailerError, NoticeKind, Notifier, RandomSource, TimeProvider};

/// Controllable clock, in unix millis.
#[derive(Debug)]
pub struct MockTime {
    ms: AtomicU64,
}

impl MockTime {
    pub fn new(ms: u64) -> Self {
        Self {
            ms: AtomicU64::new(ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.ms.fetch_add(ms, Ordering::SeqCst);
    }
}

impl TimeProvider for MockTime {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub user_id: String,
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
    pub link: String,
}

/// Captures every dispatched notice for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notice> {
        self.sent.lock().expect("notice log poisoned").clone()
    }

    pub fn of_kind(&self, kind: NoticeKind) -> Vec<Notice> {
        self.all().into_iter().filter(|n| n.kind == kind).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, user_id: &str, kind: NoticeKind, title: &str, body: &str, link: &str) {
        self.sent.lock().expect("notice log poisoned").push(Notice {
            user_id: user_id.to_string(),
            kind,
            title: title.to_string(),
            body: body.to_string(),
            link: link.to_string(),
        });
    }
}

/// Captures outgoing mail; can be flipped into outage mode.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String, String)>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("outbox poisoned").len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailerError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailerError::Unavailable("simulated outage".to_string()));
        }
        self.sent.lock().expect("outbox poisoned").push((
            to.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
        Ok(())
    }
}

/// Counter-backed random source: reproducible, and consecutive draws are
/// guaranteed distinct, so replaced codes never collide.
pub struct SeededRandom(AtomicU64);

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self(AtomicU64::new(seed))
    }
}

impl RandomSource for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let mut v = self.0.fetch_add(1, Ordering::SeqCst);
        for b in dest.iter_mut() {
            *b = v as u8;
            v = v.rotate_right(8);
        }
    }
}
