//! Notification dispatcher seam. Delivery is best-effort and happens strictly
//! after a listing commit; a failed dispatch never reverts the operation.

use core::fmt;

use async_trait::async_trait;
use lambda_http::tracing;

/// What happened, from the recipient's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    OfferReceived,
    Outbid,
    OfferAccepted,
    OfferRejected,
    OfferCancelled,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let out = match *self {
            NoticeKind::OfferReceived => "offer-received",
            NoticeKind::Outbid => "outbid",
            NoticeKind::OfferAccepted => "offer-accepted",
            NoticeKind::OfferRejected => "offer-rejected",
            NoticeKind::OfferCancelled => "offer-cancelled",
        };
        write!(f, "{}", out)
    }
}

/// Fire-and-forget notice delivery to a user or guest pseudo-identity.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, kind: NoticeKind, title: &str, body: &str, link: &str);
}

/// Default wiring: the dispatch is traced; the external dispatcher consumes
/// the same structured fields downstream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, user_id: &str, kind: NoticeKind, title: &str, body: &str, link: &str) {
        tracing::info!(
            target: "notify",
            "{} -> {}: {} ({}) [{}]",
            kind,
            user_id,
            title,
            body,
            link
        );
    }
}

impl TracingNotifier {
    pub const fn new() -> Self {
        Self
    }
}
