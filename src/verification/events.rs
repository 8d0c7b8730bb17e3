use futures::Stream;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};
use uuid::Uuid;

use super::model::VerificationStatus;
use crate::users::User;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VerificationEvent {
    pub user_id: Uuid,
    pub status: VerificationStatus,
    /// The user's `verification_version` at the change; higher is newer.
    pub version: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

impl VerificationEvent {
    pub fn of(user: &User) -> Self {
        Self {
            user_id: user.id,
            status: user.verification.status(),
            version: user.verification_version,
            at: OffsetDateTime::now_utc(),
        }
    }
}

/// Fan-out of verification status changes to every open client.
#[derive(Clone)]
pub struct VerificationEvents {
    tx: broadcast::Sender<VerificationEvent>,
}

impl VerificationEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: VerificationEvent) {
        match self.tx.send(event) {
            Ok(n) => debug!(subscribers = n, "verification event published"),
            // nobody listening
            Err(_) => debug!("verification event dropped, no subscribers"),
        }
    }

    /// Events for one user. Lagging receivers skip what they missed.
    pub fn stream_for(&self, user_id: Uuid) -> impl Stream<Item = VerificationEvent> + Send + 'static {
        let rx = self.tx.subscribe();
        futures::stream::unfold(rx, move |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(ev) if ev.user_id == user_id => return Some((ev, rx)),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%user_id, skipped, "verification subscriber lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }
}

impl Default for VerificationEvents {
    fn default() -> Self {
        Self::new(64)
    }
}
