//! Outbound notices to staff and customers.
//!
//! Mail delivery is not wired up; `LogNotifier` records every notice as a
//! structured log event so staff tooling can pick it up.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    users::User,
    verification::model::{VerificationStatus, VerificationSubmission},
};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// A student sent documents and is waiting for review.
    async fn verification_requested(
        &self,
        user: &User,
        submission: &VerificationSubmission,
    ) -> anyhow::Result<()>;

    async fn verification_decided(&self, user: &User, status: VerificationStatus) -> anyhow::Result<()>;

    async fn recovery_code(&self, email: &str, code: &str, ttl_minutes: i64) -> anyhow::Result<()>;
}

pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn verification_requested(
        &self,
        user: &User,
        submission: &VerificationSubmission,
    ) -> anyhow::Result<()> {
        info!(
            target: "imperius::notify",
            user_id = %user.id,
            email = %user.email,
            name = %format!("{} {}", user.name, user.last_name),
            kind = %submission.kind,
            documents = submission.documents.len(),
            "student verification requested"
        );
        Ok(())
    }

    async fn verification_decided(&self, user: &User, status: VerificationStatus) -> anyhow::Result<()> {
        info!(
            target: "imperius::notify",
            user_id = %user.id,
            email = %user.email,
            %status,
            "student verification decided"
        );
        Ok(())
    }

    async fn recovery_code(&self, email: &str, code: &str, ttl_minutes: i64) -> anyhow::Result<()> {
        info!(
            target: "imperius::notify",
            %email,
            ttl_minutes,
            "password recovery code issued"
        );
        // Secret. Readable only with debug logging on, until a mail transport exists.
        debug!(target: "imperius::notify", %email, %code, "password recovery code");
        Ok(())
    }
}


#[cfg(test)]
pub use recording::{Notice, RecordingNotifier};
