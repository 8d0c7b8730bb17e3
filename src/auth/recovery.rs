//! One-time codes for password recovery.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use super::password::{generate_recovery_code, hash_password, verify_password};
use crate::{
    error::{AppError, AppResult},
    store::{keys, Blobs, Collection},
};

const MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoveryCode {
    pub email: String,
    pub code_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    #[serde(default)]
    pub attempts: u32,
}

#[derive(Clone)]
pub struct RecoveryCodes {
    blobs: Blobs,
    ttl: Duration,
}

impl RecoveryCodes {
    pub fn new(blobs: Blobs, ttl_minutes: i64) -> Self {
        Self {
            blobs,
            ttl: Duration::minutes(ttl_minutes.max(1)),
        }
    }

    fn codes(&self) -> Collection<RecoveryCode> {
        self.blobs.collection(keys::RECOVERY_CODES)
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl.whole_minutes()
    }

    /// Issues a fresh code for `email`, replacing any earlier one. Returns the
    /// plain code; only its hash is stored.
    pub async fn issue(&self, email: &str, now: OffsetDateTime) -> AppResult<String> {
        let code = generate_recovery_code();
        let code_hash = hash_password(&code)?;
        let email = email.to_lowercase();
        let expires_at = now + self.ttl;
        self.codes()
            .modify(|codes| {
                codes.retain(|c| c.email != email && c.expires_at > now);
                codes.push(RecoveryCode {
                    email,
                    code_hash,
                    expires_at,
                    attempts: 0,
                });
                Ok(())
            })
            .await?;
        Ok(code)
    }

    /// Checks and consumes the code. A code is burned after too many wrong
    /// guesses.
    pub async fn consume(&self, email: &str, code: &str, now: OffsetDateTime) -> AppResult<()> {
        let email = email.to_lowercase();
        let outcome = self
            .codes()
            .modify(|codes| {
                codes.retain(|c| c.expires_at > now);
                let Some(idx) = codes.iter().position(|c| c.email == email) else {
                    return Ok(false);
                };
                let matches = codes
                    .get(idx)
                    .map(|c| verify_password(code, &c.code_hash))
                    .transpose()?
                    .unwrap_or(false);
                if matches {
                    codes.remove(idx);
                    return Ok(true);
                }
                if let Some(entry) = codes.get_mut(idx) {
                    entry.attempts += 1;
                    if entry.attempts >= MAX_ATTEMPTS {
                        codes.remove(idx);
                    }
                }
                Ok(false)
            })
            .await?;

        if outcome {
            Ok(())
        } else {
            Err(AppError::bad_request("Invalid or expired verification code"))
        }
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.codes().clear().await
    }
}
