use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

/// Proof of enrolment offered by the student.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum VerificationKind {
    /// Student ID card.
    Carnet,
    /// Screenshot of the university portal.
    PortalEdu,
    /// Grade report.
    Boletin,
}

impl FromStr for VerificationKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "carnet" => Ok(Self::Carnet),
            "portal-edu" => Ok(Self::PortalEdu),
            "boletin" => Ok(Self::Boletin),
            other => Err(AppError::bad_request(format!(
                "unknown verification kind '{other}'"
            ))),
        }
    }
}

impl fmt::Display for VerificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Carnet => "carnet",
            Self::PortalEdu => "portal-edu",
            Self::Boletin => "boletin",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationDocument {
    pub id: Uuid,
    pub key: String,
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationSubmission {
    pub kind: VerificationKind,
    pub documents: Vec<VerificationDocument>,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Unverified,
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unverified => "unverified",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        })
    }
}

/// Student verification state stored on the user record.
///
/// ```text
/// Unverified --submit--> Pending --approve--> Approved
///                         |  ^
///                  reject |  | submit
///                         v  |
///                       Rejected
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StudentVerification {
    #[default]
    Unverified,
    Pending {
        submission: VerificationSubmission,
    },
    Approved {
        #[serde(with = "time::serde::rfc3339")]
        verified_at: OffsetDateTime,
        submission: Option<VerificationSubmission>,
    },
    Rejected {
        #[serde(with = "time::serde::rfc3339")]
        rejected_at: OffsetDateTime,
        reason: Option<String>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("student verification already approved")]
    AlreadyApproved,
    #[error("no pending verification (current status: {0})")]
    NotPending(VerificationStatus),
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::Conflict(e.to_string())
    }
}

impl StudentVerification {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Self::Unverified => VerificationStatus::Unverified,
            Self::Pending { .. } => VerificationStatus::Pending,
            Self::Approved { .. } => VerificationStatus::Approved,
            Self::Rejected { .. } => VerificationStatus::Rejected,
        }
    }

    pub fn is_student(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn verified_at(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Approved { verified_at, .. } => Some(*verified_at),
            _ => None,
        }
    }

    pub fn pending_submission(&self) -> Option<&VerificationSubmission> {
        match self {
            Self::Pending { submission } => Some(submission),
            _ => None,
        }
    }

    /// Moves to `Pending`. Returns the submission it replaced, if the user
    /// was already pending.
    pub fn submit(
        &mut self,
        submission: VerificationSubmission,
    ) -> Result<Option<VerificationSubmission>, TransitionError> {
        let previous = match std::mem::take(self) {
            approved @ Self::Approved { .. } => {
                *self = approved;
                return Err(TransitionError::AlreadyApproved);
            }
            Self::Pending { submission } => Some(submission),
            Self::Unverified | Self::Rejected { .. } => None,
        };
        *self = Self::Pending { submission };
        Ok(previous)
    }

    pub fn approve(&mut self, now: OffsetDateTime) -> Result<(), TransitionError> {
        match std::mem::take(self) {
            Self::Pending { submission } => {
                *self = Self::Approved {
                    verified_at: now,
                    submission: Some(submission),
                };
                Ok(())
            }
            other => {
                let status = other.status();
                *self = other;
                Err(TransitionError::NotPending(status))
            }
        }
    }

    /// Moves to `Rejected` and hands back the dropped submission so its
    /// documents can be removed from storage.
    pub fn reject(
        &mut self,
        now: OffsetDateTime,
        reason: Option<String>,
    ) -> Result<VerificationSubmission, TransitionError> {
        match std::mem::take(self) {
            Self::Pending { submission } => {
                *self = Self::Rejected {
                    rejected_at: now,
                    reason,
                };
                Ok(submission)
            }
            other => {
                let status = other.status();
                *self = other;
                Err(TransitionError::NotPending(status))
            }
        }
    }
}
