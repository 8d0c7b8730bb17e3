use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::verification::model::{StudentVerification, VerificationStatus};

/// Identity document types accepted at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentType {
    /// Cédula de ciudadanía
    #[serde(rename = "CC")]
    Cc,
    /// Cédula de extranjería
    #[serde(rename = "CE")]
    Ce,
    /// Tarjeta de identidad
    #[serde(rename = "TI")]
    Ti,
    #[serde(rename = "PAS")]
    Passport,
}

/// Stored user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: String,
    pub password_hash: String, // argon2 PHC string
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub verification: StudentVerification,
    /// Bumped on every verification change; orders the published events.
    #[serde(default)]
    pub verification_version: u64,
}

impl User {
    /// Name shown on reviews: first name, or the local part of the email.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            self.email.split('@').next().unwrap_or_default().to_string()
        } else {
            name.to_string()
        }
    }

    pub fn is_student(&self) -> bool {
        self.verification.is_student()
    }

    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            document_type: self.document_type,
            created_at: self.created_at,
            verification_status: self.verification.status(),
            is_student: self.verification.is_student(),
            verification_pending: self.verification.is_pending(),
            verified_at: self.verification.verified_at(),
        }
    }
}

/// Fields accepted when creating a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub last_name: String,
    pub document_type: DocumentType,
    pub document_number: String,
    pub email: String,
    pub password_hash: String,
}

/// Client-facing projection of a user. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub document_type: DocumentType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub verification_status: VerificationStatus,
    pub is_student: bool,
    pub verification_pending: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub verified_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub total_users: usize,
    pub students: usize,
    pub pending_verifications: usize,
    pub regular_users: usize,
}
