use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    events::VerificationEvent,
    model::{VerificationDocument, VerificationKind, VerificationStatus, VerificationSubmission},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    storage::document_key,
    users::{PublicUser, User},
};

const PRESIGN_TTL_SECS: u64 = 30 * 60;

pub struct UploadItem {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
pub struct DocumentLink {
    pub id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub url: String,
}

fn accepted_content_type(ct: &str) -> bool {
    ct.starts_with("image/") || ct == "application/pdf"
}

async fn delete_documents(st: &AppState, keys: impl IntoIterator<Item = String>) {
    for key in keys {
        if let Err(e) = st.documents.delete_object(&key).await {
            warn!(%key, error = %format!("{e:#}"), "document delete failed");
        }
    }
}

fn publish(st: &AppState, user: &User) {
    st.verification_events.publish(VerificationEvent::of(user));
}

async fn notify_decided(st: &AppState, user: &User, status: VerificationStatus) {
    if let Err(e) = st.notifier.verification_decided(user, status).await {
        warn!(user_id = %user.id, error = %format!("{e:#}"), "decision notice failed");
    }
}

/// Uploads the documents and moves the user to pending. A pending
/// submission is replaced, its old files removed.
pub async fn submit(
    st: &AppState,
    user_id: Uuid,
    kind: VerificationKind,
    files: Vec<UploadItem>,
) -> AppResult<PublicUser> {
    if files.is_empty() {
        return Err(AppError::bad_request("At least one document is required"));
    }
    if let Some(bad) = files.iter().find(|f| !accepted_content_type(&f.content_type)) {
        return Err(AppError::bad_request(format!(
            "Unsupported document type '{}' for {}",
            bad.content_type, bad.file_name
        )));
    }
    let current = st.users.get(user_id).await?;
    if current.is_student() {
        return Err(AppError::Conflict("Student verification already approved".into()));
    }

    let mut documents = Vec::with_capacity(files.len());
    for file in files {
        let id = Uuid::new_v4();
        let key = document_key(user_id, id, &file.content_type);
        if let Err(e) = st
            .documents
            .put_object(&key, file.body, &file.content_type)
            .await
            .with_context(|| format!("put_object {key}"))
        {
            delete_documents(st, documents.into_iter().map(|d: VerificationDocument| d.key)).await;
            return Err(e.into());
        }
        documents.push(VerificationDocument {
            id,
            key,
            file_name: file.file_name,
            content_type: file.content_type,
        });
    }
    let uploaded: Vec<String> = documents.iter().map(|d| d.key.clone()).collect();

    let submission = VerificationSubmission {
        kind,
        documents,
        submitted_at: OffsetDateTime::now_utc(),
    };
    let outcome = st
        .users
        .update_and(
            user_id,
            |u| {
                let replaced = u.verification.submit(submission.clone())?;
                u.verification_version += 1;
                Ok((replaced, u.clone()))
            },
            |(_, user)| publish(st, user),
        )
        .await;
    let (replaced, user) = match outcome {
        Ok(v) => v,
        Err(e) => {
            delete_documents(st, uploaded).await;
            return Err(e);
        }
    };
    if let Some(old) = replaced {
        delete_documents(st, old.documents.into_iter().map(|d| d.key)).await;
    }

    info!(%user_id, %kind, documents = submission.documents.len(), "verification submitted");
    if let Err(e) = st.notifier.verification_requested(&user, &submission).await {
        warn!(%user_id, error = %format!("{e:#}"), "verification request notice failed");
    }
    Ok(user.to_public())
}

pub async fn approve(st: &AppState, user_id: Uuid) -> AppResult<PublicUser> {
    let now = OffsetDateTime::now_utc();
    let user = st
        .users
        .update_and(
            user_id,
            |u| {
                u.verification.approve(now)?;
                u.verification_version += 1;
                Ok(u.clone())
            },
            |user| publish(st, user),
        )
        .await?;
    info!(%user_id, "student verification approved");
    notify_decided(st, &user, VerificationStatus::Approved).await;
    Ok(user.to_public())
}

/// Rejects the pending submission and removes its files.
pub async fn reject(st: &AppState, user_id: Uuid, reason: Option<String>) -> AppResult<PublicUser> {
    let now = OffsetDateTime::now_utc();
    let reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    let (dropped, user) = st
        .users
        .update_and(
            user_id,
            |u| {
                let dropped = u.verification.reject(now, reason)?;
                u.verification_version += 1;
                Ok((dropped, u.clone()))
            },
            |(_, user)| publish(st, user),
        )
        .await?;
    delete_documents(st, dropped.documents.into_iter().map(|d| d.key)).await;
    info!(%user_id, "student verification rejected");
    notify_decided(st, &user, VerificationStatus::Rejected).await;
    Ok(user.to_public())
}

/// Presigned links to the documents of a pending submission.
pub async fn documents(st: &AppState, user_id: Uuid) -> AppResult<Vec<DocumentLink>> {
    let user = st.users.get(user_id).await?;
    let submission = user
        .verification
        .pending_submission()
        .ok_or_else(|| AppError::not_found("No pending verification for this user"))?;
    let mut out = Vec::with_capacity(submission.documents.len());
    for doc in &submission.documents {
        let url = st
            .documents
            .presign_get(&doc.key, PRESIGN_TTL_SECS)
            .await
            .with_context(|| format!("presign {}", doc.key))?;
        out.push(DocumentLink {
            id: doc.id,
            file_name: doc.file_name.clone(),
            content_type: doc.content_type.clone(),
            url,
        });
    }
    Ok(out)
}

/// Every user back to unverified, each one announced to its subscribers.
/// Returns how many document files were dropped.
pub async fn reset_all(st: &AppState) -> AppResult<usize> {
    let keys = st
        .users
        .reset_verifications(|changed| changed.iter().for_each(|u| publish(st, u)))
        .await?;
    let dropped = keys.len();
    delete_documents(st, keys).await;
    warn!(documents = dropped, "all student verifications reset");
    Ok(dropped)
}
