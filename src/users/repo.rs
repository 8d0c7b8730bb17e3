use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{NewUser, PublicUser, User, UserStats};
use crate::{
    auth::password::verify_password,
    error::{AppError, AppResult},
    store::{keys, Blobs, Collection},
    verification::model::StudentVerification,
};

/// Access to the `users` blob.
#[derive(Clone)]
pub struct UserStore {
    blobs: Blobs,
}

impl UserStore {
    pub fn new(blobs: Blobs) -> Self {
        Self { blobs }
    }

    fn users(&self) -> Collection<User> {
        self.blobs.collection(keys::USERS)
    }

    /// Inserts a user after checking email (case-insensitive) and document
    /// number uniqueness under the collection lock.
    pub async fn register(&self, new: NewUser) -> AppResult<User> {
        let user = self
            .users()
            .modify(|users| {
                if users.iter().any(|u| u.email.eq_ignore_ascii_case(&new.email)) {
                    return Err(AppError::Conflict("Email already registered".into()));
                }
                if users.iter().any(|u| u.document_number == new.document_number) {
                    return Err(AppError::Conflict(
                        "Document number already registered".into(),
                    ));
                }
                let user = User {
                    id: Uuid::new_v4(),
                    name: new.name,
                    last_name: new.last_name,
                    document_type: new.document_type,
                    document_number: new.document_number,
                    email: new.email,
                    password_hash: new.password_hash,
                    created_at: OffsetDateTime::now_utc(),
                    verification: StudentVerification::Unverified,
                    verification_version: 0,
                };
                users.push(user.clone());
                Ok(user)
            })
            .await?;
        info!(user_id = %user.id, email = %user.email, "user stored");
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users().load().await?;
        Ok(users.into_iter().find(|u| u.email.eq_ignore_ascii_case(email)))
    }

    pub async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users().load().await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    pub async fn get(&self, id: Uuid) -> AppResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    pub async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Returns the user when the email exists and the password matches.
    pub async fn validate_login(&self, email: &str, password: &str) -> anyhow::Result<Option<User>> {
        let Some(user) = self.find_by_email(email).await? else {
            return Ok(None);
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user))
        } else {
            warn!(user_id = %user.id, "password mismatch");
            Ok(None)
        }
    }

    /// Applies `f` to one user inside the collection lock.
    pub async fn update<R, F>(&self, id: Uuid, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut User) -> AppResult<R>,
    {
        self.update_and(id, f, |_| {}).await
    }

    /// `update`, with `committed` run after the write and before the lock is
    /// released.
    pub async fn update_and<R, F, C>(&self, id: Uuid, f: F, committed: C) -> AppResult<R>
    where
        F: FnOnce(&mut User) -> AppResult<R>,
        C: FnOnce(&R),
    {
        self.users()
            .modify_and(
                |users| {
                    let user = users
                        .iter_mut()
                        .find(|u| u.id == id)
                        .ok_or_else(|| AppError::not_found("User not found"))?;
                    f(user)
                },
                committed,
            )
            .await
    }

    pub async fn set_password_hash(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        self.update(id, |u| {
            u.password_hash = password_hash;
            Ok(())
        })
        .await
    }

    pub async fn stats(&self) -> anyhow::Result<UserStats> {
        let users = self.users().load().await?;
        let students = users.iter().filter(|u| u.verification.is_student()).count();
        let pending = users.iter().filter(|u| u.verification.is_pending()).count();
        Ok(UserStats {
            total_users: users.len(),
            students,
            pending_verifications: pending,
            regular_users: users.len() - students - pending,
        })
    }

    pub async fn export(&self) -> anyhow::Result<Vec<PublicUser>> {
        let users = self.users().load().await?;
        Ok(users.iter().map(User::to_public).collect())
    }

    /// Puts every user back to unverified. `committed` sees the users that
    /// changed while the collection is still locked. Returns the dropped
    /// submissions' document keys so the caller can delete the files.
    pub async fn reset_verifications<C>(&self, committed: C) -> AppResult<Vec<String>>
    where
        C: FnOnce(&[User]),
    {
        let (keys, _) = self
            .users()
            .modify_and(
                |users| {
                    let mut keys = Vec::new();
                    let mut changed = Vec::new();
                    for user in users.iter_mut() {
                        if matches!(user.verification, StudentVerification::Unverified) {
                            continue;
                        }
                        match std::mem::take(&mut user.verification) {
                            StudentVerification::Pending { submission }
                            | StudentVerification::Approved {
                                submission: Some(submission),
                                ..
                            } => keys.extend(submission.documents.into_iter().map(|d| d.key)),
                            _ => {}
                        }
                        user.verification_version += 1;
                        changed.push(user.clone());
                    }
                    Ok((keys, changed))
                },
                |(_, changed)| committed(changed),
            )
            .await?;
        Ok(keys)
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.users().clear().await
    }
}
