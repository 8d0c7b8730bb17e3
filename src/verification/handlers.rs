use std::convert::Infallible;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive},
        Sse,
    },
    routing::get,
    Json, Router,
};
use futures::{future, stream, Stream, StreamExt};
use tracing::{instrument, warn};

use super::{
    events::VerificationEvent,
    model::{StudentVerification, VerificationKind},
    services::{self, UploadItem},
};
use crate::{
    auth::extractors::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    users::PublicUser,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/verification", get(status).post(submit))
        .route("/verification/events", get(events))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

/// POST /verification (multipart)
/// Fields: `kind` and one or more `files` / `files[]`.
#[instrument(skip(state, mp))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<PublicUser>)> {
    let mut kind: Option<VerificationKind> = None;
    let mut files = Vec::new();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("kind") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(e.to_string()))?;
                kind = Some(text.parse()?);
            }
            Some("files") | Some("files[]") => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(e.to_string()))?;
                files.push(UploadItem {
                    file_name,
                    content_type,
                    body,
                });
            }
            _ => {}
        }
    }
    let kind = kind.ok_or_else(|| AppError::bad_request("kind is required"))?;

    let user = services::submit(&state, user_id, kind, files).await?;
    Ok((StatusCode::ACCEPTED, Json(user)))
}

#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<StudentVerification>> {
    let user = state.users.get(user_id).await?;
    Ok(Json(user.verification))
}

fn to_sse(ev: &VerificationEvent) -> Event {
    let json = serde_json::to_string(ev).unwrap_or_else(|e| {
        warn!(error = %e, "verification event encode failed");
        String::from("{}")
    });
    Event::default().event("verification").data(json)
}

/// Streams the caller's verification changes, starting with the current status.
#[instrument(skip(state))]
pub async fn events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    // subscribe before reading so nothing falls between the two
    let live = state.verification_events.stream_for(user_id);
    let user = state.users.get(user_id).await?;
    let current = VerificationEvent::of(&user);
    let seen = current.version;

    let sse = stream::once(async move { current })
        .chain(live.filter(move |ev| future::ready(ev.version > seen)))
        .map(|ev| Ok(to_sse(&ev)));
    Ok(Sse::new(sse).keep_alive(KeepAlive::default()))
}
