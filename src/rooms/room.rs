use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    auth::{AuthUser, MaybeUser},
    base_context, session, AppError, AppResult, AppState,
};

#[debug_handler]
pub(crate) async fn room(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let id = id.to_string();
    let room = state
        .store
        .room_listing(&id)
        .await?
        .ok_or(AppError::not_found("room"))?;
    let room_messages = state.store.messages_in(&id).await?;
    let participants = state.store.participants(&id).await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(user.as_ref(), &flashes);
    context.insert("room", &room);
    context.insert("room_messages", &room_messages);
    context.insert("participants", &participants);
    Ok(state.render("room.html", &context)?.into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageForm {
    #[serde(default)]
    body: String,
}

/// Posting redirects back to the same room so a browser refresh never
/// re-submits the message.
#[debug_handler]
pub(crate) async fn post_message(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Form(MessageForm { body }): Form<MessageForm>,
) -> AppResult<Redirect> {
    let id = id.to_string();
    let room = state
        .store
        .room(&id)
        .await?
        .ok_or(AppError::not_found("room"))?;

    let body = body.trim();
    if body.is_empty() {
        session::flash(&session, "Message cannot be empty.").await?;
        return Ok(Redirect::to(&format!("/room/{}/", room.id)));
    }

    state.store.post_message(&user.id, &room.id, body).await?;
    Ok(Redirect::to(&format!("/room/{}/", room.id)))
}
