use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{auth::MaybeUser, base_context, session, AppError, AppResult, AppState};

/// Public profile: the user's hosted rooms and their messages.
#[debug_handler]
pub(crate) async fn profile(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let id = id.to_string();
    let user = state
        .store
        .user(&id)
        .await?
        .ok_or(AppError::not_found("user"))?;
    let rooms = state.store.rooms_by_host(&id).await?;
    let room_messages = state.store.messages_by_user(&id).await?;
    let topics = state.store.all_topics().await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(viewer.as_ref(), &flashes);
    context.insert("user", &user);
    context.insert("rooms", &rooms);
    context.insert("room_count", &rooms.len());
    context.insert("room_messages", &room_messages);
    context.insert("topics", &topics);
    Ok(state.render("profile.html", &context)?.into_response())
}
