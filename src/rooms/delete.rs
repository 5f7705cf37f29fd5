use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    auth::{require_owner, AuthUser},
    base_context,
    models::User,
    session, AppError, AppResult, AppState,
};

// Rooms are gated on their host, messages on their author; both share the
// confirmation template.

#[debug_handler]
pub(crate) async fn delete_room_page(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let room = state
        .store
        .room(&id.to_string())
        .await?
        .ok_or(AppError::not_found("room"))?;
    require_owner(room.host_id.as_deref(), &user)?;

    confirm_page(&state, &session, &user, &room.name).await
}

#[debug_handler]
pub(crate) async fn delete_room(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    let room = state
        .store
        .room(&id.to_string())
        .await?
        .ok_or(AppError::not_found("room"))?;
    require_owner(room.host_id.as_deref(), &user)?;

    state.store.delete_room(&room.id).await?;
    tracing::info!(room = %room.name, host = %user.username, "room deleted");
    Ok(Redirect::to("/"))
}

#[debug_handler]
pub(crate) async fn delete_message_page(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let message = state
        .store
        .message(&id.to_string())
        .await?
        .ok_or(AppError::not_found("message"))?;
    require_owner(Some(&message.user_id), &user)?;

    confirm_page(&state, &session, &user, &message.body).await
}

#[debug_handler]
pub(crate) async fn delete_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Redirect> {
    let message = state
        .store
        .message(&id.to_string())
        .await?
        .ok_or(AppError::not_found("message"))?;
    require_owner(Some(&message.user_id), &user)?;

    state.store.delete_message(&message.id).await?;
    Ok(Redirect::to("/"))
}

async fn confirm_page(
    state: &AppState,
    session: &Session,
    user: &User,
    obj: &str,
) -> AppResult<Response> {
    let flashes = session::take_flashes(session).await?;
    let mut context = base_context(Some(user), &flashes);
    context.insert("obj", obj);
    Ok(state.render("delete.html", &context)?.into_response())
}
