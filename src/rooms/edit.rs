use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;
use uuid::Uuid;

use crate::{
    auth::{require_owner, AuthUser},
    base_context,
    forms::RoomForm,
    session, AppError, AppResult, AppState,
};

#[debug_handler]
pub(crate) async fn update_room_page(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let room = state
        .store
        .room_listing(&id.to_string())
        .await?
        .ok_or(AppError::not_found("room"))?;
    require_owner(room.host_id.as_deref(), &user)?;

    let topics = state.store.all_topics().await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(Some(&user), &flashes);
    context.insert("room", &room);
    context.insert("topics", &topics);
    Ok(state.render("room_form.html", &context)?.into_response())
}

#[debug_handler]
pub(crate) async fn update_room(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Form(form): Form<RoomForm>,
) -> AppResult<Redirect> {
    let room = state
        .store
        .room(&id.to_string())
        .await?
        .ok_or(AppError::not_found("room"))?;
    require_owner(room.host_id.as_deref(), &user)?;

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            for error in errors {
                session::flash(&session, error).await?;
            }
            // Back to the GET page, which re-renders the topic list intact.
            return Ok(Redirect::to(&format!("/update-room/{}/", room.id)));
        }
    };

    let topic = state.store.topic_upsert(&valid.topic).await?;
    state
        .store
        .update_room(&room.id, &topic.id, &valid.name, valid.description.as_deref())
        .await?;
    Ok(Redirect::to("/"))
}
