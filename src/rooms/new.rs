use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;

use crate::{auth::AuthUser, base_context, forms::RoomForm, session, AppResult, AppState};

#[debug_handler]
pub(crate) async fn create_room_page(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
) -> AppResult<Response> {
    let topics = state.store.all_topics().await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(Some(&user), &flashes);
    context.insert("topics", &topics);
    Ok(state.render("room_form.html", &context)?.into_response())
}

#[debug_handler]
pub(crate) async fn create_room(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Form(form): Form<RoomForm>,
) -> AppResult<Redirect> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            for error in errors {
                session::flash(&session, error).await?;
            }
            return Ok(Redirect::to("/create-room/"));
        }
    };

    let topic = state.store.topic_upsert(&valid.topic).await?;
    state
        .store
        .create_room(&user.id, &topic.id, &valid.name, valid.description.as_deref())
        .await?;
    Ok(Redirect::to("/"))
}
