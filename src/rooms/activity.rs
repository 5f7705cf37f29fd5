use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{auth::MaybeUser, base_context, session, AppResult, AppState};

/// Site-wide message feed, newest first.
#[debug_handler]
pub(crate) async fn activity(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    let room_messages = state.store.recent_messages().await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(user.as_ref(), &flashes);
    context.insert("room_messages", &room_messages);
    Ok(state.render("activity.html", &context)?.into_response())
}
