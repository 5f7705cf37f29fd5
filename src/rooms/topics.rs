use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;

use crate::{auth::MaybeUser, base_context, session, AppResult, AppState};

#[debug_handler]
pub(crate) async fn topics(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    let topics = state.store.all_topics().await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(user.as_ref(), &flashes);
    context.insert("topics", &topics);
    Ok(state.render("topics.html", &context)?.into_response())
}
