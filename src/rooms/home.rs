use axum::{
    debug_handler,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{auth::MaybeUser, base_context, session, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    q: Option<String>,
}

/// Searchable room listing plus the recent-activity sidebar. An absent or
/// empty `q` lists every room.
#[debug_handler]
pub(crate) async fn home(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
    Query(SearchQuery { q }): Query<SearchQuery>,
) -> AppResult<Response> {
    let q = q.unwrap_or_default();

    let rooms = state.store.search_rooms(&q).await?;
    let topics = state.store.topics(5).await?;
    let room_messages = state.store.search_messages(&q).await?;

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(user.as_ref(), &flashes);
    context.insert("q", &q);
    context.insert("room_count", &rooms.len());
    context.insert("rooms", &rooms);
    context.insert("topics", &topics);
    context.insert("room_messages", &room_messages);
    Ok(state.render("home.html", &context)?.into_response())
}
