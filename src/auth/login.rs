use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{
    auth::{password, MaybeUser},
    base_context,
    session::{self, USER_ID},
    AppResult, AppState,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[debug_handler]
pub(crate) async fn login_page(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    // Already signed in: no re-prompting.
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(None, &flashes);
    context.insert("page", "login");
    Ok(state.render("login_register.html", &context)?.into_response())
}

#[debug_handler]
pub(crate) async fn login(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
    Form(LoginForm { username, password }): Form<LoginForm>,
) -> AppResult<Redirect> {
    if user.is_some() {
        return Ok(Redirect::to("/"));
    }

    let username = username.trim().to_lowercase();

    // One lookup, one verify; unknown users and wrong passwords share a
    // single failure message so accounts can't be enumerated.
    match state.store.user_by_username(&username).await? {
        Some(user) if password::verify_password(&password, &user.password_hash) => {
            session.insert(USER_ID, &user.id).await?;
            tracing::info!(%username, "logged in");
            Ok(Redirect::to("/"))
        }
        _ => {
            session::flash(&session, "Username or password is incorrect.").await?;
            Ok(Redirect::to("/login/"))
        }
    }
}
