use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;

use crate::{
    auth::{password, MaybeUser},
    base_context,
    forms::RegisterForm,
    session::{self, USER_ID},
    AppResult, AppState,
};

#[debug_handler]
pub(crate) async fn register_page(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
) -> AppResult<Response> {
    if user.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let flashes = session::take_flashes(&session).await?;
    let mut context = base_context(None, &flashes);
    context.insert("page", "register");
    Ok(state.render("login_register.html", &context)?.into_response())
}

#[debug_handler]
pub(crate) async fn register(
    State(state): State<AppState>,
    session: Session,
    MaybeUser(user): MaybeUser,
    Form(form): Form<RegisterForm>,
) -> AppResult<Redirect> {
    if user.is_some() {
        return Ok(Redirect::to("/"));
    }

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            for error in errors {
                session::flash(&session, error).await?;
            }
            return Ok(Redirect::to("/register/"));
        }
    };

    let hash = password::hash_password(&valid.password)?;
    let user = match state.store.create_user(&valid.username, "", &hash).await {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            session::flash(&session, "That username is already taken.").await?;
            return Ok(Redirect::to("/register/"));
        }
        Err(err) => return Err(err.into()),
    };

    // Registration implies login.
    session.insert(USER_ID, &user.id).await?;
    tracing::info!(username = %user.username, "registered");
    Ok(Redirect::to("/"))
}
