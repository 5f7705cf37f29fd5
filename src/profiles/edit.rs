use axum::{
    debug_handler,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use tower_sessions::Session;

use crate::{auth::AuthUser, base_context, forms::UserForm, session, AppResult, AppState};

#[debug_handler]
pub(crate) async fn update_user_page(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
) -> AppResult<Response> {
    let flashes = session::take_flashes(&session).await?;
    let context = base_context(Some(&user), &flashes);
    Ok(state.render("update_user.html", &context)?.into_response())
}

#[debug_handler]
pub(crate) async fn update_user(
    State(state): State<AppState>,
    session: Session,
    AuthUser(user): AuthUser,
    Form(form): Form<UserForm>,
) -> AppResult<Redirect> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            for error in errors {
                session::flash(&session, error).await?;
            }
            return Ok(Redirect::to("/update-user/"));
        }
    };

    match state.store.update_user(&user.id, &valid.username, &valid.email).await {
        Ok(()) => Ok(Redirect::to(&format!("/profile/{}/", user.id))),
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            session::flash(&session, "That username is already taken.").await?;
            Ok(Redirect::to("/update-user/"))
        }
        Err(err) => Err(err.into()),
    }
}
