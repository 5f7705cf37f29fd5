mod login;
mod logout;
mod register;
pub mod password;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use tower_sessions::Session;

use crate::{models::User, session::USER_ID, store::Store, AppError, AppResult, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/", get(login::login_page).post(login::login))
        .route("/logout/", get(logout::logout))
        .route("/register/", get(register::register_page).post(register::register))
}

async fn current_user(session: &Session, store: &Store) -> AppResult<Option<User>> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(None);
    };
    // A stale session for a since-deleted user counts as anonymous.
    Ok(store.user(&user_id).await?)
}

/// Extractor for handlers that mutate state. Anonymous requests are bounced
/// to the login page instead of erroring.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Store: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let store = Store::from_ref(state);
        match current_user(&session, &store).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => Err(Redirect::to("/login/").into_response()),
            Err(err) => Err(err.into_response()),
        }
    }
}

/// Like [`AuthUser`] but never rejects; public pages use it to render the
/// nav for whoever is looking.
pub struct MaybeUser(pub Option<User>);

impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    Store: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let store = Store::from_ref(state);
        current_user(&session, &store)
            .await
            .map(MaybeUser)
            .map_err(IntoResponse::into_response)
    }
}

/// The one ownership gate: every owner-only mutation goes through here.
pub fn require_owner(owner_id: Option<&str>, actor: &User) -> Result<(), AppError> {
    if owner_id == Some(actor.id.as_str()) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
