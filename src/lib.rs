pub mod auth;
pub mod error;
pub mod forms;
pub mod models;
pub mod profiles;
pub mod rooms;
pub mod session;
pub mod store;

pub use error::{AppError, AppResult};

use axum::{extract::FromRef, response::Html};
use tera::Tera;

use crate::{models::User, store::Store};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub tera: Tera,
}

impl AppState {
    pub fn render(&self, template: &str, context: &tera::Context) -> AppResult<Html<String>> {
        Ok(Html(self.tera.render(template, context)?))
    }
}

/// Context every page starts from: who is looking, plus one-shot banners.
pub fn base_context(user: Option<&User>, flashes: &[String]) -> tera::Context {
    let mut context = tera::Context::new();
    context.insert("current_user", &user);
    context.insert("flashes", flashes);
    context
}
