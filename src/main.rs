use std::collections::HashMap;
use std::str::FromStr;

use axum::Router;
use parley::{auth, profiles, rooms, store::Store, AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tera::Tera;
use time::OffsetDateTime;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv::dotenv().ok();
    let database_url =
        dotenv::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://parley.db".to_string());
    let options = SqliteConnectOptions::from_str(&database_url)
        .expect("bad DATABASE_URL")
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect_with(options)
        .await
        .expect("can't connect to database");
    sqlx::migrate!().run(&pool).await.expect("migrations failed");

    let mut tera = Tera::new("templates/**/*").expect("template parse error");
    tera.register_filter("datetime", datetime_filter);

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(24)));

    let app_state = AppState {
        store: Store::new(pool),
        tera,
    };

    let app = Router::new()
        .merge(auth::router())
        .merge(rooms::router())
        .merge(profiles::router())
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await.unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

/// Renders unix-second timestamps in templates.
fn datetime_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let ts = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("datetime expects a unix timestamp"))?;
    let format = time::format_description::parse("[day] [month repr:short] [year], [hour]:[minute]")
        .map_err(|e| tera::Error::msg(e.to_string()))?;
    let formatted = OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|e| tera::Error::msg(e.to_string()))?
        .format(&format)
        .map_err(|e| tera::Error::msg(e.to_string()))?;
    Ok(tera::Value::String(formatted))
}
