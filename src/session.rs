use tower_sessions::Session;

use crate::AppResult;

pub const USER_ID: &str = "user_id";
pub const FLASH: &str = "flash";

/// Queues a one-shot banner for the next rendered page.
pub async fn flash(session: &Session, msg: impl Into<String>) -> AppResult<()> {
    let mut pending: Vec<String> = session.get(FLASH).await?.unwrap_or_default();
    pending.push(msg.into());
    session.insert(FLASH, pending).await?;
    Ok(())
}

/// Drains queued banners; each is rendered exactly once.
pub async fn take_flashes(session: &Session) -> AppResult<Vec<String>> {
    Ok(session.remove::<Vec<String>>(FLASH).await?.unwrap_or_default())
}
