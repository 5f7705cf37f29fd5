use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created: i64,

    // unique: username (stored lowercased)
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Topic {
    pub id: String,
    pub name: String,

    // unique: name
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: String,
    pub host_id: Option<String>,
    pub topic_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub created: i64,
    pub updated: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub body: String,
    pub created: i64,
    pub updated: i64,
}

/// Room row joined with its topic and host names, for listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoomListing {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub host_id: Option<String>,
    pub host_username: Option<String>,
    pub topic_name: Option<String>,
    pub created: i64,
    pub updated: i64,
}

/// Message row joined with its author and room names, for feeds.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageListing {
    pub id: String,
    pub body: String,
    pub user_id: String,
    pub username: String,
    pub room_id: String,
    pub room_name: String,
    pub created: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participant {
    pub user_id: String,
    pub username: String,
}
