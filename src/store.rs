use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{Message, MessageListing, Participant, Room, RoomListing, Topic, User};

/// All persistence lives here; handlers never touch the pool directly.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // users

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash) VALUES (?, ?, ?, ?) \
             RETURNING id, username, email, password_hash, created",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn user(&self, id: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn user_by_username(&self, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn update_user(&self, id: &str, username: &str, email: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET username = ?, email = ? WHERE id = ?")
            .bind(username)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Rooms survive with a null host; the user's own messages cascade away.
    pub async fn delete_user(&self, id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // topics

    /// Atomic get-or-create keyed on the UNIQUE(name) constraint, so two
    /// racing creations of the same name land on one row.
    pub async fn topic_upsert(&self, name: &str) -> sqlx::Result<Topic> {
        sqlx::query_as::<_, Topic>(
            "INSERT INTO topics (id, name) VALUES (?, ?) \
             ON CONFLICT(name) DO UPDATE SET name = excluded.name \
             RETURNING id, name",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(name)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn topics(&self, limit: i64) -> sqlx::Result<Vec<Topic>> {
        sqlx::query_as::<_, Topic>("SELECT id, name FROM topics ORDER BY name LIMIT ?")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn all_topics(&self) -> sqlx::Result<Vec<Topic>> {
        sqlx::query_as::<_, Topic>("SELECT id, name FROM topics ORDER BY name")
            .fetch_all(&self.pool)
            .await
    }

    // rooms

    pub async fn create_room(
        &self,
        host_id: &str,
        topic_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> sqlx::Result<Room> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (id, host_id, topic_id, name, description) VALUES (?, ?, ?, ?, ?) \
             RETURNING id, host_id, topic_id, name, description, created, updated",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(host_id)
        .bind(topic_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn room(&self, id: &str) -> sqlx::Result<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn room_listing(&self, id: &str) -> sqlx::Result<Option<RoomListing>> {
        sqlx::query_as::<_, RoomListing>(
            "SELECT r.id, r.name, r.description, r.host_id, u.username AS host_username, \
                    t.name AS topic_name, r.created, r.updated \
             FROM rooms r \
             LEFT JOIN users u ON u.id = r.host_id \
             LEFT JOIN topics t ON t.id = r.topic_id \
             WHERE r.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Rooms whose topic name, room name, or description contains `q` as a
    /// case-insensitive substring. An empty `q` matches everything. instr()
    /// keeps LIKE metacharacters inert.
    pub async fn search_rooms(&self, q: &str) -> sqlx::Result<Vec<RoomListing>> {
        sqlx::query_as::<_, RoomListing>(
            "SELECT r.id, r.name, r.description, r.host_id, u.username AS host_username, \
                    t.name AS topic_name, r.created, r.updated \
             FROM rooms r \
             LEFT JOIN users u ON u.id = r.host_id \
             LEFT JOIN topics t ON t.id = r.topic_id \
             WHERE ?1 = '' \
                OR instr(lower(coalesce(t.name, '')), lower(?1)) > 0 \
                OR instr(lower(r.name), lower(?1)) > 0 \
                OR instr(lower(coalesce(r.description, '')), lower(?1)) > 0 \
             ORDER BY r.updated DESC, r.created DESC",
        )
        .bind(q)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn rooms_by_host(&self, user_id: &str) -> sqlx::Result<Vec<RoomListing>> {
        sqlx::query_as::<_, RoomListing>(
            "SELECT r.id, r.name, r.description, r.host_id, u.username AS host_username, \
                    t.name AS topic_name, r.created, r.updated \
             FROM rooms r \
             LEFT JOIN users u ON u.id = r.host_id \
             LEFT JOIN topics t ON t.id = r.topic_id \
             WHERE r.host_id = ? \
             ORDER BY r.updated DESC, r.created DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update_room(
        &self,
        id: &str,
        topic_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> sqlx::Result<()> {
        sqlx::query(
            "UPDATE rooms SET topic_id = ?, name = ?, description = ?, updated = unixepoch() \
             WHERE id = ?",
        )
        .bind(topic_id)
        .bind(name)
        .bind(description)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Cascades the room's messages and participant rows.
    pub async fn delete_room(&self, id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // messages

    /// Inserts the message and enrolls the author as a participant in one
    /// transaction, keeping the author-is-participant invariant atomic.
    pub async fn post_message(
        &self,
        user_id: &str,
        room_id: &str,
        body: &str,
    ) -> sqlx::Result<Message> {
        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, Message>(
            "INSERT INTO messages (id, user_id, room_id, body) VALUES (?, ?, ?, ?) \
             RETURNING id, user_id, room_id, body, created, updated",
        )
        .bind(Uuid::now_v7().to_string())
        .bind(user_id)
        .bind(room_id)
        .bind(body)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT OR IGNORE INTO participants (room_id, user_id) VALUES (?, ?)")
            .bind(room_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    pub async fn message(&self, id: &str) -> sqlx::Result<Option<Message>> {
        sqlx::query_as::<_, Message>("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn delete_message(&self, id: &str) -> sqlx::Result<()> {
        sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn messages_in(&self, room_id: &str) -> sqlx::Result<Vec<MessageListing>> {
        sqlx::query_as::<_, MessageListing>(
            "SELECT m.id, m.body, m.user_id, u.username, m.room_id, r.name AS room_name, m.created \
             FROM messages m \
             JOIN users u ON u.id = m.user_id \
             JOIN rooms r ON r.id = m.room_id \
             WHERE m.room_id = ? \
             ORDER BY m.created DESC",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Messages for the home feed are matched only by their room's topic
    /// name, not by room name or description.
    pub async fn search_messages(&self, q: &str) -> sqlx::Result<Vec<MessageListing>> {
        sqlx::query_as::<_, MessageListing>(
            "SELECT m.id, m.body, m.user_id, u.username, m.room_id, r.name AS room_name, m.created \
             FROM messages m \
             JOIN users u ON u.id = m.user_id \
             JOIN rooms r ON r.id = m.room_id \
             LEFT JOIN topics t ON t.id = r.topic_id \
             WHERE ?1 = '' OR instr(lower(coalesce(t.name, '')), lower(?1)) > 0 \
             ORDER BY m.created DESC",
        )
        .bind(q)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn recent_messages(&self) -> sqlx::Result<Vec<MessageListing>> {
        sqlx::query_as::<_, MessageListing>(
            "SELECT m.id, m.body, m.user_id, u.username, m.room_id, r.name AS room_name, m.created \
             FROM messages m \
             JOIN users u ON u.id = m.user_id \
             JOIN rooms r ON r.id = m.room_id \
             ORDER BY m.created DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn messages_by_user(&self, user_id: &str) -> sqlx::Result<Vec<MessageListing>> {
        sqlx::query_as::<_, MessageListing>(
            "SELECT m.id, m.body, m.user_id, u.username, m.room_id, r.name AS room_name, m.created \
             FROM messages m \
             JOIN users u ON u.id = m.user_id \
             JOIN rooms r ON r.id = m.room_id \
             WHERE m.user_id = ? \
             ORDER BY m.created DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn participants(&self, room_id: &str) -> sqlx::Result<Vec<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT p.user_id, u.username \
             FROM participants p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.room_id = ? \
             ORDER BY u.username",
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;

    async fn setup() -> Store {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::migrate!().run(&pool).await.unwrap();
        Store::new(pool)
    }

    async fn user(store: &Store, name: &str) -> User {
        store.create_user(name, "", "hash").await.unwrap()
    }

    #[tokio::test]
    async fn created_room_belongs_to_its_host() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", Some("casual blitz"))
            .await
            .unwrap();

        assert_eq!(room.host_id.as_deref(), Some(alice.id.as_str()));

        let listing = store.room_listing(&room.id).await.unwrap().unwrap();
        assert_eq!(listing.host_username.as_deref(), Some("alice"));
        assert_eq!(listing.topic_name.as_deref(), Some("Games"));
    }

    #[tokio::test]
    async fn topic_upsert_reuses_existing_row() {
        let store = setup().await;
        let first = store.topic_upsert("Games").await.unwrap();
        let second = store.topic_upsert("Games").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.all_topics().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn search_matches_topic_name_room_name_and_description() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        store
            .create_room(&alice.id, &topic.id, "Chess Club", Some("casual blitz"))
            .await
            .unwrap();

        for q in ["chess", "GAMES", "blitz", ""] {
            let rooms = store.search_rooms(q).await.unwrap();
            assert_eq!(rooms.len(), 1, "query {q:?} should match");
        }
        assert!(store.search_rooms("knitting").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_treats_like_metacharacters_literally() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();

        assert!(store.search_rooms("%").await.unwrap().is_empty());
        assert!(store.search_rooms("_").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn message_search_is_scoped_to_topic_name() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();
        store.post_message(&alice.id, &room.id, "e4!").await.unwrap();

        assert_eq!(store.search_messages("games").await.unwrap().len(), 1);
        // Room name does not match the message feed.
        assert!(store.search_messages("chess").await.unwrap().is_empty());
        assert_eq!(store.search_messages("").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn posting_enrolls_the_author_as_participant() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();

        store.post_message(&bob.id, &room.id, "hi").await.unwrap();
        store.post_message(&bob.id, &room.id, "hi again").await.unwrap();

        let participants = store.participants(&room.id).await.unwrap();
        assert_eq!(participants.len(), 1);
        assert_eq!(participants[0].username, "bob");
    }

    #[tokio::test]
    async fn deleting_a_room_cascades_its_messages() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();
        let message = store.post_message(&alice.id, &room.id, "e4!").await.unwrap();

        store.delete_room(&room.id).await.unwrap();

        assert!(store.message(&message.id).await.unwrap().is_none());
        assert!(store.recent_messages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_a_user_nulls_host_and_removes_their_messages() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();
        store.post_message(&alice.id, &room.id, "mine").await.unwrap();
        let bobs = store.post_message(&bob.id, &room.id, "not mine").await.unwrap();

        store.delete_user(&alice.id).await.unwrap();

        let survivor = store.room(&room.id).await.unwrap().unwrap();
        assert!(survivor.host_id.is_none());
        assert!(store.messages_by_user(&alice.id).await.unwrap().is_empty());
        assert!(store.message(&bobs.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_a_message_leaves_other_activity_intact() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let topic = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &topic.id, "Chess Club", None)
            .await
            .unwrap();
        let hers = store.post_message(&alice.id, &room.id, "hers").await.unwrap();
        store.post_message(&bob.id, &room.id, "his").await.unwrap();

        store.delete_message(&hers.id).await.unwrap();

        let feed = store.recent_messages().await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].username, "bob");
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let store = setup().await;
        user(&store, "alice").await;

        let err = store.create_user("alice", "", "hash").await.unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("expected unique violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_room_overwrites_fields() {
        let store = setup().await;
        let alice = user(&store, "alice").await;
        let games = store.topic_upsert("Games").await.unwrap();
        let room = store
            .create_room(&alice.id, &games.id, "Chess Club", None)
            .await
            .unwrap();

        let books = store.topic_upsert("Books").await.unwrap();
        store
            .update_room(&room.id, &books.id, "Book Club", Some("monthly reads"))
            .await
            .unwrap();

        let listing = store.room_listing(&room.id).await.unwrap().unwrap();
        assert_eq!(listing.name, "Book Club");
        assert_eq!(listing.topic_name.as_deref(), Some("Books"));
        assert_eq!(listing.description.as_deref(), Some("monthly reads"));
    }
}
