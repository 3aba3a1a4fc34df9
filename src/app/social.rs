use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::social_graph::Follow;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct SocialService {
    db: Db,
}

impl SocialService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Create a follow edge. Returns None when the followee does not
    /// exist. Duplicate and self edges are inserted without complaint;
    /// the schema carries no uniqueness constraint on the pair.
    pub async fn follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<Option<Follow>> {
        let followee_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)",
        )
        .bind(followee_id)
        .fetch_one(self.db.pool())
        .await?;

        if !followee_exists {
            return Ok(None);
        }

        let row = sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) \
             VALUES ($1, $2) \
             RETURNING id, follower_id, followee_id, created_at",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Some(Follow {
            id: row.get("id"),
            follower_id: row.get("follower_id"),
            followee_id: row.get("followee_id"),
            created_at: row.get("created_at"),
        }))
    }

    /// Followee ids for a user, oldest edge first. Empty when the user
    /// follows nobody (or does not exist).
    pub async fn list_followees(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let followees = sqlx::query_scalar(
            "SELECT followee_id FROM follows \
             WHERE follower_id = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(followees)
    }
}
