use anyhow::Result;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::post::Post;
use crate::infra::db::Db;

#[derive(Clone)]
pub struct PostService {
    db: Db,
}

impl PostService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    pub async fn create_post(
        &self,
        user_id: Uuid,
        title: String,
        contents: String,
        image_key: Option<String>,
    ) -> Result<Post> {
        let row = sqlx::query(
            "INSERT INTO posts (user_id, title, contents, image_key) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, title, contents, image_key, created_at",
        )
        .bind(user_id)
        .bind(title)
        .bind(contents)
        .bind(image_key)
        .fetch_one(self.db.pool())
        .await?;

        Ok(Post {
            id: row.get("id"),
            user_id: row.get("user_id"),
            title: row.get("title"),
            contents: row.get("contents"),
            image_key: row.get("image_key"),
            created_at: row.get("created_at"),
        })
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, user_id, title, contents, image_key, created_at \
             FROM posts WHERE id = $1",
        )
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?;

        let post = row.map(|row| Post {
            id: row.get("id"),
            user_id: row.get("user_id"),
            title: row.get("title"),
            contents: row.get("contents"),
            image_key: row.get("image_key"),
            created_at: row.get("created_at"),
        });

        Ok(post)
    }
}
