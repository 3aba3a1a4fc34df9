use anyhow::Result;
use serde::Serialize;
use sqlx::Row;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::infra::db::Db;

/// Wire format for feed timestamps.
const FEED_TIMESTAMP: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub title: String,
    pub contents: String,
    pub created_at: String,
}

#[derive(Clone)]
pub struct FeedService {
    db: Db,
}

impl FeedService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Posts authored by the user's followees, newest first. Ties on
    /// created_at break on id descending so the ordering is
    /// deterministic. The full result set is returned; no pagination.
    pub async fn get_newsfeed(&self, user_id: Uuid) -> Result<Vec<FeedEntry>> {
        let rows = sqlx::query(
            "SELECT p.id, p.user_id, u.username, p.title, p.contents, p.created_at \
             FROM posts p \
             JOIN users u ON u.id = p.user_id \
             WHERE p.user_id IN ( \
                 SELECT followee_id FROM follows WHERE follower_id = $1 \
             ) \
             ORDER BY p.created_at DESC, p.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let created_at: OffsetDateTime = row.get("created_at");
            entries.push(FeedEntry {
                id: row.get("id"),
                user_id: row.get("user_id"),
                username: row.get("username"),
                title: row.get("title"),
                contents: row.get("contents"),
                created_at: format_feed_timestamp(created_at)?,
            });
        }

        Ok(entries)
    }
}

pub fn format_feed_timestamp(timestamp: OffsetDateTime) -> Result<String> {
    Ok(timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(FEED_TIMESTAMP)?)
}
