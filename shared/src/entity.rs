use chrono::{DateTime, Utc};
use serde::Serialize;

// ── Posts ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

// ── Comments ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub name: String,
    pub avatar: String,
    /// `None` for a top-level comment on the post.
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
