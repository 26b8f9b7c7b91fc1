use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod article_cache;
pub mod error;
pub mod gate;

pub use article_cache::ArticleListCache;
pub use error::Error;
pub use gate::{authorize, Decision, DenyReason, Role, RoleSet};

/// An authenticated session's subject, independent of role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// One profile row per identity: who they are plus what they may do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: String,
    pub email: String,
    pub role: Role,
}

// Full article data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub category: String,
    pub content: String,
    pub image_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when publishing a new article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub category: String,
    pub content: String,
    pub image_url: Option<String>,
}

/// Partial update for an existing article. `None` fields are left as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub article_id: String,
    pub author_id: String,
    /// Email snapshot taken at posting time; survives later profile edits.
    pub author_email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when posting a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub article_id: String,
    pub author_id: String,
    pub author_email: String,
    pub content: String,
}

/// Aggregate counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    pub total_users: usize,
    pub total_articles: usize,
    pub editor_count: usize,
}
