//! Client access to the hosted news backend.
//!
//! The site does not run its own server; everything below is a boundary
//! onto a backend-as-a-service. [`Backend`] captures the calls the pages
//! need, [`RemoteBackend`] speaks the hosted REST dialect, and
//! [`MemoryBackend`] is the local double used by tests and the CLI.
//! [`PolicyGate`] wraps either one and enforces role checks on every
//! mutation, so hiding a button client-side is never the only line of
//! defense.

use async_trait::async_trait;
use newsroom_shared::{
    Article, ArticlePatch, Comment, Error, Identity, NewArticle, NewComment, Role, RoleRecord,
    SiteStats,
};

pub mod memory;
pub mod policy;
pub mod remote;

pub use memory::MemoryBackend;
pub use policy::PolicyGate;
pub use remote::{RemoteBackend, RemoteConfig};

pub type Result<T> = std::result::Result<T, Error>;

/// The backend-as-a-service boundary.
///
/// All calls are single asynchronous round-trips. List calls return
/// newest-first; `get_article` answers `Error::NotFound` rather than an
/// empty payload so callers can distinguish "gone" from "empty".
#[async_trait]
pub trait Backend: Send + Sync {
    /// Current authenticated identity, or `None` for anonymous visitors.
    async fn current_identity(&self) -> Result<Option<Identity>>;

    /// Profile row for an identity; `None` when the account has no row
    /// yet (resolved to reader by the gate, never treated as an error).
    async fn role_record(&self, identity_id: &str) -> Result<Option<RoleRecord>>;

    async fn list_articles(&self) -> Result<Vec<Article>>;
    async fn get_article(&self, id: &str) -> Result<Article>;
    async fn insert_article(&self, fields: NewArticle) -> Result<Article>;
    async fn update_article(&self, id: &str, patch: ArticlePatch) -> Result<Article>;

    /// Deletes the article and, explicitly, its comments: the hosted
    /// store does not cascade on our behalf.
    async fn delete_article(&self, id: &str) -> Result<()>;

    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>>;
    async fn insert_comment(&self, fields: NewComment) -> Result<Comment>;
    async fn delete_comment(&self, id: &str) -> Result<()>;

    /// Stores an image and returns its public URL.
    async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String>;

    /// All profile rows, ordered by email ascending (admin user table).
    async fn list_profiles(&self) -> Result<Vec<RoleRecord>>;

    async fn set_role(&self, identity_id: &str, role: Role) -> Result<()>;

    /// Marks one article as the featured hero, unfeaturing any previous
    /// holder in the same operation.
    async fn set_featured(&self, article_id: &str) -> Result<()>;

    async fn stats(&self) -> Result<SiteStats>;
}
