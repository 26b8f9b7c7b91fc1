//! Authorization layer over any backend.
//!
//! The original site hid admin buttons client-side and trusted the page
//! not to call what it could not see. This wrapper moves the role check
//! behind the boundary: every mutation resolves the caller through the
//! wrapped backend's own session/role lookups and refuses before a
//! single byte is written. A denied call mutates nothing.

use async_trait::async_trait;
use newsroom_shared::{
    authorize, Article, ArticlePatch, Comment, Decision, DenyReason, Error, Identity, NewArticle,
    NewComment, Role, RoleRecord, RoleSet, SiteStats,
};

use crate::{Backend, Result};

/// Policy-enforcing wrapper around a [`Backend`].
pub struct PolicyGate<B> {
    inner: B,
}

impl<B: Backend> PolicyGate<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Resolves the caller and checks them against `required`.
    ///
    /// Lookup failures deny as `NotAuthenticated` rather than erroring:
    /// an ambiguous caller is treated as no caller at all.
    async fn require(&self, required: RoleSet) -> Result<Identity> {
        let identity = match self.inner.current_identity().await {
            Ok(Some(identity)) => identity,
            Ok(None) => return Err(Error::NotAuthenticated),
            Err(error) => {
                tracing::warn!(%error, "session lookup failed, denying");
                return Err(Error::NotAuthenticated);
            }
        };
        let role = match self.inner.role_record(&identity.id).await {
            Ok(record) => Role::resolve(record.as_ref()),
            Err(error) => {
                tracing::warn!(%error, "role lookup failed, denying");
                return Err(Error::NotAuthenticated);
            }
        };
        match authorize(role, true, required) {
            Decision::Allow => Ok(identity),
            Decision::Deny(DenyReason::NotAuthenticated) => Err(Error::NotAuthenticated),
            Decision::Deny(DenyReason::InsufficientRole) => {
                tracing::info!(%role, %required, "mutation refused");
                Err(Error::InsufficientRole { role })
            }
        }
    }
}

#[async_trait]
impl<B: Backend> Backend for PolicyGate<B> {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        self.inner.current_identity().await
    }

    async fn role_record(&self, identity_id: &str) -> Result<Option<RoleRecord>> {
        self.inner.role_record(identity_id).await
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        self.inner.list_articles().await
    }

    async fn get_article(&self, id: &str) -> Result<Article> {
        self.inner.get_article(id).await
    }

    async fn insert_article(&self, fields: NewArticle) -> Result<Article> {
        self.require(RoleSet::EDITORIAL).await?;
        self.inner.insert_article(fields).await
    }

    async fn update_article(&self, id: &str, patch: ArticlePatch) -> Result<Article> {
        self.require(RoleSet::EDITORIAL).await?;
        self.inner.update_article(id, patch).await
    }

    async fn delete_article(&self, id: &str) -> Result<()> {
        self.require(RoleSet::ADMIN_ONLY).await?;
        self.inner.delete_article(id).await
    }

    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>> {
        self.inner.list_comments(article_id).await
    }

    async fn insert_comment(&self, fields: NewComment) -> Result<Comment> {
        let identity = self.require(RoleSet::ANY).await?;
        // The author is whoever holds the session, not whatever the
        // form claims.
        let fields = NewComment {
            author_id: identity.id,
            author_email: identity.email,
            ..fields
        };
        self.inner.insert_comment(fields).await
    }

    async fn delete_comment(&self, id: &str) -> Result<()> {
        self.require(RoleSet::EDITORIAL).await?;
        self.inner.delete_comment(id).await
    }

    async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        self.require(RoleSet::EDITORIAL).await?;
        self.inner.upload_image(bytes, filename).await
    }

    async fn list_profiles(&self) -> Result<Vec<RoleRecord>> {
        self.require(RoleSet::ADMIN_ONLY).await?;
        self.inner.list_profiles().await
    }

    async fn set_role(&self, identity_id: &str, role: Role) -> Result<()> {
        self.require(RoleSet::ADMIN_ONLY).await?;
        self.inner.set_role(identity_id, role).await
    }

    async fn set_featured(&self, article_id: &str) -> Result<()> {
        self.require(RoleSet::EDITORIAL).await?;
        self.inner.set_featured(article_id).await
    }

    async fn stats(&self) -> Result<SiteStats> {
        self.require(RoleSet::ADMIN_ONLY).await?;
        self.inner.stats().await
    }
}
