//! Admin dashboard: analytics, user role management, article table.

use newsroom_access::Backend;
use newsroom_shared::{Article, ArticleListCache, Role, RoleRecord, RoleSet, SiteStats};

use crate::{PageError, Session};

/// Controller for the admin page. Opened only for admins; every
/// mutation reloads the affected tables from the backend rather than
/// patching local state, so a failed call leaves the dashboard showing
/// what the backend actually holds.
#[derive(Debug)]
pub struct AdminPage {
    /// "Logged in as" banner content.
    pub greeting: String,
    pub stats: SiteStats,
    pub users: Vec<RoleRecord>,
    cache: ArticleListCache,
    query: String,
    category: Option<String>,
}

impl AdminPage {
    pub async fn open<B: Backend>(backend: &B, session: &Session) -> Result<Self, PageError> {
        session.require(RoleSet::ADMIN_ONLY)?;
        let greeting = session
            .identity
            .as_ref()
            .map(|identity| identity.email.clone())
            .unwrap_or_default();

        let stats = backend.stats().await?;
        let users = backend.list_profiles().await?;
        let mut cache = ArticleListCache::new();
        cache.load(backend.list_articles().await?);

        Ok(Self {
            greeting,
            stats,
            users,
            cache,
            query: String::new(),
            category: None,
        })
    }

    /// Article table under the active search/category filter.
    pub fn articles(&self) -> Vec<&Article> {
        self.cache.filter(&self.query, self.category.as_deref())
    }

    pub fn filter(&mut self, query: &str, category: Option<&str>) {
        self.query = query.to_string();
        self.category = category.map(str::to_string);
    }

    /// Deletes an article (comments cascade at the backend boundary),
    /// then refreshes the table and counters.
    pub async fn delete_article<B: Backend>(
        &mut self,
        backend: &B,
        article_id: &str,
    ) -> Result<(), PageError> {
        backend.delete_article(article_id).await?;
        self.cache.load(backend.list_articles().await?);
        self.stats = backend.stats().await?;
        Ok(())
    }

    /// Changes a user's role, then refreshes the user table and
    /// counters.
    pub async fn set_role<B: Backend>(
        &mut self,
        backend: &B,
        identity_id: &str,
        role: Role,
    ) -> Result<(), PageError> {
        backend.set_role(identity_id, role).await?;
        self.users = backend.list_profiles().await?;
        self.stats = backend.stats().await?;
        Ok(())
    }

    /// Crowns a new featured story and refreshes the table.
    pub async fn feature_article<B: Backend>(
        &mut self,
        backend: &B,
        article_id: &str,
    ) -> Result<(), PageError> {
        backend.set_featured(article_id).await?;
        self.cache.load(backend.list_articles().await?);
        Ok(())
    }
}
