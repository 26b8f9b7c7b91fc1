//! In-memory backend double.
//!
//! Backs tests and the local CLI with the same trait surface as the
//! hosted service. Tables live behind `tokio::sync::RwLock` and are
//! cloned out on read, so a page's load/filter/render chain never holds
//! a lock across an await point.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use newsroom_shared::{
    Article, ArticlePatch, Comment, Error, Identity, NewArticle, NewComment, Role, RoleRecord,
    SiteStats,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{Backend, Result};

#[derive(Default)]
struct Tables {
    session: Option<Identity>,
    profiles: Vec<RoleRecord>,
    articles: Vec<Article>,
    comments: Vec<Comment>,
}

/// Local stand-in for the hosted backend.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs an identity in and ensures a profile row exists for it.
    pub async fn sign_in(&self, email: &str, role: Role) -> Identity {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        let mut tables = self.tables.write().await;
        tables.profiles.push(RoleRecord {
            id: identity.id.clone(),
            email: identity.email.clone(),
            role,
        });
        tables.session = Some(identity.clone());
        identity
    }

    /// Signs in without creating a profile row; the gate must fall back
    /// to reader for such accounts.
    pub async fn sign_in_without_profile(&self, email: &str) -> Identity {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        self.tables.write().await.session = Some(identity.clone());
        identity
    }

    pub async fn sign_out(&self) {
        self.tables.write().await.session = None;
    }

    /// Seeds an article directly, bypassing the policy layer.
    pub async fn seed_article(&self, fields: NewArticle, featured: bool) -> Article {
        let article = Article {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            category: fields.category,
            content: fields.content,
            image_url: fields.image_url,
            featured,
            created_at: Utc::now(),
        };
        self.tables.write().await.articles.push(article.clone());
        article
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        Ok(self.tables.read().await.session.clone())
    }

    async fn role_record(&self, identity_id: &str) -> Result<Option<RoleRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .profiles
            .iter()
            .find(|profile| profile.id == identity_id)
            .cloned())
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let mut articles = self.tables.read().await.articles.clone();
        articles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(articles)
    }

    async fn get_article(&self, id: &str) -> Result<Article> {
        let tables = self.tables.read().await;
        tables
            .articles
            .iter()
            .find(|article| article.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found("article", id))
    }

    async fn insert_article(&self, fields: NewArticle) -> Result<Article> {
        let article = Article {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            category: fields.category,
            content: fields.content,
            image_url: fields.image_url,
            featured: false,
            created_at: Utc::now(),
        };
        self.tables.write().await.articles.push(article.clone());
        Ok(article)
    }

    async fn update_article(&self, id: &str, patch: ArticlePatch) -> Result<Article> {
        let mut tables = self.tables.write().await;
        let article = tables
            .articles
            .iter_mut()
            .find(|article| article.id == id)
            .ok_or_else(|| Error::not_found("article", id))?;
        if let Some(title) = patch.title {
            article.title = title;
        }
        if let Some(category) = patch.category {
            article.category = category;
        }
        if let Some(content) = patch.content {
            article.content = content;
        }
        if let Some(image_url) = patch.image_url {
            article.image_url = Some(image_url);
        }
        Ok(article.clone())
    }

    async fn delete_article(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.articles.len();
        tables.articles.retain(|article| article.id != id);
        if tables.articles.len() == before {
            return Err(Error::not_found("article", id));
        }
        // Explicit cascade: the store does not do this for us.
        tables.comments.retain(|comment| comment.article_id != id);
        Ok(())
    }

    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .iter()
            .filter(|comment| comment.article_id == article_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(comments)
    }

    async fn insert_comment(&self, fields: NewComment) -> Result<Comment> {
        let mut tables = self.tables.write().await;
        if !tables
            .articles
            .iter()
            .any(|article| article.id == fields.article_id)
        {
            return Err(Error::not_found("article", fields.article_id));
        }
        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            article_id: fields.article_id,
            author_id: fields.author_id,
            author_email: fields.author_email,
            content: fields.content,
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|comment| comment.id != id);
        if tables.comments.len() == before {
            return Err(Error::not_found("comment", id));
        }
        Ok(())
    }

    async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(Error::remote("refusing to store an empty image"));
        }
        Ok(format!("memory://images/{filename}"))
    }

    async fn list_profiles(&self) -> Result<Vec<RoleRecord>> {
        let mut profiles = self.tables.read().await.profiles.clone();
        profiles.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(profiles)
    }

    async fn set_role(&self, identity_id: &str, role: Role) -> Result<()> {
        let mut tables = self.tables.write().await;
        let profile = tables
            .profiles
            .iter_mut()
            .find(|profile| profile.id == identity_id)
            .ok_or_else(|| Error::not_found("profile", identity_id))?;
        profile.role = role;
        Ok(())
    }

    async fn set_featured(&self, article_id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.articles.iter().any(|a| a.id == article_id) {
            return Err(Error::not_found("article", article_id));
        }
        // Single-hero invariant lives here, at the mutation boundary.
        for article in tables.articles.iter_mut() {
            article.featured = article.id == article_id;
        }
        Ok(())
    }

    async fn stats(&self) -> Result<SiteStats> {
        let tables = self.tables.read().await;
        Ok(SiteStats {
            total_users: tables.profiles.len(),
            total_articles: tables.articles.len(),
            editor_count: tables
                .profiles
                .iter()
                .filter(|profile| profile.role == Role::Editor)
                .count(),
        })
    }
}
