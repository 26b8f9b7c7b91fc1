//! Remote client for the hosted backend.
//!
//! Speaks a PostgREST-style REST dialect: row filters in the query
//! string (`id=eq.<id>`), `Prefer: return=representation` on writes, and
//! a separate auth endpoint for the current session. Every request goes
//! through one reqwest client built with an explicit timeout so a hung
//! backend surfaces as `RemoteFailure` instead of a page stuck resolving
//! its session forever.

use std::{env, sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use newsroom_shared::{
    Article, ArticlePatch, Comment, Error, Identity, NewArticle, NewComment, Role, RoleRecord,
    SiteStats,
};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method, RequestBuilder, StatusCode,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{Backend, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    /// Bearer token of the signed-in session, when there is one.
    pub session_token: Option<String>,
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Reads `NEWSROOM_API_URL`, `NEWSROOM_API_KEY`,
    /// `NEWSROOM_SESSION_TOKEN` and `NEWSROOM_HTTP_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("NEWSROOM_API_URL")
            .map_err(|_| Error::remote("NEWSROOM_API_URL is not set"))?;
        let api_key = env::var("NEWSROOM_API_KEY")
            .map_err(|_| Error::remote("NEWSROOM_API_KEY is not set"))?;
        let session_token = env::var("NEWSROOM_SESSION_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let timeout = env::var("NEWSROOM_HTTP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
            .max(1);

        Ok(Self {
            base_url,
            api_key,
            session_token,
            timeout: Duration::from_secs(timeout),
        })
    }
}

struct RemoteBackendInner {
    config: RemoteConfig,
    client: reqwest::Client,
}

/// Backend implementation that talks to the hosted service.
#[derive(Clone)]
pub struct RemoteBackend {
    inner: Arc<RemoteBackendInner>,
}

// Wire rows. The hosted schema spells the hero flag `is_featured`;
// everything else maps one to one.
#[derive(Debug, Deserialize)]
struct ArticleRow {
    id: String,
    title: String,
    category: String,
    content: String,
    image_url: Option<String>,
    is_featured: bool,
    created_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: row.id,
            title: row.title,
            category: row.category,
            content: row.content,
            image_url: row.image_url,
            featured: row.is_featured,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewArticleBody<'a> {
    title: &'a str,
    category: &'a str,
    content: &'a str,
    image_url: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct ArticlePatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CommentRow {
    id: String,
    article_id: String,
    user_id: String,
    user_email: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            article_id: row.article_id,
            author_id: row.user_id,
            author_email: row.user_email,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct NewCommentBody<'a> {
    article_id: &'a str,
    user_id: &'a str,
    user_email: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    email: String,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    id: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    role: Option<Role>,
}

impl RemoteBackend {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::remote("api key is not a valid header value"))?;
        headers.insert("apikey", api_key);
        if let Some(token) = config.session_token.as_deref() {
            let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| Error::remote("session token is not a valid header value"))?;
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|error| Error::remote(format!("failed to build http client: {error}")))?;

        Ok(Self {
            inner: Arc::new(RemoteBackendInner { config, client }),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(RemoteConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.config.base_url.trim_end_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.client.request(method, self.url(path))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|error| Error::remote(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote(format!("backend answered {status}")));
        }
        response
            .json::<T>()
            .await
            .map_err(|error| Error::remote(format!("malformed backend payload: {error}")))
    }

    async fn send_ok(&self, request: RequestBuilder) -> Result<()> {
        let response = request
            .send()
            .await
            .map_err(|error| Error::remote(error.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::remote(format!("backend answered {status}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for RemoteBackend {
    async fn current_identity(&self) -> Result<Option<Identity>> {
        if self.inner.config.session_token.is_none() {
            return Ok(None);
        }
        let response = self
            .request(Method::GET, "/auth/v1/user")
            .send()
            .await
            .map_err(|error| Error::remote(error.to_string()))?;
        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status if status.is_success() => {
                let user: SessionUser = response
                    .json()
                    .await
                    .map_err(|error| Error::remote(format!("malformed session payload: {error}")))?;
                Ok(Some(Identity {
                    id: user.id,
                    email: user.email,
                }))
            }
            status => Err(Error::remote(format!("backend answered {status}"))),
        }
    }

    async fn role_record(&self, identity_id: &str) -> Result<Option<RoleRecord>> {
        let rows: Vec<ProfileRow> = self
            .send_json(self.request(
                Method::GET,
                &format!("/rest/v1/profiles?id=eq.{identity_id}&select=id,email,role"),
            ))
            .await?;
        Ok(rows.into_iter().next().map(|row| RoleRecord {
            id: row.id,
            email: row.email,
            role: row.role,
        }))
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let rows: Vec<ArticleRow> = self
            .send_json(self.request(
                Method::GET,
                "/rest/v1/articles?select=*&order=created_at.desc",
            ))
            .await?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn get_article(&self, id: &str) -> Result<Article> {
        let rows: Vec<ArticleRow> = self
            .send_json(self.request(Method::GET, &format!("/rest/v1/articles?id=eq.{id}")))
            .await?;
        rows.into_iter()
            .next()
            .map(Article::from)
            .ok_or_else(|| Error::not_found("article", id))
    }

    async fn insert_article(&self, fields: NewArticle) -> Result<Article> {
        let body = NewArticleBody {
            title: &fields.title,
            category: &fields.category,
            content: &fields.content,
            image_url: fields.image_url.as_deref(),
        };
        let rows: Vec<ArticleRow> = self
            .send_json(
                self.request(Method::POST, "/rest/v1/articles")
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
        rows.into_iter()
            .next()
            .map(Article::from)
            .ok_or_else(|| Error::remote("insert returned no representation"))
    }

    async fn update_article(&self, id: &str, patch: ArticlePatch) -> Result<Article> {
        let body = ArticlePatchBody {
            title: patch.title.as_deref(),
            category: patch.category.as_deref(),
            content: patch.content.as_deref(),
            image_url: patch.image_url.as_deref(),
        };
        let rows: Vec<ArticleRow> = self
            .send_json(
                self.request(Method::PATCH, &format!("/rest/v1/articles?id=eq.{id}"))
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
        rows.into_iter()
            .next()
            .map(Article::from)
            .ok_or_else(|| Error::not_found("article", id))
    }

    async fn delete_article(&self, id: &str) -> Result<()> {
        // Comments first: the store has no cascade, and deleting the
        // article first would strand them on failure.
        self.send_ok(self.request(
            Method::DELETE,
            &format!("/rest/v1/comments?article_id=eq.{id}"),
        ))
        .await?;
        self.send_ok(self.request(Method::DELETE, &format!("/rest/v1/articles?id=eq.{id}")))
            .await
    }

    async fn list_comments(&self, article_id: &str) -> Result<Vec<Comment>> {
        let rows: Vec<CommentRow> = self
            .send_json(self.request(
                Method::GET,
                &format!("/rest/v1/comments?article_id=eq.{article_id}&order=created_at.desc"),
            ))
            .await?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    async fn insert_comment(&self, fields: NewComment) -> Result<Comment> {
        let body = NewCommentBody {
            article_id: &fields.article_id,
            user_id: &fields.author_id,
            user_email: &fields.author_email,
            content: &fields.content,
        };
        let rows: Vec<CommentRow> = self
            .send_json(
                self.request(Method::POST, "/rest/v1/comments")
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;
        rows.into_iter()
            .next()
            .map(Comment::from)
            .ok_or_else(|| Error::remote("insert returned no representation"))
    }

    async fn delete_comment(&self, id: &str) -> Result<()> {
        self.send_ok(self.request(Method::DELETE, &format!("/rest/v1/comments?id=eq.{id}")))
            .await
    }

    async fn upload_image(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
        self.send_ok(
            self.request(
                Method::POST,
                &format!("/storage/v1/object/images/{filename}"),
            )
            .header("Content-Type", "application/octet-stream")
            .body(bytes),
        )
        .await?;
        Ok(self.url(&format!("/storage/v1/object/public/images/{filename}")))
    }

    async fn list_profiles(&self) -> Result<Vec<RoleRecord>> {
        let rows: Vec<ProfileRow> = self
            .send_json(self.request(
                Method::GET,
                "/rest/v1/profiles?select=id,email,role&order=email.asc",
            ))
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| RoleRecord {
                id: row.id,
                email: row.email,
                role: row.role,
            })
            .collect())
    }

    async fn set_role(&self, identity_id: &str, role: Role) -> Result<()> {
        self.send_ok(
            self.request(
                Method::PATCH,
                &format!("/rest/v1/profiles?id=eq.{identity_id}"),
            )
            .json(&serde_json::json!({ "role": role })),
        )
        .await
    }

    async fn set_featured(&self, article_id: &str) -> Result<()> {
        // Clear the previous hero, then crown the new one. Two calls,
        // but the invariant ends up holding either way: a failure
        // between them leaves zero featured articles, which every
        // reader must already handle.
        self.send_ok(
            self.request(Method::PATCH, "/rest/v1/articles?is_featured=eq.true")
                .json(&serde_json::json!({ "is_featured": false })),
        )
        .await?;
        let rows: Vec<ArticleRow> = self
            .send_json(
                self.request(
                    Method::PATCH,
                    &format!("/rest/v1/articles?id=eq.{article_id}"),
                )
                .header("Prefer", "return=representation")
                .json(&serde_json::json!({ "is_featured": true })),
            )
            .await?;
        if rows.is_empty() {
            return Err(Error::not_found("article", article_id));
        }
        Ok(())
    }

    async fn stats(&self) -> Result<SiteStats> {
        let profiles: Vec<CountRow> = self
            .send_json(self.request(Method::GET, "/rest/v1/profiles?select=id,role"))
            .await?;
        let articles: Vec<CountRow> = self
            .send_json(self.request(Method::GET, "/rest/v1/articles?select=id"))
            .await?;
        let editor_count = profiles
            .iter()
            .filter(|row| row.role == Some(Role::Editor))
            .count();
        Ok(SiteStats {
            total_users: profiles.len(),
            total_articles: articles.len(),
            editor_count,
        })
    }
}
