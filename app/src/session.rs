//! Per-page-load session establishment.
//!
//! The sequence is `Start -> ResolvingSession -> {Authenticated,
//! Anonymous} -> ResolvingRole -> Decided`. There are no retries: a
//! failed or timed-out lookup degrades to the anonymous session, and the
//! gate then answers `Deny(NotAuthenticated)` for anything protected.
//! Safe denial beats an ambiguous allow.

use std::{env, time::Duration};

use newsroom_access::Backend;
use newsroom_shared::{authorize, Decision, DenyReason, Identity, Role, RoleSet};
use tokio::time::timeout;

use crate::Redirect;

const DEFAULT_LOOKUP_TIMEOUT_SECONDS: u64 = 10;

/// Bounds on the session and role lookups.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub lookup_timeout: Duration,
}

impl SessionConfig {
    /// Reads `NEWSROOM_LOOKUP_TIMEOUT_SECONDS`, defaulting to 10.
    pub fn from_env() -> Self {
        let seconds = env::var("NEWSROOM_LOOKUP_TIMEOUT_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_LOOKUP_TIMEOUT_SECONDS)
            .max(1);
        Self {
            lookup_timeout: Duration::from_secs(seconds),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECONDS),
        }
    }
}

/// The resolved caller for one page view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Option<Identity>,
    pub role: Role,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            role: Role::Reader,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Gate decision for this session against a required set.
    pub fn authorize(&self, required: RoleSet) -> Decision {
        authorize(self.role, self.is_authenticated(), required)
    }

    /// Convenience for protected pages: `Ok(())` or the redirect the
    /// deny reason maps to.
    pub fn require(&self, required: RoleSet) -> Result<(), Redirect> {
        match self.authorize(required) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => Err(redirect_for(reason)),
        }
    }
}

/// Where each deny reason sends the visitor: unauthenticated callers go
/// to the login page, signed-in callers without the role go home.
pub fn redirect_for(reason: DenyReason) -> Redirect {
    match reason {
        DenyReason::NotAuthenticated => Redirect::Login,
        DenyReason::InsufficientRole => Redirect::Home,
    }
}

/// Runs the session-to-role resolution once, bounded by the configured
/// timeout per lookup.
pub async fn establish<B: Backend>(backend: &B, config: &SessionConfig) -> Session {
    let identity = match timeout(config.lookup_timeout, backend.current_identity()).await {
        Ok(Ok(Some(identity))) => identity,
        Ok(Ok(None)) => return Session::anonymous(),
        Ok(Err(error)) => {
            tracing::warn!(%error, "session lookup failed, continuing as anonymous");
            return Session::anonymous();
        }
        Err(_) => {
            tracing::warn!("session lookup timed out, continuing as anonymous");
            return Session::anonymous();
        }
    };

    let role = match timeout(config.lookup_timeout, backend.role_record(&identity.id)).await {
        Ok(Ok(record)) => Role::resolve(record.as_ref()),
        Ok(Err(error)) => {
            tracing::warn!(%error, "role lookup failed, continuing as anonymous");
            return Session::anonymous();
        }
        Err(_) => {
            tracing::warn!("role lookup timed out, continuing as anonymous");
            return Session::anonymous();
        }
    };

    tracing::debug!(user = %identity.email, %role, "session established");
    Session {
        identity: Some(identity),
        role,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use newsroom_access::{MemoryBackend, Result};
    use newsroom_shared::{
        Article, ArticlePatch, Comment, Error, NewArticle, NewComment, RoleRecord, SiteStats,
    };

    #[tokio::test]
    async fn anonymous_backend_yields_reader_session() {
        let backend = MemoryBackend::new();
        let session = establish(&backend, &SessionConfig::default()).await;
        assert_eq!(session, Session::anonymous());
        assert_eq!(
            session.authorize(RoleSet::ADMIN_ONLY),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn signed_in_editor_resolves_and_passes_editorial_gate() {
        let backend = MemoryBackend::new();
        backend.sign_in("ed@example.com", Role::Editor).await;
        let session = establish(&backend, &SessionConfig::default()).await;

        assert_eq!(session.role, Role::Editor);
        assert_eq!(session.authorize(RoleSet::EDITORIAL), Decision::Allow);
        assert_eq!(session.require(RoleSet::ADMIN_ONLY), Err(Redirect::Home));
    }

    #[tokio::test]
    async fn missing_profile_defaults_to_reader_not_denial() {
        let backend = MemoryBackend::new();
        backend.sign_in_without_profile("ghost@example.com").await;
        let session = establish(&backend, &SessionConfig::default()).await;

        assert!(session.is_authenticated());
        assert_eq!(session.role, Role::Reader);
        assert_eq!(
            session.authorize(RoleSet::EDITORIAL),
            Decision::Deny(DenyReason::InsufficientRole)
        );
    }

    /// Backend whose session lookup never answers.
    struct HungBackend;

    #[async_trait]
    impl Backend for HungBackend {
        async fn current_identity(&self) -> Result<Option<Identity>> {
            std::future::pending().await
        }
        async fn role_record(&self, _identity_id: &str) -> Result<Option<RoleRecord>> {
            Err(Error::remote("unused"))
        }
        async fn list_articles(&self) -> Result<Vec<Article>> {
            Err(Error::remote("unused"))
        }
        async fn get_article(&self, id: &str) -> Result<Article> {
            Err(Error::not_found("article", id))
        }
        async fn insert_article(&self, _fields: NewArticle) -> Result<Article> {
            Err(Error::remote("unused"))
        }
        async fn update_article(&self, _id: &str, _patch: ArticlePatch) -> Result<Article> {
            Err(Error::remote("unused"))
        }
        async fn delete_article(&self, _id: &str) -> Result<()> {
            Err(Error::remote("unused"))
        }
        async fn list_comments(&self, _article_id: &str) -> Result<Vec<Comment>> {
            Err(Error::remote("unused"))
        }
        async fn insert_comment(&self, _fields: NewComment) -> Result<Comment> {
            Err(Error::remote("unused"))
        }
        async fn delete_comment(&self, _id: &str) -> Result<()> {
            Err(Error::remote("unused"))
        }
        async fn upload_image(&self, _bytes: Vec<u8>, _filename: &str) -> Result<String> {
            Err(Error::remote("unused"))
        }
        async fn list_profiles(&self) -> Result<Vec<RoleRecord>> {
            Err(Error::remote("unused"))
        }
        async fn set_role(&self, _identity_id: &str, _role: Role) -> Result<()> {
            Err(Error::remote("unused"))
        }
        async fn set_featured(&self, _article_id: &str) -> Result<()> {
            Err(Error::remote("unused"))
        }
        async fn stats(&self) -> Result<SiteStats> {
            Err(Error::remote("unused"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_session_lookup_times_out_to_anonymous() {
        let session = establish(&HungBackend, &SessionConfig::default()).await;
        assert_eq!(session, Session::anonymous());
        assert_eq!(
            session.authorize(RoleSet::EDITORIAL),
            Decision::Deny(DenyReason::NotAuthenticated)
        );
    }
}
