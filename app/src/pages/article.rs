//! Single-article page: the story, its comments, and the comment form.

use newsroom_access::Backend;
use newsroom_shared::{Article, Comment, Error, NewComment, RoleSet};

use crate::Session;

/// Controller for one article view. A missing article surfaces as
/// `Error::NotFound` from `load`; the original script silently logged
/// and left a blank page instead.
#[derive(Debug)]
pub struct ArticlePage {
    pub article: Article,
    pub comments: Vec<Comment>,
    /// Comment form is offered to any signed-in visitor.
    pub can_comment: bool,
    /// Delete buttons on comments and the edit shortcut on the article
    /// are drawn for editorial roles. Advisory only: the policy layer
    /// re-checks on every call.
    pub can_moderate: bool,
}

impl ArticlePage {
    pub async fn load<B: Backend>(
        backend: &B,
        session: &Session,
        article_id: &str,
    ) -> Result<Self, Error> {
        let article = backend.get_article(article_id).await?;
        let comments = backend.list_comments(article_id).await?;
        Ok(Self {
            article,
            comments,
            can_comment: session.is_authenticated(),
            can_moderate: session.authorize(RoleSet::EDITORIAL).is_allowed(),
        })
    }

    /// Posts a comment as the session's identity, then refreshes the
    /// thread. On failure the local comment list stays untouched.
    pub async fn submit_comment<B: Backend>(
        &mut self,
        backend: &B,
        session: &Session,
        text: &str,
    ) -> Result<(), Error> {
        let identity = session.identity.as_ref().ok_or(Error::NotAuthenticated)?;
        backend
            .insert_comment(NewComment {
                article_id: self.article.id.clone(),
                author_id: identity.id.clone(),
                author_email: identity.email.clone(),
                content: text.to_string(),
            })
            .await?;
        self.comments = backend.list_comments(&self.article.id).await?;
        Ok(())
    }

    /// Removes a comment (moderation), then refreshes the thread.
    pub async fn delete_comment<B: Backend>(
        &mut self,
        backend: &B,
        comment_id: &str,
    ) -> Result<(), Error> {
        backend.delete_comment(comment_id).await?;
        self.comments = backend.list_comments(&self.article.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::establish;
    use crate::SessionConfig;
    use newsroom_access::{MemoryBackend, PolicyGate};
    use newsroom_shared::{NewArticle, Role};

    fn draft(title: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            category: "Events".to_string(),
            content: "body".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn missing_article_surfaces_not_found() {
        let backend = MemoryBackend::new();
        let session = establish(&backend, &SessionConfig::default()).await;
        let err = ArticlePage::load(&backend, &session, "missing")
            .await
            .expect_err("not found");
        assert!(matches!(err, Error::NotFound { entity: "article", .. }));
    }

    #[tokio::test]
    async fn anonymous_visitor_reads_but_cannot_comment() {
        let backend = MemoryBackend::new();
        let article = backend.seed_article(draft("Open Thread"), false).await;
        let session = establish(&backend, &SessionConfig::default()).await;

        let mut page = ArticlePage::load(&backend, &session, &article.id)
            .await
            .expect("load");
        assert!(!page.can_comment);
        assert!(!page.can_moderate);

        let err = page
            .submit_comment(&backend, &session, "drive-by")
            .await
            .expect_err("deny");
        assert_eq!(err, Error::NotAuthenticated);
        assert!(page.comments.is_empty());
    }

    #[tokio::test]
    async fn comment_submit_appends_and_refreshes_newest_first() {
        let backend = MemoryBackend::new();
        backend.sign_in("reader@example.com", Role::Reader).await;
        let article = backend.seed_article(draft("Open Thread"), false).await;
        let session = establish(&backend, &SessionConfig::default()).await;

        let mut page = ArticlePage::load(&backend, &session, &article.id)
            .await
            .expect("load");
        assert!(page.can_comment);

        page.submit_comment(&backend, &session, "first")
            .await
            .expect("comment");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        page.submit_comment(&backend, &session, "second")
            .await
            .expect("comment");

        assert_eq!(page.comments.len(), 2);
        assert_eq!(page.comments[0].content, "second");
        assert_eq!(page.comments[0].author_email, "reader@example.com");
    }

    #[tokio::test]
    async fn editor_moderates_through_the_policy_layer() {
        let backend = MemoryBackend::new();
        let reader = backend.sign_in("reader@example.com", Role::Reader).await;
        let article = backend.seed_article(draft("Open Thread"), false).await;
        backend
            .insert_comment(NewComment {
                article_id: article.id.clone(),
                author_id: reader.id.clone(),
                author_email: reader.email.clone(),
                content: "spam".into(),
            })
            .await
            .expect("seed comment");
        backend.sign_out().await;
        backend.sign_in("ed@example.com", Role::Editor).await;

        let gated = PolicyGate::new(backend);
        let session = establish(&gated, &SessionConfig::default()).await;
        let mut page = ArticlePage::load(&gated, &session, &article.id)
            .await
            .expect("load");
        assert!(page.can_moderate);

        let comment_id = page.comments[0].id.clone();
        page.delete_comment(&gated, &comment_id).await.expect("delete");
        assert!(page.comments.is_empty());
    }
}
