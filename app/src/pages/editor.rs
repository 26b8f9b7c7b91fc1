//! Editor form: create a new article or update an existing one.

use newsroom_access::Backend;
use newsroom_shared::{Article, ArticlePatch, NewArticle, RoleSet};

use crate::{PageError, Session};

/// What the form submits for the article image.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Use an already-hosted URL as-is.
    Url(String),
    /// Raw bytes to upload before the article write.
    Upload { bytes: Vec<u8>, filename: String },
    None,
}

/// Form fields as the editor typed them.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub title: String,
    pub category: String,
    pub content: String,
    pub image: ImageSource,
}

/// Controller for the editor page. Gated to editors and admins at open
/// time; every submit is additionally checked by the policy layer.
#[derive(Debug)]
pub struct EditorPage {
    /// Loaded when the page was opened with `?edit=<id>`.
    pub existing: Option<Article>,
}

impl EditorPage {
    pub async fn open<B: Backend>(
        backend: &B,
        session: &Session,
        edit_id: Option<&str>,
    ) -> Result<Self, PageError> {
        session.require(RoleSet::EDITORIAL)?;
        let existing = match edit_id {
            Some(id) => Some(backend.get_article(id).await?),
            None => None,
        };
        Ok(Self { existing })
    }

    /// Publishes the draft: upload the image first when bytes were
    /// supplied, then insert or update. A failed upload aborts the whole
    /// submit; no article row is written for it.
    pub async fn submit<B: Backend>(
        &mut self,
        backend: &B,
        draft: ArticleDraft,
    ) -> Result<Article, PageError> {
        let image_url = match draft.image {
            ImageSource::Url(url) => Some(url),
            ImageSource::Upload { bytes, filename } => {
                Some(backend.upload_image(bytes, &filename).await?)
            }
            ImageSource::None => None,
        };

        let article = match &self.existing {
            Some(existing) => {
                backend
                    .update_article(
                        &existing.id,
                        ArticlePatch {
                            title: Some(draft.title),
                            category: Some(draft.category),
                            content: Some(draft.content),
                            image_url,
                        },
                    )
                    .await?
            }
            None => {
                backend
                    .insert_article(NewArticle {
                        title: draft.title,
                        category: draft.category,
                        content: draft.content,
                        image_url,
                    })
                    .await?
            }
        };

        tracing::info!(article = %article.id, title = %article.title, "article published");
        self.existing = Some(article.clone());
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::establish;
    use crate::{Redirect, SessionConfig};
    use newsroom_access::{MemoryBackend, PolicyGate};
    use newsroom_shared::Role;

    fn draft(title: &str, image: ImageSource) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            category: "Politics".to_string(),
            content: "body".to_string(),
            image,
        }
    }

    #[tokio::test]
    async fn anonymous_visitor_is_sent_to_login() {
        let backend = MemoryBackend::new();
        let session = establish(&backend, &SessionConfig::default()).await;
        let err = EditorPage::open(&backend, &session, None)
            .await
            .expect_err("deny");
        assert_eq!(err, PageError::Denied(Redirect::Login));
    }

    #[tokio::test]
    async fn reader_is_sent_home() {
        let backend = MemoryBackend::new();
        backend.sign_in("reader@example.com", Role::Reader).await;
        let session = establish(&backend, &SessionConfig::default()).await;
        let err = EditorPage::open(&backend, &session, None)
            .await
            .expect_err("deny");
        assert_eq!(err, PageError::Denied(Redirect::Home));
    }

    #[tokio::test]
    async fn editor_creates_then_updates_an_article() {
        let backend = MemoryBackend::new();
        backend.sign_in("ed@example.com", Role::Editor).await;
        let gated = PolicyGate::new(backend);
        let session = establish(&gated, &SessionConfig::default()).await;

        let mut page = EditorPage::open(&gated, &session, None).await.expect("open");
        let article = page
            .submit(&gated, draft("Draft Title", ImageSource::None))
            .await
            .expect("publish");
        assert_eq!(article.title, "Draft Title");

        // Reopen in edit mode and change the title.
        let mut page = EditorPage::open(&gated, &session, Some(&article.id))
            .await
            .expect("open edit");
        let updated = page
            .submit(&gated, draft("Final Title", ImageSource::None))
            .await
            .expect("update");
        assert_eq!(updated.id, article.id);
        assert_eq!(updated.title, "Final Title");
    }

    #[tokio::test]
    async fn uploaded_image_lands_in_the_article() {
        let backend = MemoryBackend::new();
        backend.sign_in("ed@example.com", Role::Editor).await;
        let gated = PolicyGate::new(backend);
        let session = establish(&gated, &SessionConfig::default()).await;

        let mut page = EditorPage::open(&gated, &session, None).await.expect("open");
        let article = page
            .submit(
                &gated,
                draft(
                    "Illustrated",
                    ImageSource::Upload {
                        bytes: vec![0xFF, 0xD8],
                        filename: "hero.jpg".into(),
                    },
                ),
            )
            .await
            .expect("publish");

        assert_eq!(
            article.image_url.as_deref(),
            Some("memory://images/hero.jpg")
        );
    }

    #[tokio::test]
    async fn failed_upload_writes_no_article() {
        let backend = MemoryBackend::new();
        backend.sign_in("ed@example.com", Role::Editor).await;
        let gated = PolicyGate::new(backend);
        let session = establish(&gated, &SessionConfig::default()).await;

        let mut page = EditorPage::open(&gated, &session, None).await.expect("open");
        // Empty bytes: the memory backend refuses the upload.
        let err = page
            .submit(
                &gated,
                draft(
                    "Broken",
                    ImageSource::Upload {
                        bytes: Vec::new(),
                        filename: "empty.jpg".into(),
                    },
                ),
            )
            .await
            .expect_err("upload failure");
        assert!(matches!(err, PageError::Backend(_)));
        assert!(gated.list_articles().await.expect("list").is_empty());
    }
}
