use anyhow::{bail, Context, Result};
use newsroom_access::{Backend, RemoteBackend};
use newsroom_app::pages::ArticlePage;
use newsroom_app::{establish, SessionConfig};

use crate::demo;

pub async fn run(id: Option<&str>, demo_mode: bool) -> Result<()> {
    if demo_mode {
        let backend = demo::seeded().await;
        let id = match id {
            Some(id) => id.to_string(),
            // Demo ids are generated; default to the newest article.
            None => match backend.list_articles().await?.first() {
                Some(article) => article.id.clone(),
                None => bail!("demo backend has no articles"),
            },
        };
        render(&backend, &id).await
    } else {
        let Some(id) = id else {
            bail!("an article id is required outside demo mode");
        };
        let backend = RemoteBackend::from_env().context("remote backend configuration")?;
        render(&backend, id).await
    }
}

async fn render<B: Backend>(backend: &B, id: &str) -> Result<()> {
    let session = establish(backend, &SessionConfig::from_env()).await;
    let page = ArticlePage::load(backend, &session, id)
        .await
        .context("load article")?;

    tracing::info!(
        id = %page.article.id,
        category = %page.article.category,
        published = %page.article.created_at,
        "{}",
        page.article.title
    );
    tracing::info!("{}", page.article.content);
    for comment in &page.comments {
        tracing::info!("  {}: {}", comment.author_email, comment.content);
    }
    tracing::info!(
        can_comment = page.can_comment,
        can_moderate = page.can_moderate,
        "{} comment(s)",
        page.comments.len()
    );
    Ok(())
}
