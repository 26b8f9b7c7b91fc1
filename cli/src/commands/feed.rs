use anyhow::{Context, Result};
use newsroom_access::{Backend, RemoteBackend};
use newsroom_app::pages::HomePage;

use crate::demo;

pub async fn run(demo_mode: bool, query: &str, category: Option<&str>) -> Result<()> {
    if demo_mode {
        let backend = demo::seeded().await;
        render(&backend, query, category).await
    } else {
        let backend = RemoteBackend::from_env().context("remote backend configuration")?;
        render(&backend, query, category).await
    }
}

async fn render<B: Backend>(backend: &B, query: &str, category: Option<&str>) -> Result<()> {
    let mut page = HomePage::load(backend).await.context("load feed")?;
    page.filter(query, category);
    let view = page.view();

    match view.hero {
        Some(hero) => tracing::info!(id = %hero.id, "FEATURED  {} [{}]", hero.title, hero.category),
        None => tracing::info!("no featured story"),
    }
    for article in &view.grid {
        tracing::info!(id = %article.id, "{} [{}]", article.title, article.category);
    }
    tracing::info!("{} article(s) in grid", view.grid.len());
    Ok(())
}
