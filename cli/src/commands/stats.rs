use anyhow::{Context, Result};
use newsroom_access::{Backend, PolicyGate, RemoteBackend};
use newsroom_app::{establish, SessionConfig};
use newsroom_app::pages::AdminPage;

use crate::demo;

pub async fn run(demo_mode: bool) -> Result<()> {
    if demo_mode {
        let gated = PolicyGate::new(demo::seeded().await);
        render(&gated).await
    } else {
        let backend = RemoteBackend::from_env().context("remote backend configuration")?;
        let gated = PolicyGate::new(backend);
        render(&gated).await
    }
}

async fn render<B: Backend>(backend: &B) -> Result<()> {
    let session = establish(backend, &SessionConfig::from_env()).await;
    let page = AdminPage::open(backend, &session)
        .await
        .context("open admin dashboard")?;

    tracing::info!(admin = %page.greeting, "dashboard");
    tracing::info!(
        users = page.stats.total_users,
        articles = page.stats.total_articles,
        editors = page.stats.editor_count,
        "site counters"
    );
    for user in &page.users {
        tracing::info!("  {} -> {}", user.email, user.role);
    }
    Ok(())
}
