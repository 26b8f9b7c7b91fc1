//! Seeded in-memory backend for `--demo` runs.

use newsroom_access::MemoryBackend;
use newsroom_shared::{NewArticle, Role};

/// A small working site: one admin session, a featured story and a
/// couple of regular articles.
pub async fn seeded() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.sign_in("boss@example.com", Role::Admin).await;

    backend
        .seed_article(
            NewArticle {
                title: "Budget Cuts Hit City Hall".into(),
                category: "Politics".into(),
                content: "The council voted late on Tuesday...".into(),
                image_url: None,
            },
            false,
        )
        .await;
    backend
        .seed_article(
            NewArticle {
                title: "Local Fair Draws Record Crowd".into(),
                category: "Events".into(),
                content: "Organizers counted more visitors than ever...".into(),
                image_url: Some("memory://images/fair.jpg".into()),
            },
            true,
        )
        .await;
    backend
        .seed_article(
            NewArticle {
                title: "Storm Watch This Weekend".into(),
                category: "Weather".into(),
                content: "Forecasters expect heavy rain...".into(),
                image_url: None,
            },
            false,
        )
        .await;

    backend
}
