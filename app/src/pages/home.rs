//! Public feed: featured hero plus the filterable article grid.

use newsroom_access::{Backend, Result};
use newsroom_shared::{Article, ArticleListCache};

/// Controller for the landing page. Owns the article snapshot for this
/// page view; filtering re-derives the grid without another fetch.
#[derive(Debug, Default)]
pub struct HomePage {
    cache: ArticleListCache,
    query: String,
    category: Option<String>,
}

/// Render-ready shape of the feed.
#[derive(Debug)]
pub struct FeedView<'a> {
    /// Featured story, rendered as the hero when present. `None` means
    /// the page lays out without a hero, not an error.
    pub hero: Option<&'a Article>,
    pub grid: Vec<&'a Article>,
}

impl HomePage {
    pub async fn load<B: Backend>(backend: &B) -> Result<Self> {
        let articles = backend.list_articles().await?;
        let mut cache = ArticleListCache::new();
        cache.load(articles);
        Ok(Self {
            cache,
            query: String::new(),
            category: None,
        })
    }

    /// Updates the active search/category filter.
    pub fn filter(&mut self, query: &str, category: Option<&str>) {
        self.query = query.to_string();
        self.category = category.map(str::to_string);
    }

    pub fn view(&self) -> FeedView<'_> {
        FeedView {
            hero: self.cache.featured(),
            grid: self.cache.grid(&self.query, self.category.as_deref()),
        }
    }

    /// Refetches the snapshot after a write elsewhere on the site.
    pub async fn reload<B: Backend>(&mut self, backend: &B) -> Result<()> {
        let articles = backend.list_articles().await?;
        self.cache.load(articles);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsroom_access::MemoryBackend;
    use newsroom_shared::NewArticle;

    fn draft(title: &str, category: &str) -> NewArticle {
        NewArticle {
            title: title.to_string(),
            category: category.to_string(),
            content: "body".to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn feed_splits_hero_from_grid() {
        let backend = MemoryBackend::new();
        backend.seed_article(draft("Budget Cuts", "Politics"), false).await;
        let hero = backend.seed_article(draft("Local Fair", "Events"), true).await;

        let page = HomePage::load(&backend).await.expect("load");
        let view = page.view();

        assert_eq!(view.hero.map(|a| a.id.as_str()), Some(hero.id.as_str()));
        assert_eq!(view.grid.len(), 1);
        assert_eq!(view.grid[0].title, "Budget Cuts");
    }

    #[tokio::test]
    async fn filtering_needs_no_refetch() {
        let backend = MemoryBackend::new();
        backend.seed_article(draft("Budget Cuts", "Politics"), false).await;
        backend.seed_article(draft("Local Fair", "Events"), false).await;

        let mut page = HomePage::load(&backend).await.expect("load");

        // A later write does not leak into the loaded snapshot.
        backend.seed_article(draft("Storm Watch", "Weather"), false).await;

        page.filter("fair", Some("All"));
        let view = page.view();
        assert_eq!(view.grid.len(), 1);
        assert_eq!(view.grid[0].title, "Local Fair");

        page.filter("", Some("Politics"));
        assert_eq!(page.view().grid.len(), 1);

        page.filter("", None);
        assert_eq!(page.view().grid.len(), 2);
    }

    #[tokio::test]
    async fn reload_picks_up_new_articles() {
        let backend = MemoryBackend::new();
        let mut page = HomePage::load(&backend).await.expect("load");
        assert!(page.view().grid.is_empty());
        assert!(page.view().hero.is_none());

        backend.seed_article(draft("Fresh", "Events"), false).await;
        page.reload(&backend).await.expect("reload");
        assert_eq!(page.view().grid.len(), 1);
    }
}
