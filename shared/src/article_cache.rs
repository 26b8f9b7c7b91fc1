//! Client-held article snapshot for instant filtering.
//!
//! one page view owns one cache; every write path on the site reloads it
//! wholesale instead of patching it in place, trading freshness for
//! simplicity.

use crate::Article;

/// Category sentinel meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All";

/// Snapshot of the article list fetched for the current page view.
///
/// Ordering is caller-supplied (the feed fetch orders by creation time
/// descending) and preserved by every derived view.
#[derive(Debug, Clone, Default)]
pub struct ArticleListCache {
    items: Vec<Article>,
}

impl ArticleListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the snapshot wholesale.
    pub fn load(&mut self, items: Vec<Article>) {
        self.items = items;
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Articles whose title contains `query` case-insensitively AND whose
    /// category equals `category` (unless `None` or the "All" sentinel).
    /// Empty query matches everything. Stable relative order.
    pub fn filter(&self, query: &str, category: Option<&str>) -> Vec<&Article> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|article| {
                let title_match =
                    needle.is_empty() || article.title.to_lowercase().contains(&needle);
                let category_match = match category {
                    None => true,
                    Some(ALL_CATEGORIES) => true,
                    Some(wanted) => article.category == wanted,
                };
                title_match && category_match
            })
            .collect()
    }

    /// First featured article, if any. Zero featured items is a valid
    /// state; callers must render the no-hero layout explicitly.
    pub fn featured(&self) -> Option<&Article> {
        self.items.iter().find(|article| article.featured)
    }

    /// Grid view for the feed page: the filtered list minus the featured
    /// hero, which is rendered separately when present.
    pub fn grid(&self, query: &str, category: Option<&str>) -> Vec<&Article> {
        let hero_id = self.featured().map(|a| a.id.as_str());
        self.filter(query, category)
            .into_iter()
            .filter(|article| Some(article.id.as_str()) != hero_id)
            .collect()
    }
}
