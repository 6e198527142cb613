//! In-memory content store

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ContentStore;
use crate::culture::CultureInfo;

/// (segment, slug, culture) with every part lower-cased; `""` for none
type ContentKey = (String, String, String);

fn key(segment: &str, slug: &str, culture: Option<&CultureInfo>) -> ContentKey {
    (
        segment.trim_matches('/').to_ascii_lowercase(),
        slug.to_ascii_lowercase(),
        culture
            .map(|c| c.name().to_ascii_lowercase())
            .unwrap_or_default(),
    )
}

/// In-memory content store
///
/// Keeps items in a `BTreeMap`, so listings come back ordered by slug.
/// Non-persistent; meant for tests and small sites.
#[derive(Debug)]
pub struct MemoryContentStore<T> {
    items: Arc<RwLock<BTreeMap<ContentKey, T>>>,
}

impl<T> Clone for MemoryContentStore<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for MemoryContentStore<T> {
    fn default() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

impl<T> MemoryContentStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content`, replacing any previous item under the same key
    pub async fn insert(
        &self,
        segment: &str,
        slug: &str,
        culture: Option<&CultureInfo>,
        content: T,
    ) -> Option<T> {
        self.items
            .write()
            .await
            .insert(key(segment, slug, culture), content)
    }

    pub async fn remove(
        &self,
        segment: &str,
        slug: &str,
        culture: Option<&CultureInfo>,
    ) -> Option<T> {
        self.items
            .write()
            .await
            .remove(&key(segment, slug, culture))
    }

    /// Number of stored items
    pub async fn size(&self) -> usize {
        self.items.read().await.len()
    }
}

#[async_trait]
impl<T> ContentStore for MemoryContentStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Content = T;

    async fn get_content(
        &self,
        segment: &str,
        slug: &str,
        culture: Option<&CultureInfo>,
    ) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.get(&key(segment, slug, culture)).cloned())
    }

    async fn get_contents(&self, segment: &str, culture: Option<&CultureInfo>) -> Result<Vec<T>> {
        let (segment, _, culture) = key(segment, "", culture);
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|((s, _, c), _)| *s == segment && *c == culture)
            .map(|(_, content)| content.clone())
            .collect())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CultureAwareLocator;
    use crate::culture::CultureFallbackChain;
    use pretty_assertions::assert_eq;

    fn culture(tag: &str) -> CultureInfo {
        CultureInfo::parse(tag).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_basic() {
        let store = MemoryContentStore::new();
        let de = culture("de-DE");

        store.insert("/blog/", "Hello-World", Some(&de), "Hallo").await;
        store.insert("blog", "hello-world", None, "Hello").await;

        assert_eq!(
            store.get_content("Blog", "hello-world", Some(&culture("de-de"))).await.unwrap(),
            Some("Hallo")
        );
        assert_eq!(
            store.get_content("blog", "hello-world", None).await.unwrap(),
            Some("Hello")
        );
        assert_eq!(
            store.get_content("blog", "hello-world", Some(&culture("fr"))).await.unwrap(),
            None
        );
        assert_eq!(store.size().await, 2);

        store.remove("blog", "hello-world", None).await;
        assert_eq!(store.size().await, 1);
    }

    #[tokio::test]
    async fn test_memory_store_listing_is_per_culture() {
        let store = MemoryContentStore::new();
        let en = culture("en");

        store.insert("blog", "b-post", Some(&en), "B").await;
        store.insert("blog", "a-post", Some(&en), "A").await;
        store.insert("blog", "c-post", None, "C").await;
        store.insert("news", "d-post", Some(&en), "D").await;

        assert_eq!(store.get_contents("blog", Some(&en)).await.unwrap(), vec!["A", "B"]);
        assert_eq!(store.get_contents("blog", None).await.unwrap(), vec!["C"]);
    }

    #[tokio::test]
    async fn test_locator_walks_fallback_chain() {
        let store = MemoryContentStore::new();
        store.insert("docs", "intro", Some(&culture("de")), "Einleitung").await;
        store.insert("docs", "intro", Some(&culture("en-US")), "Introduction").await;
        store.insert("docs", "faq", None, "FAQ").await;

        let locator = CultureAwareLocator::new(
            Arc::new(store),
            CultureFallbackChain::new(culture("en-US")),
        );

        let found = locator
            .locate("docs", "intro", &culture("de-AT"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.content, "Einleitung");
        assert_eq!(found.culture, Some(culture("de")));

        let found = locator
            .locate("docs", "intro", &culture("fr-FR"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.content, "Introduction");

        let found = locator
            .locate("docs", "faq", &culture("fr-FR"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.culture, None);

        assert!(locator
            .locate("docs", "missing", &culture("en-US"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_locate_all_takes_first_non_empty_listing() {
        let store = MemoryContentStore::new();
        store.insert("news", "one", Some(&culture("en")), 1).await;
        store.insert("news", "two", Some(&culture("en")), 2).await;
        store.insert("news", "three", None, 3).await;

        let locator = CultureAwareLocator::new(
            Arc::new(store),
            CultureFallbackChain::new(culture("en-US")),
        );

        let listing = locator.locate_all("news", &culture("de-DE")).await.unwrap();
        assert_eq!(listing.content, vec![1, 2]);
        assert_eq!(listing.culture, Some(culture("en")));

        let empty = locator.locate_all("events", &culture("de-DE")).await.unwrap();
        assert!(empty.content.is_empty());
        assert_eq!(empty.culture, None);
    }
}
