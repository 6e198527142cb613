//! Content lookup behind a resolved route
//!
//! The router never reads content itself. Hosts plug a [`ContentStore`] in,
//! and [`CultureAwareLocator`] walks the culture fallback chain against it
//! until something is found.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use crate::culture::{CultureFallbackChain, CultureInfo};

pub mod memory;

pub use memory::MemoryContentStore;

/// Trait for content backends
///
/// `culture = None` addresses culture-agnostic content.
#[async_trait]
pub trait ContentStore: Send + Sync {
    type Content: Send + Sync;

    /// Get one item by segment path and slug
    async fn get_content(
        &self,
        segment: &str,
        slug: &str,
        culture: Option<&CultureInfo>,
    ) -> Result<Option<Self::Content>>;

    /// Get every item of a segment
    async fn get_contents(
        &self,
        segment: &str,
        culture: Option<&CultureInfo>,
    ) -> Result<Vec<Self::Content>>;

    /// Get storage backend name
    fn name(&self) -> &'static str;
}

/// Content together with the culture it was found under
#[derive(Debug, Clone, PartialEq)]
pub struct Located<T> {
    pub content: T,
    /// `None` when only culture-agnostic content matched
    pub culture: Option<CultureInfo>,
}

/// Looks content up along the culture fallback chain
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rhtmx_content_router::content::{CultureAwareLocator, MemoryContentStore};
/// use rhtmx_content_router::culture::{CultureFallbackChain, CultureInfo};
///
/// # #[tokio::main]
/// # async fn main() {
/// let en = CultureInfo::parse("en").unwrap();
/// let store = MemoryContentStore::new();
/// store.insert("blog", "hello-world", Some(&en), "Hello!").await;
///
/// let locator = CultureAwareLocator::new(
///     Arc::new(store),
///     CultureFallbackChain::new(CultureInfo::parse("en-US").unwrap()),
/// );
///
/// let found = locator
///     .locate("blog", "hello-world", &CultureInfo::parse("de-DE").unwrap())
///     .await
///     .unwrap()
///     .unwrap();
/// assert_eq!(found.content, "Hello!");
/// assert_eq!(found.culture.map(|c| c.name().to_string()), Some("en".to_string()));
/// # }
/// ```
pub struct CultureAwareLocator<S: ContentStore> {
    store: Arc<S>,
    fallback: CultureFallbackChain,
}

impl<S: ContentStore> CultureAwareLocator<S> {
    pub fn new(store: Arc<S>, fallback: CultureFallbackChain) -> Self {
        Self { store, fallback }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// First item found for `requested`, walking the fallback chain
    pub async fn locate(
        &self,
        segment: &str,
        slug: &str,
        requested: &CultureInfo,
    ) -> Result<Option<Located<S::Content>>> {
        for culture in self.fallback.fallback_chain(requested) {
            if let Some(content) = self
                .store
                .get_content(segment, slug, culture.as_ref())
                .await?
            {
                debug!(
                    store = self.store.name(),
                    segment,
                    slug,
                    culture = culture.as_ref().map(CultureInfo::name).unwrap_or("*"),
                    "content located"
                );
                return Ok(Some(Located { content, culture }));
            }
        }

        debug!(store = self.store.name(), segment, slug, "content not found");
        Ok(None)
    }

    /// First non-empty listing for `requested`, walking the fallback chain
    ///
    /// Listings are not merged across cultures.
    pub async fn locate_all(
        &self,
        segment: &str,
        requested: &CultureInfo,
    ) -> Result<Located<Vec<S::Content>>> {
        for culture in self.fallback.fallback_chain(requested) {
            let contents = self.store.get_contents(segment, culture.as_ref()).await?;
            if !contents.is_empty() {
                return Ok(Located {
                    content: contents,
                    culture,
                });
            }
        }

        Ok(Located {
            content: Vec::new(),
            culture: None,
        })
    }
}
