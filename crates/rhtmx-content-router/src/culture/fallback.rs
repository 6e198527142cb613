/// Culture fallback chain
///
/// For a requested culture and a configured default, yields the ordered list
/// of cultures to try when looking up content:
///
/// 1. the requested culture
/// 2. its neutral form
/// 3. the default culture
/// 4. the default culture's neutral form
/// 5. `None`: culture-agnostic content
///
/// Entries are deduplicated by first occurrence, so the chain is never empty
/// and always ends in `None`.
use super::CultureInfo;

/// Fallback chain bound to a default culture
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::culture::{CultureFallbackChain, CultureInfo};
///
/// let chain = CultureFallbackChain::new(CultureInfo::parse("en-US").unwrap());
/// let requested = CultureInfo::parse("de-DE").unwrap();
///
/// let names: Vec<Option<String>> = chain
///     .fallback_chain(&requested)
///     .into_iter()
///     .map(|c| c.map(|c| c.name().to_string()))
///     .collect();
///
/// assert_eq!(
///     names,
///     vec![
///         Some("de-DE".to_string()),
///         Some("de".to_string()),
///         Some("en-US".to_string()),
///         Some("en".to_string()),
///         None,
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureFallbackChain {
    default_culture: CultureInfo,
}

impl CultureFallbackChain {
    pub fn new(default_culture: CultureInfo) -> Self {
        Self { default_culture }
    }

    pub fn default_culture(&self) -> &CultureInfo {
        &self.default_culture
    }

    /// Ordered, deduplicated candidates ending in `None`
    pub fn fallback_chain(&self, requested: &CultureInfo) -> Vec<Option<CultureInfo>> {
        let candidates = [
            requested.clone(),
            requested.neutral_culture(),
            self.default_culture.clone(),
            self.default_culture.neutral_culture(),
        ];

        let mut chain: Vec<Option<CultureInfo>> = Vec::with_capacity(candidates.len() + 1);
        for candidate in candidates {
            let seen = chain
                .iter()
                .flatten()
                .any(|existing| existing.matches(candidate.name()));
            if !seen {
                chain.push(Some(candidate));
            }
        }
        chain.push(None);
        chain
    }

    /// The same chain as file-name suffixes (`.de-DE`, `.de`, …, `""`)
    ///
    /// ```
    /// use rhtmx_content_router::culture::{CultureFallbackChain, CultureInfo};
    ///
    /// let chain = CultureFallbackChain::new(CultureInfo::parse("en").unwrap());
    /// let suffixes = chain.culture_suffixes(&CultureInfo::parse("fr-CA").unwrap());
    /// assert_eq!(suffixes, vec![".fr-CA", ".fr", ".en", ""]);
    /// ```
    pub fn culture_suffixes(&self, requested: &CultureInfo) -> Vec<String> {
        self.fallback_chain(requested)
            .into_iter()
            .map(|culture| match culture {
                Some(culture) => format!(".{}", culture.name()),
                None => String::new(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn culture(tag: &str) -> CultureInfo {
        CultureInfo::parse(tag).unwrap()
    }

    fn names(chain: &[Option<CultureInfo>]) -> Vec<Option<&str>> {
        chain.iter().map(|c| c.as_ref().map(|c| c.name())).collect()
    }

    #[test]
    fn test_regional_request_with_regional_default() {
        let chain = CultureFallbackChain::new(culture("en-US"));
        assert_eq!(
            names(&chain.fallback_chain(&culture("de-DE"))),
            vec![Some("de-DE"), Some("de"), Some("en-US"), Some("en"), None]
        );
    }

    #[test]
    fn test_request_equal_to_default() {
        let chain = CultureFallbackChain::new(culture("en-US"));
        assert_eq!(
            names(&chain.fallback_chain(&culture("en-US"))),
            vec![Some("en-US"), Some("en"), None]
        );
    }

    #[test]
    fn test_sibling_region_shares_neutral() {
        let chain = CultureFallbackChain::new(culture("en-US"));
        assert_eq!(
            names(&chain.fallback_chain(&culture("en-GB"))),
            vec![Some("en-GB"), Some("en"), Some("en-US"), None]
        );
    }

    #[test]
    fn test_neutral_request_and_neutral_default() {
        let chain = CultureFallbackChain::new(culture("en"));
        assert_eq!(
            names(&chain.fallback_chain(&culture("fr"))),
            vec![Some("fr"), Some("en"), None]
        );
    }

    #[rstest]
    #[case("de-DE", "en-US")]
    #[case("en", "en")]
    #[case("zh-Hant-TW", "zh-Hans-CN")]
    #[case("pt-BR", "pt")]
    fn test_chain_totality(#[case] requested: &str, #[case] default: &str) {
        let chain = CultureFallbackChain::new(culture(default)).fallback_chain(&culture(requested));

        assert!(!chain.is_empty());
        assert_eq!(chain.last(), Some(&None));
        assert_eq!(chain.iter().filter(|c| c.is_none()).count(), 1);

        let named: Vec<String> = chain
            .iter()
            .flatten()
            .map(|c| c.name().to_ascii_lowercase())
            .collect();
        let mut deduped = named.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(named.len(), deduped.len());
    }

    #[test]
    fn test_suffixes_mirror_chain() {
        let chain = CultureFallbackChain::new(culture("en-US"));
        assert_eq!(
            chain.culture_suffixes(&culture("de-DE")),
            vec![".de-DE", ".de", ".en-US", ".en", ""]
        );
    }
}
