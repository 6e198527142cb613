//! Canonical URL generation
//!
//! Every logical resource is advertised under exactly one URL. Whether that
//! URL carries a culture prefix depends on the [`CanonicalPolicy`].

use serde::{Deserialize, Serialize};

use crate::config::CultureConfigurationSnapshot;
use crate::culture::CultureInfo;
use crate::error::ArgumentError;
use crate::pagination::generate_page_url;
use crate::path::normalize_path;
use crate::resolver::ResolvedRoute;

/// When canonical URLs carry a culture prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalPolicy {
    /// Always prefix: `/en-US/blog`
    WithPrefix,
    /// Prefix only cultures whose language differs from the default's
    #[default]
    WithoutPrefix,
}

/// Canonical path for `path` in `culture`
///
/// Under [`CanonicalPolicy::WithoutPrefix`], regional variants sharing the
/// default culture's language (`en-GB` next to default `en-US`) stay
/// unprefixed.
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::canonical::{canonical_path, CanonicalPolicy};
/// use rhtmx_content_router::culture::CultureInfo;
///
/// let en_us = CultureInfo::parse("en-US").unwrap();
/// let de_de = CultureInfo::parse("de-DE").unwrap();
/// let en_gb = CultureInfo::parse("en-GB").unwrap();
///
/// assert_eq!(
///     canonical_path("/blog", &de_de, CanonicalPolicy::WithPrefix, &en_us),
///     "/de-DE/blog"
/// );
/// assert_eq!(
///     canonical_path("/", &de_de, CanonicalPolicy::WithPrefix, &en_us),
///     "/de-DE"
/// );
/// assert_eq!(
///     canonical_path("blog/", &en_gb, CanonicalPolicy::WithoutPrefix, &en_us),
///     "/blog"
/// );
/// assert_eq!(
///     canonical_path("/blog", &de_de, CanonicalPolicy::WithoutPrefix, &en_us),
///     "/de-DE/blog"
/// );
/// ```
pub fn canonical_path(
    path: &str,
    culture: &CultureInfo,
    policy: CanonicalPolicy,
    default_culture: &CultureInfo,
) -> String {
    let normalized = normalize_path(path);

    let prefixed = match policy {
        CanonicalPolicy::WithPrefix => true,
        CanonicalPolicy::WithoutPrefix => !culture.same_language(default_culture),
    };

    if !prefixed {
        return normalized.into_owned();
    }

    match normalized.as_ref() {
        "/" => format!("/{}", culture.name()),
        rest => format!("/{}{}", culture.name(), rest),
    }
}

/// Canonical URL generator bound to a culture configuration
#[derive(Debug, Clone)]
pub struct CanonicalUrlGenerator {
    cultures: CultureConfigurationSnapshot,
}

impl CanonicalUrlGenerator {
    pub fn new(cultures: CultureConfigurationSnapshot) -> Self {
        Self { cultures }
    }

    /// Canonical path for `path` in `culture` under the configured policy
    pub fn generate(&self, path: &str, culture: &CultureInfo) -> String {
        canonical_path(
            path,
            culture,
            self.cultures.canonical_policy,
            &self.cultures.default_culture,
        )
    }

    /// Canonical URL of a resolved request, including its page suffix
    ///
    /// Uses the route's configured pattern, so `/Blog/` and `/blog` share
    /// one canonical form.
    pub fn for_resolved(&self, resolved: &ResolvedRoute) -> Result<String, ArgumentError> {
        let path = match &resolved.route.pagination {
            Some(settings) => generate_page_url(&resolved.route.pattern, resolved.page, settings)?,
            None => resolved.route.pattern.clone(),
        };
        Ok(self.generate(&path, &resolved.culture))
    }

    /// One canonical URL per supported culture, for `hreflang` alternates
    ///
    /// Cultures whose canonical URL equals an earlier culture's are skipped
    /// so each URL is listed once.
    pub fn alternates(&self, path: &str) -> Vec<(CultureInfo, String)> {
        let mut alternates: Vec<(CultureInfo, String)> = Vec::new();

        let ordered = std::iter::once(&self.cultures.default_culture).chain(
            self.cultures
                .supported_cultures
                .iter()
                .filter(|c| *c != &self.cultures.default_culture),
        );

        for culture in ordered {
            let url = self.generate(path, culture);
            if !alternates.iter().any(|(_, existing)| existing == &url) {
                alternates.push((culture.clone(), url));
            }
        }
        alternates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::culture::CultureCatalog;
    use crate::pagination::PaginationSettings;
    use crate::registry::RouteDefinition;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn culture(tag: &str) -> CultureInfo {
        CultureInfo::parse(tag).unwrap()
    }

    fn cultures(policy: CanonicalPolicy) -> CultureConfigurationSnapshot {
        CultureConfigurationSnapshot {
            default_culture: culture("en-US"),
            canonical_policy: policy,
            supported_cultures: CultureCatalog::from_tags(["en-US", "en-GB", "de-DE"]).unwrap(),
        }
    }

    #[rstest]
    #[case("en-US")]
    #[case("en-GB")]
    #[case("en")]
    fn test_same_language_is_unprefixed(#[case] tag: &str) {
        let default = culture("en-US");
        assert_eq!(
            canonical_path("/docs/intro", &culture(tag), CanonicalPolicy::WithoutPrefix, &default),
            "/docs/intro"
        );
    }

    #[rstest]
    #[case("de-DE", "/de-DE/docs/intro")]
    #[case("fr", "/fr/docs/intro")]
    fn test_other_language_is_prefixed(#[case] tag: &str, #[case] expected: &str) {
        let default = culture("en-US");
        assert_eq!(
            canonical_path("/docs/intro/", &culture(tag), CanonicalPolicy::WithoutPrefix, &default),
            expected
        );
    }

    #[test]
    fn test_with_prefix_always_prefixes() {
        let default = culture("en-US");
        assert_eq!(
            canonical_path("/blog", &default, CanonicalPolicy::WithPrefix, &default),
            "/en-US/blog"
        );
        assert_eq!(
            canonical_path("", &culture("en-GB"), CanonicalPolicy::WithPrefix, &default),
            "/en-GB"
        );
    }

    #[test]
    fn test_for_resolved_includes_page_suffix() {
        let generator = CanonicalUrlGenerator::new(cultures(CanonicalPolicy::WithPrefix));
        let route = RouteDefinition::new("/blog", "BlogIndex")
            .with_pagination(PaginationSettings::prefixed(10, "page").unwrap());
        let resolved = ResolvedRoute {
            route,
            culture: culture("de-DE"),
            page: 3,
            culture_prefixed: true,
            path: "/blog/page-3".to_string(),
        };
        assert_eq!(generator.for_resolved(&resolved).unwrap(), "/de-DE/blog/page-3");
    }

    #[test]
    fn test_alternates_skip_equivalent_urls() {
        let generator = CanonicalUrlGenerator::new(cultures(CanonicalPolicy::WithoutPrefix));
        let alternates: Vec<(String, String)> = generator
            .alternates("/blog")
            .into_iter()
            .map(|(c, url)| (c.name().to_string(), url))
            .collect();
        assert_eq!(
            alternates,
            vec![
                ("en-US".to_string(), "/blog".to_string()),
                ("de-DE".to_string(), "/de-DE/blog".to_string()),
            ]
        );
    }

    #[test]
    fn test_alternates_with_prefix_lists_every_culture() {
        let generator = CanonicalUrlGenerator::new(cultures(CanonicalPolicy::WithPrefix));
        assert_eq!(generator.alternates("/").len(), 3);
    }
}
