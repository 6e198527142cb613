//! Culture (locale) descriptors, the supported-culture catalog and the
//! fallback chain.
//!
//! Cultures are explicit values: a descriptor carries its own name,
//! language code and neutral form, so nothing here consults the host's
//! locale database. [`CultureInfo::parse`] derives the descriptor from a
//! BCP-47 style tag; hosts with unusual parent relationships can build one
//! with [`CultureInfo::new`] instead.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;

pub mod fallback;

pub use fallback::CultureFallbackChain;

// language[-Script][-REGION|-variant]*
static CULTURE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}(-[A-Za-z0-9]{2,8})*$").unwrap());

/// A culture descriptor
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::culture::CultureInfo;
///
/// let culture = CultureInfo::parse("de-de").unwrap();
/// assert_eq!(culture.name(), "de-DE");
/// assert_eq!(culture.language(), "de");
/// assert_eq!(culture.neutral(), "de");
/// assert!(!culture.is_neutral());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CultureInfo {
    name: String,
    language: String,
    neutral: String,
}

impl CultureInfo {
    /// Builds a descriptor from explicit parts
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        neutral: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            neutral: neutral.into(),
        }
    }

    /// Parses a culture tag such as `en`, `de-DE` or `zh-Hant-TW`
    ///
    /// Casing is canonicalized: language lower-case, four-letter script
    /// title-case, region upper-case. The neutral form keeps the language and
    /// script (`zh-Hant` for `zh-Hant-TW`).
    pub fn parse(tag: &str) -> Result<Self, ConfigError> {
        let tag = tag.trim();
        if !CULTURE_TAG.is_match(tag) {
            return Err(ConfigError::InvalidCulture(tag.to_string()));
        }

        let mut subtags = tag.split('-');
        let language = subtags
            .next()
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| ConfigError::InvalidCulture(tag.to_string()))?;

        let mut neutral = language.clone();
        let mut name = language.clone();

        for (idx, subtag) in subtags.enumerate() {
            let canonical = canonical_subtag(subtag);
            if idx == 0 && is_script(subtag) {
                neutral.push('-');
                neutral.push_str(&canonical);
            }
            name.push('-');
            name.push_str(&canonical);
        }

        Ok(Self {
            name,
            language,
            neutral,
        })
    }

    /// Full culture name (`de-DE`)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Two- or three-letter language code (`de`)
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Neutral culture name (`de`)
    pub fn neutral(&self) -> &str {
        &self.neutral
    }

    /// Whether this culture carries no region
    pub fn is_neutral(&self) -> bool {
        self.name.eq_ignore_ascii_case(&self.neutral)
    }

    /// Descriptor for this culture's neutral form
    pub fn neutral_culture(&self) -> CultureInfo {
        if self.is_neutral() {
            return self.clone();
        }
        CultureInfo::new(self.neutral.clone(), self.language.clone(), self.neutral.clone())
    }

    /// Case-insensitive name comparison
    pub fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Whether both cultures share a language code
    pub fn same_language(&self, other: &CultureInfo) -> bool {
        self.language.eq_ignore_ascii_case(&other.language)
    }
}

impl fmt::Display for CultureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for CultureInfo {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn is_script(subtag: &str) -> bool {
    subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic())
}

fn canonical_subtag(subtag: &str) -> String {
    match subtag.len() {
        4 if is_script(subtag) => {
            let lower = subtag.to_ascii_lowercase();
            let mut chars = lower.chars();
            chars
                .next()
                .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default()
        }
        2 | 3 => subtag.to_ascii_uppercase(),
        _ => subtag.to_ascii_lowercase(),
    }
}

/// Finite set of supported cultures, sorted alphabetically by name
///
/// ```
/// use rhtmx_content_router::culture::CultureCatalog;
///
/// let catalog = CultureCatalog::from_tags(["fr-FR", "en-US", "de-DE", "en-us"]).unwrap();
/// let names: Vec<&str> = catalog.iter().map(|c| c.name()).collect();
/// assert_eq!(names, vec!["de-DE", "en-US", "fr-FR"]);
/// assert_eq!(catalog.find("EN-us").map(|c| c.name()), Some("en-US"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CultureCatalog {
    cultures: Vec<CultureInfo>,
}

impl CultureCatalog {
    /// Builds a catalog from descriptors, deduplicating by name (first wins)
    pub fn new<I>(cultures: I) -> Self
    where
        I: IntoIterator<Item = CultureInfo>,
    {
        let mut unique: Vec<CultureInfo> = Vec::new();
        for culture in cultures {
            if !unique.iter().any(|c| c.matches(culture.name())) {
                unique.push(culture);
            }
        }
        unique.sort_by(|a, b| a.name().cmp(b.name()));
        Self { cultures: unique }
    }

    /// Parses each tag and builds a catalog
    pub fn from_tags<I, S>(tags: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cultures = tags
            .into_iter()
            .map(|tag| CultureInfo::parse(tag.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(cultures))
    }

    /// Case-insensitive lookup by full name
    pub fn find(&self, name: &str) -> Option<&CultureInfo> {
        self.cultures.iter().find(|c| c.matches(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CultureInfo> {
        self.cultures.iter()
    }

    pub fn len(&self) -> usize {
        self.cultures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cultures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", "en", "en", "en")]
    #[case("en-us", "en-US", "en", "en")]
    #[case("DE-de", "de-DE", "de", "de")]
    #[case("zh-hant-tw", "zh-Hant-TW", "zh", "zh-Hant")]
    #[case("es-419", "es-419", "es", "es")]
    fn test_parse_culture(
        #[case] tag: &str,
        #[case] name: &str,
        #[case] language: &str,
        #[case] neutral: &str,
    ) {
        let culture = CultureInfo::parse(tag).unwrap();
        assert_eq!(culture.name(), name);
        assert_eq!(culture.language(), language);
        assert_eq!(culture.neutral(), neutral);
    }

    #[rstest]
    #[case("")]
    #[case("e")]
    #[case("english-")]
    #[case("en_US")]
    #[case("-en")]
    fn test_parse_rejects_malformed(#[case] tag: &str) {
        assert!(matches!(
            CultureInfo::parse(tag),
            Err(ConfigError::InvalidCulture(_))
        ));
    }

    #[test]
    fn test_neutral_culture() {
        let de = CultureInfo::parse("de-AT").unwrap();
        let neutral = de.neutral_culture();
        assert_eq!(neutral.name(), "de");
        assert!(neutral.is_neutral());
        assert_eq!(neutral.neutral_culture(), neutral);
    }

    #[test]
    fn test_same_language() {
        let gb = CultureInfo::parse("en-GB").unwrap();
        let us = CultureInfo::parse("en-US").unwrap();
        let de = CultureInfo::parse("de-DE").unwrap();
        assert!(gb.same_language(&us));
        assert!(!gb.same_language(&de));
    }

    #[test]
    fn test_explicit_descriptor() {
        let custom = CultureInfo::new("sr-Latn", "sr", "sr-Latn");
        assert!(custom.is_neutral());
        assert_eq!(custom.to_string(), "sr-Latn");
    }

    #[test]
    fn test_catalog_dedup_and_order() {
        let catalog = CultureCatalog::from_tags(["nl", "de-DE", "nl"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().map(|c| c.name()), Some("de-DE"));
        assert!(catalog.contains("NL"));
        assert!(!catalog.contains("fr"));
    }
}
