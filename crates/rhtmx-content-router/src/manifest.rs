//! TOML routing manifest
//!
//! Declares the same tree as [`RoutingConfigurationBuilder`] in a file:
//!
//! ```toml
//! [root]
//! index_component = "HomePage"
//!
//! [cultures]
//! default = "en-US"
//! supported = ["en-US", "de-DE"]
//! canonical_policy = "without-prefix"
//!
//! [[segments]]
//! name = "blog"
//! index_component = "BlogIndex"
//! page_component = "BlogPost"
//! pagination = { page_size = 10, format = "prefixed", prefix = "page" }
//!
//!   [[segments.pages]]
//!   slug = "hello-world"
//! ```
//!
//! A manifest is only a description; every name and setting goes through
//! the builder's validation when it is applied.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canonical::CanonicalPolicy;
use crate::config::{
    MetadataFieldSnapshot, PageBuilder, RoutingConfiguration, RoutingConfigurationBuilder,
    SegmentBuilder,
};
use crate::error::ConfigError;
use crate::pagination::PaginationSettings;

/// Routing manifest (usually `routes.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingManifest {
    pub root: RootManifest,
    pub cultures: CulturesManifest,
    pub segments: Vec<SegmentManifest>,
    /// Pages directly under `/`
    pub pages: Vec<PageManifest>,
}

/// `[root]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootManifest {
    pub content_type: Option<String>,
    pub index_component: Option<String>,
    pub index_layout: Option<String>,
    pub page_component: Option<String>,
    pub page_layout: Option<String>,
    pub pagination: Option<PaginationSettings>,
    pub metadata: Vec<MetadataFieldSnapshot>,
}

/// `[cultures]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CulturesManifest {
    /// Falls back to `en-US`
    pub default: Option<String>,
    pub supported: Vec<String>,
    pub canonical_policy: CanonicalPolicy,
}

/// `[[segments]]` entry; segments nest through `[[segments.segments]]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentManifest {
    pub name: String,
    pub content_type: Option<String>,
    pub index_component: Option<String>,
    pub index_layout: Option<String>,
    pub page_component: Option<String>,
    pub page_layout: Option<String>,
    pub pagination: Option<PaginationSettings>,
    pub metadata: Vec<MetadataFieldSnapshot>,
    pub segments: Vec<SegmentManifest>,
    pub pages: Vec<PageManifest>,
}

/// `[[pages]]` entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageManifest {
    pub slug: String,
    pub content_type: Option<String>,
    pub component: Option<String>,
    pub layout: Option<String>,
    pub metadata: Vec<MetadataFieldSnapshot>,
}

impl RoutingManifest {
    /// Load a manifest from a file
    ///
    /// A missing or empty file yields an empty manifest.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = ?path, "no routing manifest; using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing manifest: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse routing manifest: {:?}", path))
    }

    /// Parse a manifest from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Load a manifest and build its configuration
    pub fn load_configuration(path: impl AsRef<Path>) -> Result<RoutingConfiguration> {
        let path = path.as_ref();
        let manifest = Self::load(path)?;
        manifest
            .build()
            .with_context(|| format!("Invalid routing manifest: {:?}", path))
    }

    /// Applies every declaration onto `builder`
    pub fn apply(&self, builder: &mut RoutingConfigurationBuilder) -> Result<(), ConfigError> {
        builder.configure_root(|root| {
            let settings = &self.root;
            if let Some(content_type) = &settings.content_type {
                root.content_type(content_type);
            }
            if let Some(component) = &settings.index_component {
                root.index_component(component);
            }
            if let Some(layout) = &settings.index_layout {
                root.index_layout(layout);
            }
            if let Some(component) = &settings.page_component {
                root.page_component(component);
            }
            if let Some(layout) = &settings.page_layout {
                root.page_layout(layout);
            }
            if let Some(pagination) = &settings.pagination {
                root.paginate(pagination.clone())?;
            }
            for field in &settings.metadata {
                root.metadata_field(&field.name, field.type_tag, field.default_value.clone())?;
            }

            if let Some(tag) = &self.cultures.default {
                root.default_culture(tag)?;
            }
            root.supported_cultures(&self.cultures.supported)?
                .canonical_policy(self.cultures.canonical_policy);
            Ok(())
        })?;

        for segment in &self.segments {
            builder.map_segment(&segment.name, |handle| segment.apply(handle))?;
        }
        for page in &self.pages {
            builder.map_page(&page.slug, |handle| page.apply(handle))?;
        }
        Ok(())
    }

    /// Builds a fresh configuration from this manifest
    pub fn build(&self) -> Result<RoutingConfiguration, ConfigError> {
        let mut builder = RoutingConfigurationBuilder::new();
        self.apply(&mut builder)?;
        builder.build()
    }
}

impl SegmentManifest {
    fn apply(&self, handle: &mut SegmentBuilder<'_>) -> Result<(), ConfigError> {
        if let Some(content_type) = &self.content_type {
            handle.content_type(content_type);
        }
        if let Some(component) = &self.index_component {
            handle.index_component(component);
        }
        if let Some(layout) = &self.index_layout {
            handle.index_layout(layout);
        }
        if let Some(component) = &self.page_component {
            handle.page_component(component);
        }
        if let Some(layout) = &self.page_layout {
            handle.page_layout(layout);
        }
        if let Some(pagination) = &self.pagination {
            handle.paginate(pagination.clone())?;
        }
        for field in &self.metadata {
            handle.metadata_field(&field.name, field.type_tag, field.default_value.clone())?;
        }

        for child in &self.segments {
            handle.map_segment(&child.name, |child_handle| child.apply(child_handle))?;
        }
        for page in &self.pages {
            handle.map_page(&page.slug, |page_handle| page.apply(page_handle))?;
        }
        Ok(())
    }
}

impl PageManifest {
    fn apply(&self, handle: &mut PageBuilder<'_>) -> Result<(), ConfigError> {
        if let Some(content_type) = &self.content_type {
            handle.content_type(content_type);
        }
        if let Some(component) = &self.component {
            handle.component(component);
        }
        if let Some(layout) = &self.layout {
            handle.layout(layout);
        }
        for field in &self.metadata {
            handle.metadata_field(&field.name, field.type_tag, field.default_value.clone())?;
        }
        Ok(())
    }
}
