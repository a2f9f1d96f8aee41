//! Component catalogue: record types and the in-memory record store.
//!
//! The store is built once, either from the JSON cache or by scanning a
//! Vue Bits checkout, and is read-only afterwards.
//!
//! ```text
//! components.json ──load──┐
//!                         ├──▶ Catalog (Vec<ComponentRecord>, id index)
//! src/content/**/*.vue ───┘
//!        scan + save
//! ```

pub mod cache;
pub mod parser;

pub use parser::ComponentParser;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::CatalogError;

/// Top-level grouping of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Animated text effects.
    TextAnimations,
    /// General purpose animations.
    Animations,
    /// Interactive UI components.
    Components,
    /// Animated backgrounds.
    Backgrounds,
}

impl Category {
    /// All categories in catalogue order.
    pub const ALL: [Self; 4] = [
        Self::TextAnimations,
        Self::Animations,
        Self::Components,
        Self::Backgrounds,
    ];

    /// Returns the category name as it appears on disk and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextAnimations => "TextAnimations",
            Self::Animations => "Animations",
            Self::Components => "Components",
            Self::Backgrounds => "Backgrounds",
        }
    }

    /// Parses a category from its exact name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Implementation complexity, derived when the source is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Few or no heavy dependencies.
    Simple,
    /// Some animation machinery.
    Medium,
    /// WebGL, 3D or large sources.
    Complex,
}

impl Complexity {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expected runtime cost, derived when the source is scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Performance {
    /// Cheap to render.
    High,
    /// Moderate cost.
    Medium,
    /// Heavy (3D, physics, canvas).
    Low,
}

impl Performance {
    /// Returns the lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configurable property of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentProp {
    /// Property name.
    pub name: String,
    /// TypeScript type as written in the source.
    #[serde(rename = "type")]
    pub prop_type: String,
    /// Whether the property must be supplied.
    pub required: bool,
    /// Default value expression, if one was declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Allowed values, when the property is an enumeration.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// A usage example attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentExample {
    /// Example heading.
    pub title: String,
    /// What the example demonstrates.
    #[serde(default)]
    pub description: String,
    /// Template source.
    pub code: String,
}

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    /// Unique slug key.
    pub id: String,
    /// Display name (the `.vue` file stem).
    pub name: String,
    /// Top-level grouping.
    pub category: Category,
    /// Free-text grouping label.
    pub subcategory: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Source path relative to the Vue Bits root.
    #[serde(default)]
    pub file_path: String,
    /// Full single-file-component source.
    #[serde(default)]
    pub code: String,
    /// Declared properties, in source order.
    #[serde(default)]
    pub props: Vec<ComponentProp>,
    /// External package names.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Free-text keywords.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Usage examples.
    #[serde(default)]
    pub examples: Vec<ComponentExample>,
    /// Derived complexity.
    pub complexity: Complexity,
    /// Derived performance.
    pub performance: Performance,
}

impl ComponentRecord {
    /// Lowercased text matched by free-text search:
    /// name, description, subcategory and tags.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![
            self.name.as_str(),
            self.description.as_str(),
            self.subcategory.as_str(),
        ];
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

/// The read-only record store.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<ComponentRecord>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a store, keeping record order and making every `id` unique.
    ///
    /// A record whose id is already taken gets the kebab-cased component
    /// name appended (and a counter, if that is taken too).
    #[must_use]
    pub fn new(records: Vec<ComponentRecord>) -> Self {
        let mut taken: HashSet<String> = HashSet::with_capacity(records.len());
        let mut by_id = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());

        for mut record in records {
            if taken.contains(&record.id) {
                let replacement = disambiguate(&record.id, &record.name, &taken);
                warn!(
                    id = %record.id,
                    name = %record.name,
                    replacement = %replacement,
                    "Duplicate component id"
                );
                record.id = replacement;
            }
            taken.insert(record.id.clone());
            by_id.insert(record.id.clone(), unique.len());
            unique.push(record);
        }

        Self {
            records: unique,
            by_id,
        }
    }

    /// Returns all records in store order.
    #[must_use]
    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ComponentRecord> {
        self.by_id.get(id).map(|&i| &self.records[i])
    }

    /// Iterates over records in store order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ComponentRecord;
    type IntoIter = std::slice::Iter<'a, ComponentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn disambiguate(id: &str, name: &str, taken: &HashSet<String>) -> String {
    let candidate = format!("{id}-{}", kebab_case(name));
    if !taken.contains(&candidate) {
        return candidate;
    }
    let mut n = 2_usize;
    loop {
        let numbered = format!("{candidate}-{n}");
        if !taken.contains(&numbered) {
            return numbered;
        }
        n += 1;
    }
}

/// Converts `SplitText` or `Split Text` into `split-text`.
#[must_use]
pub fn kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Loads the catalogue for serving.
///
/// Uses the cache when it exists; otherwise scans `source_root` and writes
/// the cache for next time. Every failure is logged and yields an empty
/// catalogue so the server can still start.
#[must_use]
pub fn load_or_rebuild(cache_path: &Path, source_root: &Path) -> Catalog {
    if cache_path.exists() {
        return match cache::load(cache_path) {
            Ok(records) => {
                info!(
                    count = records.len(),
                    path = %cache_path.display(),
                    "Loaded components from cache"
                );
                Catalog::new(records)
            }
            Err(e) => {
                error!(error = %e, "Failed to load component cache, using empty catalogue");
                Catalog::default()
            }
        };
    }

    let records = match ComponentParser::new(source_root).and_then(|p| p.parse_all()) {
        Ok(records) => records,
        Err(CatalogError::SourceNotFound { path }) => {
            warn!(
                path = %path.display(),
                "Vue Bits source not found, using empty catalogue"
            );
            return Catalog::default();
        }
        Err(e) => {
            error!(error = %e, "Failed to scan components, using empty catalogue");
            return Catalog::default();
        }
    };

    if let Err(e) = cache::save(cache_path, &records) {
        warn!(error = %e, "Failed to write component cache");
    } else {
        info!(
            count = records.len(),
            path = %cache_path.display(),
            "Cached components"
        );
    }

    Catalog::new(records)
}

/// Rescans `source_root` and overwrites the cache.
///
/// # Errors
///
/// Returns an error if the source tree is missing or unreadable, or the
/// cache cannot be written.
pub fn rebuild(source_root: &Path, cache_path: &Path) -> Result<Catalog, CatalogError> {
    let records = ComponentParser::new(source_root)?.parse_all()?;
    cache::save(cache_path, &records)?;
    info!(
        count = records.len(),
        path = %cache_path.display(),
        "Rebuilt component cache"
    );
    Ok(Catalog::new(records))
}
