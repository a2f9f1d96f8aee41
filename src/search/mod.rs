//! Search and ranking over the component catalogue.
//!
//! Every query is a linear scan of the read-only [`Catalog`]. Filtering is
//! a conjunction of independent predicates, so the order in which filters
//! are applied never changes the result. Ranking is delegated to a
//! [`Scorer`] and uses stable sorts: records with equal scores keep their
//! store order.

pub mod scoring;

pub use scoring::{Scorer, WeightedScorer, Weights};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, ComponentRecord, Complexity, Performance};

/// Maximum number of records returned by [`SearchEngine::recommendations`].
pub const RECOMMENDATION_LIMIT: usize = 8;

/// Structured search filters. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Exact category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Case-insensitive subcategory substring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// At least one of these tags must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Exact complexity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    /// Exact performance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    /// At least one prop name must contain one of these (case-insensitive).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub has_props: Vec<String>,
}

impl SearchFilters {
    /// Returns `true` if no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.subcategory.is_none()
            && self.tags.is_empty()
            && self.complexity.is_none()
            && self.performance.is_none()
            && self.has_props.is_empty()
    }

    /// Returns `true` if `record` satisfies every set filter.
    #[must_use]
    pub fn matches(&self, record: &ComponentRecord) -> bool {
        if self.category.is_some_and(|c| c != record.category) {
            return false;
        }
        if let Some(sub) = &self.subcategory {
            if !record
                .subcategory
                .to_lowercase()
                .contains(&sub.to_lowercase())
            {
                return false;
            }
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| record.tags.contains(t)) {
            return false;
        }
        if self.complexity.is_some_and(|c| c != record.complexity) {
            return false;
        }
        if self.performance.is_some_and(|p| p != record.performance) {
            return false;
        }
        if !self.has_props.is_empty() {
            let wanted: Vec<String> = self.has_props.iter().map(|p| p.to_lowercase()).collect();
            let found = record.props.iter().any(|prop| {
                let name = prop.name.to_lowercase();
                wanted.iter().any(|w| name.contains(w.as_str()))
            });
            if !found {
                return false;
            }
        }
        true
    }
}

/// Preferences for [`SearchEngine::recommendations`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Accepted categories (any).
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Exact complexity.
    #[serde(default)]
    pub complexity: Option<Complexity>,
    /// Exact performance.
    #[serde(default)]
    pub performance: Option<Performance>,
    /// Accepted tags (any).
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Result of [`SearchEngine::search`].
#[derive(Debug, Clone)]
pub struct SearchResult<'a> {
    /// Matching records, ranked when a query was given.
    pub records: Vec<&'a ComponentRecord>,
    /// Number of matching records.
    pub total: usize,
}

/// Per-category aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    /// Number of records in the category.
    pub count: usize,
    /// Distinct subcategories, in first-seen order.
    pub subcategories: Vec<String>,
}

/// How often a dependency is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyUsage {
    /// Package name.
    pub name: String,
    /// Number of records depending on it.
    pub count: usize,
    /// Names of those records.
    pub components: Vec<String>,
}

/// How often a tag is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    /// Tag text.
    pub name: String,
    /// Number of records carrying it.
    pub count: usize,
}

/// Aggregate statistics over the whole catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    /// Number of records.
    pub total_components: usize,
    /// Every category, in catalogue order, even when empty.
    pub categories: IndexMap<Category, CategorySummary>,
    /// Dependencies, most used first.
    pub dependencies: Vec<DependencyUsage>,
    /// Tags, most used first.
    pub tags: Vec<TagCount>,
}

/// Query engine over a [`Catalog`].
#[derive(Debug, Clone)]
pub struct SearchEngine<S = WeightedScorer> {
    catalog: Catalog,
    scorer: S,
}

impl SearchEngine {
    /// Creates an engine with the default weights.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self::with_scorer(catalog, WeightedScorer::default())
    }
}

impl<S: Scorer> SearchEngine<S> {
    /// Creates an engine with a custom scorer.
    #[must_use]
    pub const fn with_scorer(catalog: Catalog, scorer: S) -> Self {
        Self { catalog, scorer }
    }

    /// Returns the underlying catalogue.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Free-text search plus structured filters.
    ///
    /// Every whitespace-separated query term must occur in the record's
    /// searchable text. With a non-empty query the matches are ranked by
    /// relevance; otherwise store order is kept.
    #[must_use]
    pub fn search(&self, query: &str, filters: &SearchFilters) -> SearchResult<'_> {
        let query = query.trim().to_lowercase();
        let terms: Vec<&str> = query.split_whitespace().collect();

        let matches = self.catalog.iter().filter(|record| {
            if !terms.is_empty() {
                let text = record.searchable_text();
                if !terms.iter().all(|term| text.contains(term)) {
                    return false;
                }
            }
            filters.matches(record)
        });

        let records = if query.is_empty() {
            matches.collect::<Vec<_>>()
        } else {
            let mut scored: Vec<(u32, &ComponentRecord)> = matches
                .map(|r| (self.scorer.relevance(r, &query), r))
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0));
            scored.into_iter().map(|(_, r)| r).collect()
        };

        SearchResult {
            total: records.len(),
            records,
        }
    }

    /// Looks up a record by exact id.
    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&ComponentRecord> {
        self.catalog.get(id)
    }

    /// Looks up the first record whose name matches, ignoring case.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&ComponentRecord> {
        let name = name.to_lowercase();
        self.catalog.iter().find(|r| r.name.to_lowercase() == name)
    }

    /// Records whose category name matches, ignoring case.
    #[must_use]
    pub fn by_category(&self, category: &str) -> Vec<&ComponentRecord> {
        self.catalog
            .iter()
            .filter(|r| r.category.as_str().eq_ignore_ascii_case(category))
            .collect()
    }

    /// Records whose subcategory contains `subcategory`, ignoring case.
    #[must_use]
    pub fn by_subcategory(&self, subcategory: &str) -> Vec<&ComponentRecord> {
        let needle = subcategory.to_lowercase();
        self.catalog
            .iter()
            .filter(|r| r.subcategory.to_lowercase().contains(&needle))
            .collect()
    }

    /// Records carrying any of `tags` (compared lowercased).
    #[must_use]
    pub fn by_tags(&self, tags: &[String]) -> Vec<&ComponentRecord> {
        let wanted: Vec<String> = tags.iter().map(|t| t.to_lowercase()).collect();
        self.catalog
            .iter()
            .filter(|r| wanted.iter().any(|t| r.tags.contains(t)))
            .collect()
    }

    /// The `limit` records most similar to `id`, excluding `id` itself.
    ///
    /// Returns an empty list if `id` is unknown.
    #[must_use]
    pub fn similar(&self, id: &str, limit: usize) -> Vec<&ComponentRecord> {
        let Some(reference) = self.catalog.get(id) else {
            return Vec::new();
        };

        let mut scored: Vec<(u32, &ComponentRecord)> = self
            .catalog
            .iter()
            .filter(|c| c.id != reference.id)
            .map(|c| (self.scorer.similarity(reference, c), c))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, c)| c).collect()
    }

    /// The `limit` most popular records, optionally within one category.
    ///
    /// Ranks a copy of the record list; the store order is never changed,
    /// so repeated calls return the same answer.
    #[must_use]
    pub fn popular(&self, limit: usize, category: Option<Category>) -> Vec<&ComponentRecord> {
        let mut scored: Vec<(u32, &ComponentRecord)> = self
            .catalog
            .iter()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .map(|r| (self.scorer.popularity(r), r))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(limit).map(|(_, r)| r).collect()
    }

    /// Records matching every set preference, first
    /// [`RECOMMENDATION_LIMIT`] in store order.
    #[must_use]
    pub fn recommendations(&self, prefs: &Preferences) -> Vec<&ComponentRecord> {
        self.catalog
            .iter()
            .filter(|r| prefs.categories.is_empty() || prefs.categories.contains(&r.category))
            .filter(|r| prefs.complexity.map_or(true, |c| c == r.complexity))
            .filter(|r| prefs.performance.map_or(true, |p| p == r.performance))
            .filter(|r| prefs.tags.is_empty() || prefs.tags.iter().any(|t| r.tags.contains(t)))
            .take(RECOMMENDATION_LIMIT)
            .collect()
    }

    /// Category, dependency and tag statistics.
    #[must_use]
    pub fn metadata(&self) -> CatalogMetadata {
        let mut categories: IndexMap<Category, CategorySummary> = Category::ALL
            .into_iter()
            .map(|c| (c, CategorySummary::default()))
            .collect();
        let mut dependencies: IndexMap<&str, DependencyUsage> = IndexMap::new();
        let mut tags: IndexMap<&str, usize> = IndexMap::new();

        for record in &self.catalog {
            let summary = categories.entry(record.category).or_default();
            summary.count += 1;
            if !summary.subcategories.contains(&record.subcategory) {
                summary.subcategories.push(record.subcategory.clone());
            }

            for dep in &record.dependencies {
                let usage = dependencies
                    .entry(dep.as_str())
                    .or_insert_with(|| DependencyUsage {
                        name: dep.clone(),
                        count: 0,
                        components: Vec::new(),
                    });
                usage.count += 1;
                usage.components.push(record.name.clone());
            }

            for tag in &record.tags {
                *tags.entry(tag.as_str()).or_insert(0) += 1;
            }
        }

        let mut dependencies: Vec<DependencyUsage> = dependencies.into_values().collect();
        dependencies.sort_by(|a, b| b.count.cmp(&a.count));

        let mut tags: Vec<TagCount> = tags
            .into_iter()
            .map(|(name, count)| TagCount {
                name: name.to_string(),
                count,
            })
            .collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count));

        CatalogMetadata {
            total_components: self.catalog.len(),
            categories,
            dependencies,
            tags,
        }
    }
}
