//! Scoring strategies for ranking catalogue records.
//!
//! Scores are pure functions of their inputs. The engine only sorts by
//! them, so a different [`Scorer`] can be plugged in without touching the
//! filtering pipeline.

use crate::catalog::{ComponentRecord, Complexity, Performance};

/// Ranks records for search, similarity and popularity.
pub trait Scorer {
    /// Relevance of `record` to a query. `query` is already lowercased.
    fn relevance(&self, record: &ComponentRecord, query: &str) -> u32;

    /// Similarity of `candidate` to `reference`.
    fn similarity(&self, reference: &ComponentRecord, candidate: &ComponentRecord) -> u32;

    /// Heuristic popularity of `record`.
    fn popularity(&self, record: &ComponentRecord) -> u32;
}

/// Points awarded by relevance signals. Signals are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelevanceWeights {
    /// Name equals the query.
    pub exact_name: u32,
    /// Name starts with the query.
    pub name_prefix: u32,
    /// Name contains the query.
    pub name_contains: u32,
    /// Subcategory contains the query.
    pub subcategory: u32,
    /// Any tag contains the query.
    pub tag: u32,
    /// Description contains the query.
    pub description: u32,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            exact_name: 100,
            name_prefix: 50,
            name_contains: 25,
            subcategory: 20,
            tag: 15,
            description: 10,
        }
    }
}

/// Points awarded by similarity signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimilarityWeights {
    /// Same category.
    pub category: u32,
    /// Same subcategory.
    pub subcategory: u32,
    /// Per shared tag.
    pub shared_tag: u32,
    /// Per shared dependency.
    pub shared_dependency: u32,
    /// Same complexity.
    pub complexity: u32,
    /// Same performance.
    pub performance: u32,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            category: 30,
            subcategory: 20,
            shared_tag: 10,
            shared_dependency: 5,
            complexity: 5,
            performance: 5,
        }
    }
}

/// Points awarded by popularity signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularityWeights {
    /// Bonus for simple components.
    pub simple: u32,
    /// Bonus for medium complexity.
    pub medium_complexity: u32,
    /// Bonus for complex components.
    pub complex: u32,
    /// Bonus for high performance.
    pub high_performance: u32,
    /// Bonus for medium performance.
    pub medium_performance: u32,
    /// Bonus for low performance.
    pub low_performance: u32,
    /// Prop count is capped at this value before being added.
    pub prop_cap: u32,
}

impl Default for PopularityWeights {
    fn default() -> Self {
        Self {
            simple: 3,
            medium_complexity: 2,
            complex: 0,
            high_performance: 3,
            medium_performance: 1,
            low_performance: 0,
            prop_cap: 5,
        }
    }
}

/// All weight tables used by [`WeightedScorer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weights {
    /// Search relevance.
    pub relevance: RelevanceWeights,
    /// Record similarity.
    pub similarity: SimilarityWeights,
    /// Popularity.
    pub popularity: PopularityWeights,
}

/// The default additive scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedScorer {
    /// Weight tables.
    pub weights: Weights,
}

impl WeightedScorer {
    /// Creates a scorer with custom weights.
    #[must_use]
    pub const fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl Scorer for WeightedScorer {
    fn relevance(&self, record: &ComponentRecord, query: &str) -> u32 {
        let w = &self.weights.relevance;
        let name = record.name.to_lowercase();
        let mut score = 0;

        if name == query {
            score += w.exact_name;
        }
        if name.starts_with(query) {
            score += w.name_prefix;
        }
        if name.contains(query) {
            score += w.name_contains;
        }
        if record.subcategory.to_lowercase().contains(query) {
            score += w.subcategory;
        }
        if record.tags.iter().any(|t| t.to_lowercase().contains(query)) {
            score += w.tag;
        }
        if record.description.to_lowercase().contains(query) {
            score += w.description;
        }

        score
    }

    fn similarity(&self, reference: &ComponentRecord, candidate: &ComponentRecord) -> u32 {
        let w = &self.weights.similarity;
        let mut score = 0;

        if reference.category == candidate.category {
            score += w.category;
        }
        if reference.subcategory == candidate.subcategory {
            score += w.subcategory;
        }

        let shared_tags = reference
            .tags
            .iter()
            .filter(|t| candidate.tags.contains(t))
            .count();
        score += w.shared_tag * count_u32(shared_tags);

        let shared_deps = reference
            .dependencies
            .iter()
            .filter(|d| candidate.dependencies.contains(d))
            .count();
        score += w.shared_dependency * count_u32(shared_deps);

        if reference.complexity == candidate.complexity {
            score += w.complexity;
        }
        if reference.performance == candidate.performance {
            score += w.performance;
        }

        score
    }

    fn popularity(&self, record: &ComponentRecord) -> u32 {
        let w = &self.weights.popularity;

        let complexity = match record.complexity {
            Complexity::Simple => w.simple,
            Complexity::Medium => w.medium_complexity,
            Complexity::Complex => w.complex,
        };
        let performance = match record.performance {
            Performance::High => w.high_performance,
            Performance::Medium => w.medium_performance,
            Performance::Low => w.low_performance,
        };

        complexity + performance + count_u32(record.props.len()).min(w.prop_cap)
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
