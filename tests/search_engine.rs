//! Integration tests for the search engine over a realistic catalogue.

mod common;

use vue_bits_mcp::catalog::{Catalog, Category, ComponentRecord, Complexity, Performance};
use vue_bits_mcp::search::{
    Preferences, Scorer, SearchEngine, SearchFilters, WeightedScorer, Weights,
    RECOMMENDATION_LIMIT,
};

fn engine() -> SearchEngine {
    SearchEngine::new(common::catalog())
}

fn names(records: &[&ComponentRecord]) -> Vec<String> {
    records.iter().map(|r| r.name.clone()).collect()
}

#[test]
fn query_terms_are_anded() {
    let engine = engine();

    let result = engine.search("text animates", &SearchFilters::default());
    assert_eq!(names(&result.records), ["BlurText"]);
    assert_eq!(result.total, 1);

    let result = engine.search("Aurora WEBGL", &SearchFilters::default());
    assert_eq!(names(&result.records), ["Aurora"]);
}

#[test]
fn equal_scores_keep_store_order() {
    // SplitText and BlurText both score 70 for "text".
    let engine = engine();
    let result = engine.search("text", &SearchFilters::default());
    assert_eq!(names(&result.records), ["SplitText", "BlurText"]);
}

#[test]
fn higher_relevance_ranks_first() {
    let blur_engine = engine();
    let result = blur_engine.search("blur", &SearchFilters::default());
    assert_eq!(names(&result.records), ["BlurText"]);

    let dock_engine = engine();
    let result = dock_engine.search("dock", &SearchFilters::default());
    assert_eq!(result.records[0].name, "Dock");
}

#[test]
fn empty_query_keeps_order_and_applies_filters() {
    let engine = engine();

    let all = engine.search("   ", &SearchFilters::default());
    assert_eq!(names(&all.records), ["SplitText", "BlurText", "Aurora", "Dock"]);

    let filters = SearchFilters {
        category: Some(Category::TextAnimations),
        complexity: Some(Complexity::Simple),
        ..SearchFilters::default()
    };
    assert_eq!(names(&engine.search("", &filters).records), ["BlurText"]);

    let filters = SearchFilters {
        tags: vec!["webgl".to_string(), "navigation".to_string()],
        ..SearchFilters::default()
    };
    assert_eq!(names(&engine.search("", &filters).records), ["Aurora", "Dock"]);

    let filters = SearchFilters {
        has_props: vec!["ITEM".to_string()],
        ..SearchFilters::default()
    };
    assert_eq!(names(&engine.search("", &filters).records), ["Dock"]);

    let filters = SearchFilters {
        subcategory: Some("text".to_string()),
        performance: Some(Performance::High),
        ..SearchFilters::default()
    };
    assert_eq!(
        names(&engine.search("", &filters).records),
        ["SplitText", "BlurText"]
    );
}

fn ids(records: &[&ComponentRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

#[test]
fn exact_name_outranks_prefix_and_non_matches_drop() {
    let engine = SearchEngine::new(Catalog::new(vec![
        common::record("Foo", "Components"),
        common::record("FooBar", "Components"),
        common::record("Bar", "Components"),
    ]));
    let result = engine.search("foo", &SearchFilters::default());
    assert_eq!(ids(&result.records), ["components-foo", "components-foobar"]);
    assert_eq!(result.total, 2);

    // Store order does not decide the ranking.
    let engine = SearchEngine::new(Catalog::new(vec![
        common::record("Bar", "Components"),
        common::record("FooBar", "Components"),
        common::record("Foo", "Components"),
    ]));
    let result = engine.search("FOO", &SearchFilters::default());
    assert_eq!(ids(&result.records), ["components-foo", "components-foobar"]);
}

#[test]
fn filters_commute() {
    let engine = engine();
    let by_performance = SearchFilters {
        performance: Some(Performance::High),
        ..SearchFilters::default()
    };
    let by_tag = SearchFilters {
        tags: vec!["text".to_string(), "webgl".to_string()],
        ..SearchFilters::default()
    };
    let both = SearchFilters {
        performance: Some(Performance::High),
        tags: vec!["text".to_string(), "webgl".to_string()],
        ..SearchFilters::default()
    };

    for query in ["", "text"] {
        let performance_then_tag: Vec<&ComponentRecord> = engine
            .search(query, &by_performance)
            .records
            .into_iter()
            .filter(|r| by_tag.matches(r))
            .collect();
        let tag_then_performance: Vec<&ComponentRecord> = engine
            .search(query, &by_tag)
            .records
            .into_iter()
            .filter(|r| by_performance.matches(r))
            .collect();
        let combined = engine.search(query, &both).records;

        assert_eq!(ids(&performance_then_tag), ids(&tag_then_performance));
        assert_eq!(ids(&combined), ids(&performance_then_tag));
        assert_eq!(names(&combined), ["SplitText", "BlurText"]);
    }
}

#[test]
fn lookups_return_none_when_missing() {
    let engine = engine();
    assert_eq!(engine.get_by_name("DOCK").unwrap().id, "components-dock");
    assert!(engine.get_by_name("Dockk").is_none());
    assert!(engine.get_by_id("components-nothing").is_none());
}

#[test]
fn grouping_helpers() {
    let engine = engine();
    assert_eq!(names(&engine.by_category("backgrounds")), ["Aurora"]);
    assert_eq!(names(&engine.by_subcategory("TEXT")), ["SplitText", "BlurText"]);
    assert_eq!(
        names(&engine.by_tags(&["Blur".to_string(), "3d".to_string()])),
        ["BlurText", "Aurora"]
    );
}

#[test]
fn similar_excludes_reference_and_ranks() {
    let similar_engine = engine();
    let similar = similar_engine.similar("textanimations-splittext", 5);
    // BlurText: category + two shared tags + performance. Aurora and Dock tie.
    assert_eq!(names(&similar), ["BlurText", "Aurora", "Dock"]);

    assert_eq!(engine().similar("textanimations-splittext", 1).len(), 1);
    assert!(engine().similar("unknown", 5).is_empty());
}

#[test]
fn popular_does_not_reorder_the_store() {
    let engine = engine();

    let popular = engine.popular(10, None);
    assert_eq!(names(&popular), ["SplitText", "BlurText", "Dock", "Aurora"]);
    assert_eq!(names(&engine.popular(2, None)), ["SplitText", "BlurText"]);
    assert_eq!(names(&engine.popular(10, Some(Category::Components))), ["Dock"]);

    let order: Vec<&str> = engine.catalog().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        order,
        [
            "textanimations-splittext",
            "textanimations-blurtext",
            "backgrounds-aurora",
            "components-dock",
        ]
    );
}

#[test]
fn recommendations_filter_then_truncate() {
    let prefs = Preferences {
        categories: vec![Category::TextAnimations],
        performance: Some(Performance::High),
        ..Preferences::default()
    };
    assert_eq!(names(&engine().recommendations(&prefs)), ["SplitText", "BlurText"]);

    let prefs = Preferences {
        tags: vec!["3d".to_string()],
        ..Preferences::default()
    };
    assert_eq!(names(&engine().recommendations(&prefs)), ["Aurora"]);

    let mut many = common::records();
    many.extend(common::records());
    many.extend(common::records());
    let engine = SearchEngine::new(Catalog::new(many));
    assert_eq!(engine.catalog().len(), 12);
    assert_eq!(
        engine.recommendations(&Preferences::default()).len(),
        RECOMMENDATION_LIMIT
    );
}

#[test]
fn metadata_aggregates() {
    let meta = engine().metadata();
    assert_eq!(meta.total_components, 4);

    let text = &meta.categories[&Category::TextAnimations];
    assert_eq!(text.count, 2);
    assert_eq!(text.subcategories, ["SplitText", "BlurText"]);
    assert_eq!(meta.categories[&Category::Animations].count, 0);

    let deps: Vec<(&str, usize)> = meta
        .dependencies
        .iter()
        .map(|d| (d.name.as_str(), d.count))
        .collect();
    assert_eq!(deps, [("gsap", 2), ("motion-v", 2), ("ogl", 1)]);
    assert_eq!(meta.dependencies[0].components, ["SplitText", "Aurora"]);

    assert_eq!(meta.tags[0].name, "textanimations");
    assert_eq!(meta.tags[1].name, "text");
    assert!(meta.tags[2..].iter().all(|t| t.count == 1));
}

/// Ranks shorter names first, ignoring the query.
struct ShortestName;

impl Scorer for ShortestName {
    fn relevance(&self, record: &ComponentRecord, _query: &str) -> u32 {
        100 - u32::try_from(record.name.len()).unwrap()
    }

    fn similarity(&self, _reference: &ComponentRecord, _candidate: &ComponentRecord) -> u32 {
        0
    }

    fn popularity(&self, _record: &ComponentRecord) -> u32 {
        0
    }
}

#[test]
fn scorer_is_pluggable() {
    let engine = SearchEngine::with_scorer(common::catalog(), ShortestName);
    let result = engine.search("text", &SearchFilters::default());
    assert_eq!(names(&result.records), ["BlurText", "SplitText"]);

    // All popularity scores tie, so store order is kept.
    assert_eq!(
        names(&engine.popular(4, None)),
        ["SplitText", "BlurText", "Aurora", "Dock"]
    );
}

#[test]
fn weights_are_tunable() {
    let mut weights = Weights::default();
    weights.similarity.shared_dependency = 100;
    let engine = SearchEngine::with_scorer(common::catalog(), WeightedScorer::new(weights));

    // Aurora shares gsap with SplitText and now outranks BlurText.
    let similar = engine.similar("textanimations-splittext", 1);
    assert_eq!(names(&similar), ["Aurora"]);
}
