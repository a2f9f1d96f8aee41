//! Markdown rendering of tool results.

use std::fmt::Write as _;

use indexmap::IndexMap;

use super::{PackageManager, ProjectType};
use crate::catalog::ComponentRecord;
use crate::search::{CatalogMetadata, Preferences};

/// Number of dependencies listed by [`metadata`].
const TOP_DEPENDENCIES: usize = 10;
/// Number of tags listed by [`metadata`].
const TOP_TAGS: usize = 15;

/// Renders a page of search results. `filters_json` is the pretty-printed
/// filter object, present only when a filter was set.
pub fn search_results(
    records: &[&ComponentRecord],
    total: usize,
    query: &str,
    filters_json: Option<&str>,
) -> String {
    let mut out = String::from("# Vue Bits Component Search Results\n\n");

    if !query.is_empty() {
        let _ = writeln!(out, "**Query:** \"{query}\"");
    }
    if let Some(filters) = filters_json {
        let _ = writeln!(out, "**Filters:** {filters}");
    }
    let _ = writeln!(out, "**Found:** {} of {total} components\n", records.len());

    if records.is_empty() {
        out.push_str("No components found matching your criteria.\n\n");
        out.push_str("**Suggestions:**\n");
        out.push_str("- Try broader search terms\n");
        out.push_str("- Remove some filters\n");
        out.push_str("- Use the `list_categories` tool to see available options\n");
        return out;
    }

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}", i + 1, record.name);
        let _ = writeln!(out, "- **ID:** `{}`", record.id);
        let _ = writeln!(out, "- **Category:** {} > {}", record.category, record.subcategory);
        let _ = writeln!(out, "- **Description:** {}", record.description);
        let _ = writeln!(
            out,
            "- **Complexity:** {} | **Performance:** {}",
            record.complexity, record.performance
        );
        let _ = writeln!(out, "- **Tags:** {}", record.tags.join(", "));
        let _ = writeln!(out, "- **Props:** {} configurable properties", record.props.len());
        let _ = writeln!(out, "- **Dependencies:** {}\n", or_none(&record.dependencies));
    }

    out.push_str("\n**Next Steps:**\n");
    out.push_str("- Use `get_component_code` to view the full implementation\n");
    out.push_str("- Use `get_component_props` to see detailed property information\n");
    out.push_str("- Use `get_installation_guide` for setup instructions\n");
    out
}

/// Renders a component's source listing.
pub fn component_code(record: &ComponentRecord, include_props: bool, include_examples: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {} Component\n", record.name);
    let _ = writeln!(out, "**Category:** {} > {}", record.category, record.subcategory);
    let _ = writeln!(out, "**Description:** {}", record.description);
    let _ = writeln!(
        out,
        "**Complexity:** {} | **Performance:** {}\n",
        record.complexity, record.performance
    );

    if !record.dependencies.is_empty() {
        out.push_str("## Dependencies\n\n");
        let _ = writeln!(
            out,
            "```bash\nnpm install {}\n```\n",
            record.dependencies.join(" ")
        );
    }

    out.push_str("## Component Code\n\n");
    let _ = writeln!(out, "**File:** `{}`\n", record.file_path);
    let _ = writeln!(out, "```vue\n{}\n```\n", record.code);

    if include_props && !record.props.is_empty() {
        out.push_str(&component_props(record));
    }

    if include_examples && !record.examples.is_empty() {
        out.push_str("## Usage Examples\n\n");
        for example in &record.examples {
            let _ = writeln!(out, "### {}\n", example.title);
            let _ = writeln!(out, "{}\n", example.description);
            let _ = writeln!(out, "```vue\n{}\n```\n", example.code);
        }
    }

    out
}

/// Renders the props table.
pub fn component_props(record: &ComponentRecord) -> String {
    if record.props.is_empty() {
        return "## Props\n\nThis component has no configurable props.\n\n".to_string();
    }

    let mut out = String::from("## Props\n\n");
    out.push_str("| Property | Type | Required | Default | Description |\n");
    out.push_str("|----------|------|----------|---------|-------------|\n");

    for prop in &record.props {
        let required = if prop.required { "✅" } else { "❌" };
        let default = prop
            .default
            .as_ref()
            .map_or_else(|| "-".to_string(), |d| format!("`{d}`"));
        let _ = writeln!(
            out,
            "| `{}` | `{}` | {required} | {default} | {} |",
            prop.name, prop.prop_type, prop.description
        );
    }

    out.push('\n');
    out
}

/// Renders the category overview.
pub fn categories(meta: &CatalogMetadata, include_subcategories: bool, include_stats: bool) -> String {
    let mut out = String::from("# Vue Bits Component Categories\n\n");

    if include_stats {
        let _ = writeln!(out, "**Total Components:** {}\n", meta.total_components);
    }

    for (category, summary) in &meta.categories {
        let _ = writeln!(out, "## {category}");
        if include_stats {
            let _ = writeln!(out, "**Count:** {} components", summary.count);
        }
        if include_subcategories && !summary.subcategories.is_empty() {
            out.push_str("**Subcategories:**\n");
            for sub in &summary.subcategories {
                let _ = writeln!(out, "- {sub}");
            }
        }
        out.push('\n');
    }

    out
}

/// Renders the installation guide for one component.
pub fn installation_guide(record: &ComponentRecord, project: ProjectType) -> String {
    let dependencies = if record.dependencies.is_empty() {
        vec!["vue@^3.0.0".to_string()]
    } else {
        record.dependencies.clone()
    };
    let import = format!(
        "import {} from '{}/{}.vue';",
        record.name,
        project.components_dir(),
        record.name
    );
    // Only components that declare a `text` prop get the sample attribute.
    let text_attr = if record.props.iter().any(|p| p.name == "text") {
        " text=\"Hello World\""
    } else {
        ""
    };

    let mut out = String::new();
    let _ = writeln!(out, "# Installation Guide: {}\n", record.name);

    out.push_str("## 1. Install Dependencies\n\n");
    let _ = writeln!(out, "```bash\nnpm install {}\n```\n", dependencies.join(" "));

    out.push_str("## 2. Import Component\n\n");
    let _ = writeln!(out, "```javascript\n{import}\n```\n");

    out.push_str("## 3. Basic Usage\n\n");
    let _ = writeln!(
        out,
        "```vue\n<template>\n  <{}{text_attr} />\n</template>\n\n<script setup>\n{import}\n</script>\n```\n",
        record.name
    );

    out.push_str("## Notes\n\n");
    out.push_str("- Make sure to install all required dependencies\n");
    out.push_str("- Some components may require additional CSS imports\n");
    out.push_str("- Check the component props for customization options\n");
    if project == ProjectType::Nuxt3 {
        out.push_str("- Nuxt auto-imports components placed in `~/components`, so the import is optional\n");
    }
    out.push('\n');
    out
}

/// Renders the combined dependency analysis of several components.
pub fn dependency_analysis(records: &[&ComponentRecord], manager: PackageManager) -> String {
    let mut usage: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for record in records {
        for dep in &record.dependencies {
            usage.entry(dep.as_str()).or_default().push(record.name.as_str());
        }
    }

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let mut out = String::from("# Dependency Analysis\n\n");
    let _ = writeln!(out, "**Components analyzed:** {}\n", names.join(", "));

    if usage.is_empty() {
        out.push_str("No external dependencies required.\n");
    } else {
        let deps: Vec<&str> = usage.keys().copied().collect();
        out.push_str("## Installation Command\n\n");
        let _ = writeln!(
            out,
            "```bash\n{} {}\n```\n",
            manager.install_command(),
            deps.join(" ")
        );

        out.push_str("## Dependency Details\n\n");
        for (dep, users) in &usage {
            let _ = writeln!(out, "### {dep}");
            let _ = writeln!(out, "Used by: {}\n", users.join(", "));
        }
    }

    out
}

/// Renders the similar-components list.
pub fn similar_components(records: &[&ComponentRecord], reference_id: &str) -> String {
    let mut out = String::from("# Similar Components\n\n");

    if records.is_empty() {
        let _ = writeln!(out, "No similar components found for ID: {reference_id}");
        return out;
    }

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}", i + 1, record.name);
        let _ = writeln!(out, "- **ID:** `{}`", record.id);
        let _ = writeln!(out, "- **Category:** {} > {}", record.category, record.subcategory);
        let _ = writeln!(out, "- **Description:** {}", record.description);
        let _ = writeln!(out, "- **Shared tags:** {}\n", record.tags.join(", "));
    }

    out
}

/// Renders the popular-components list.
pub fn popular_components(records: &[&ComponentRecord], category: Option<&str>) -> String {
    let mut out = String::from("# Popular Vue Bits Components\n\n");

    if let Some(category) = category {
        let _ = writeln!(out, "**Category:** {category}\n");
    }

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}", i + 1, record.name);
        let _ = writeln!(out, "- **Category:** {} > {}", record.category, record.subcategory);
        let _ = writeln!(
            out,
            "- **Complexity:** {} | **Performance:** {}",
            record.complexity, record.performance
        );
        let _ = writeln!(out, "- **Description:** {}\n", record.description);
    }

    out
}

/// Renders recommendations together with the preferences they answer.
pub fn recommendations(records: &[&ComponentRecord], prefs: &Preferences) -> String {
    let mut out = String::from("# Component Recommendations\n\n");

    out.push_str("**Based on your preferences:**\n");
    if !prefs.categories.is_empty() {
        let names: Vec<&str> = prefs.categories.iter().map(|c| c.as_str()).collect();
        let _ = writeln!(out, "- Categories: {}", names.join(", "));
    }
    if let Some(complexity) = prefs.complexity {
        let _ = writeln!(out, "- Complexity: {complexity}");
    }
    if let Some(performance) = prefs.performance {
        let _ = writeln!(out, "- Performance: {performance}");
    }
    if !prefs.tags.is_empty() {
        let _ = writeln!(out, "- Tags: {}", prefs.tags.join(", "));
    }
    out.push('\n');

    if records.is_empty() {
        out.push_str("No components match your preferences. Try adjusting your criteria.\n");
        return out;
    }

    let complexity = prefs.complexity.map_or("preferred", |c| c.as_str());
    let performance = prefs.performance.map_or("performance", |p| p.as_str());

    for (i, record) in records.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}", i + 1, record.name);
        let _ = writeln!(out, "- **ID:** `{}`", record.id);
        let _ = writeln!(out, "- **Category:** {} > {}", record.category, record.subcategory);
        let _ = writeln!(out, "- **Description:** {}", record.description);
        let _ = writeln!(
            out,
            "- **Why recommended:** Matches your {complexity} complexity and {performance} requirements\n"
        );
    }

    out
}

/// Renders library-wide statistics.
pub fn metadata(
    meta: &CatalogMetadata,
    include_stats: bool,
    include_dependencies: bool,
    include_tags: bool,
) -> String {
    let mut out = String::from("# Vue Bits Component Library Metadata\n\n");

    if include_stats {
        out.push_str("## Statistics\n\n");
        let _ = writeln!(out, "- **Total Components:** {}", meta.total_components);
        let _ = writeln!(out, "- **Categories:** {}", meta.categories.len());
        let _ = writeln!(out, "- **Unique Dependencies:** {}", meta.dependencies.len());
        let _ = writeln!(out, "- **Total Tags:** {}\n", meta.tags.len());

        out.push_str("### Components by Category\n\n");
        for (category, summary) in &meta.categories {
            let _ = writeln!(out, "- **{category}:** {} components", summary.count);
        }
        out.push('\n');
    }

    if include_dependencies && !meta.dependencies.is_empty() {
        out.push_str("## Most Used Dependencies\n\n");
        for (i, dep) in meta.dependencies.iter().take(TOP_DEPENDENCIES).enumerate() {
            let _ = writeln!(out, "{}. **{}** - Used by {} components", i + 1, dep.name, dep.count);
        }
        out.push('\n');
    }

    if include_tags && !meta.tags.is_empty() {
        out.push_str("## Popular Tags\n\n");
        for (i, tag) in meta.tags.iter().take(TOP_TAGS).enumerate() {
            let _ = writeln!(out, "{}. **{}** ({} components)", i + 1, tag.name, tag.count);
        }
        out.push('\n');
    }

    out
}

fn or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::record;
    use crate::catalog::{Catalog, Category, ComponentProp};
    use crate::search::SearchEngine;

    fn prop(name: &str, required: bool, default: Option<&str>) -> ComponentProp {
        ComponentProp {
            name: name.to_string(),
            prop_type: "string".to_string(),
            required,
            default: default.map(str::to_string),
            description: format!("The {name}"),
            options: Vec::new(),
        }
    }

    #[test]
    fn empty_search_suggests_alternatives() {
        let out = search_results(&[], 0, "zzz", None);
        assert!(out.contains("**Query:** \"zzz\""));
        assert!(out.contains("**Found:** 0 of 0 components"));
        assert!(out.contains("No components found matching your criteria."));
        assert!(!out.contains("**Filters:**"));
    }

    #[test]
    fn search_entry_lists_dependencies_or_none() {
        let mut a = record("a", "Aurora", Category::Backgrounds, "Aurora");
        a.dependencies = vec!["ogl".to_string()];
        let b = record("b", "Beams", Category::Backgrounds, "Beams");
        let out = search_results(&[&a, &b], 5, "", Some("{}"));
        assert!(out.contains("**Found:** 2 of 5 components"));
        assert!(out.contains("## 1. Aurora"));
        assert!(out.contains("- **Dependencies:** ogl"));
        assert!(out.contains("- **Dependencies:** None"));
        assert!(out.contains("**Next Steps:**"));
    }

    #[test]
    fn props_table_marks_required_and_defaults() {
        let mut r = record("a", "SplitText", Category::TextAnimations, "SplitText");
        r.props = vec![prop("text", true, None), prop("delay", false, Some("100"))];
        let out = component_props(&r);
        assert!(out.contains("| `text` | `string` | ✅ | - | The text |"));
        assert!(out.contains("| `delay` | `string` | ❌ | `100` | The delay |"));

        r.props.clear();
        assert!(component_props(&r).contains("no configurable props"));
    }

    #[test]
    fn code_listing_respects_include_flags() {
        let mut r = record("a", "SplitText", Category::TextAnimations, "SplitText");
        r.props = vec![prop("text", true, None)];
        r.dependencies = vec!["gsap".to_string()];
        assert!(component_code(&r, true, true).contains("## Props"));
        assert!(!component_code(&r, false, true).contains("## Props"));
        assert!(component_code(&r, false, false).contains("npm install gsap"));
    }

    #[test]
    fn install_guide_defaults_to_vue_dependency() {
        let r = record("a", "Aurora", Category::Backgrounds, "Aurora");
        let out = installation_guide(&r, ProjectType::Vue3);
        assert!(out.contains("npm install vue@^3.0.0"));
        assert!(out.contains("import Aurora from '@/components/Aurora.vue';"));

        let nuxt = installation_guide(&r, ProjectType::Nuxt3);
        assert!(nuxt.contains("import Aurora from '~/components/Aurora.vue';"));
    }

    #[test]
    fn install_guide_sample_text_only_for_text_prop() {
        let mut split = record("s", "SplitText", Category::TextAnimations, "SplitText");
        split.props = vec![prop("text", true, None)];
        let out = installation_guide(&split, ProjectType::Vue3);
        assert!(out.contains("<SplitText text=\"Hello World\" />"));

        let mut dock = record("d", "Dock", Category::Components, "Dock");
        dock.props = vec![prop("items", true, None)];
        let out = installation_guide(&dock, ProjectType::Vue3);
        assert!(out.contains("<Dock />"));
        assert!(!out.contains("Hello World"));
    }

    #[test]
    fn dependency_analysis_uses_package_manager() {
        let mut a = record("a", "Aurora", Category::Backgrounds, "Aurora");
        a.dependencies = vec!["ogl".to_string(), "gsap".to_string()];
        let mut b = record("b", "SplitText", Category::TextAnimations, "SplitText");
        b.dependencies = vec!["gsap".to_string()];

        let out = dependency_analysis(&[&a, &b], PackageManager::Pnpm);
        assert!(out.contains("pnpm add ogl gsap"));
        assert!(out.contains("### gsap\nUsed by: Aurora, SplitText"));

        let none = record("c", "Beams", Category::Backgrounds, "Beams");
        let out = dependency_analysis(&[&none], PackageManager::Yarn);
        assert!(out.ends_with("No external dependencies required.\n"));
    }

    #[test]
    fn metadata_truncates_tag_list() {
        let mut r = record("a", "Aurora", Category::Backgrounds, "Aurora");
        r.tags = (0..20).map(|i| format!("tag{i}")).collect();
        let engine = SearchEngine::new(Catalog::new(vec![r]));
        let out = metadata(&engine.metadata(), true, true, true);
        assert!(out.contains("- **Total Components:** 1"));
        assert!(out.contains("- **Categories:** 4"));
        assert!(out.contains("15. **tag14** (1 components)"));
        assert!(!out.contains("tag15"));
        assert!(!out.contains("## Most Used Dependencies"));
    }

    #[test]
    fn recommendations_echo_preferences() {
        let prefs = Preferences {
            categories: vec![Category::Backgrounds],
            tags: vec!["3d".to_string()],
            ..Preferences::default()
        };
        let out = recommendations(&[], &prefs);
        assert!(out.contains("- Categories: Backgrounds"));
        assert!(out.contains("- Tags: 3d"));
        assert!(out.contains("No components match your preferences."));
    }
}
