//! The ten catalogue tools exposed over MCP.
//!
//! [`ToolHandlers::call`] maps a tool name and its JSON arguments to one
//! read-only query against the [`SearchEngine`] and renders the answer as
//! Markdown. Every failure, including unknown tools and malformed
//! arguments, comes back as an `isError` result rather than a protocol
//! error.

pub mod definitions;
pub mod format;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::{Category, ComponentRecord, Complexity, Performance};
use crate::error::ToolError;
use crate::search::{Preferences, Scorer, SearchEngine, SearchFilters, WeightedScorer};

pub use definitions::TOOL_NAMES;

/// A tool definition for the `tools/list` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if passes &T
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }

    /// Returns the concatenated text of all content items.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolContent::Text { text } => text.as_str(),
            })
            .collect()
    }
}

impl From<ToolError> for ToolCallResult {
    fn from(e: ToolError) -> Self {
        if e.is_lookup_miss() {
            Self::error(e.to_string())
        } else {
            Self::error(format!("Error: {e}"))
        }
    }
}

/// Target project flavour for installation guides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    /// Plain Vue 3.
    #[default]
    Vue3,
    /// Nuxt 3.
    Nuxt3,
    /// Vite.
    Vite,
    /// Webpack.
    Webpack,
}

impl ProjectType {
    /// Import prefix of the components directory.
    #[must_use]
    pub const fn components_dir(self) -> &'static str {
        match self {
            Self::Nuxt3 => "~/components",
            Self::Vue3 | Self::Vite | Self::Webpack => "@/components",
        }
    }
}

/// Package manager used in install commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    /// npm.
    #[default]
    Npm,
    /// Yarn.
    Yarn,
    /// pnpm.
    Pnpm,
}

impl PackageManager {
    /// The command that adds packages.
    #[must_use]
    pub const fn install_command(self) -> &'static str {
        match self {
            Self::Npm => "npm install",
            Self::Yarn => "yarn add",
            Self::Pnpm => "pnpm add",
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_limit() -> usize {
    10
}

const fn default_similar_limit() -> usize {
    5
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchArgs {
    #[serde(default)]
    query: String,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    subcategory: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    complexity: Option<Complexity>,
    #[serde(default)]
    performance: Option<Performance>,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComponentRef {
    #[serde(default)]
    component_id: Option<String>,
    #[serde(default)]
    component_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeArgs {
    #[serde(flatten)]
    component: ComponentRef,
    #[serde(default = "default_true")]
    include_props: bool,
    #[serde(default = "default_true")]
    include_examples: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesArgs {
    #[serde(default = "default_true")]
    include_subcategories: bool,
    #[serde(default = "default_true")]
    include_stats: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstallArgs {
    #[serde(flatten)]
    component: ComponentRef,
    #[serde(default)]
    project_type: ProjectType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeArgs {
    component_ids: Vec<String>,
    // `includeDevDependencies` is accepted and ignored: the catalogue only
    // records runtime imports.
    #[serde(default)]
    package_manager: PackageManager,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimilarArgs {
    component_id: String,
    #[serde(default = "default_similar_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PopularArgs {
    #[serde(default)]
    category: Option<Category>,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataArgs {
    #[serde(default = "default_true")]
    include_stats: bool,
    #[serde(default = "default_true")]
    include_dependencies: bool,
    #[serde(default = "default_true")]
    include_tags: bool,
}

/// Executes tool calls against a search engine.
#[derive(Debug)]
pub struct ToolHandlers<S = WeightedScorer> {
    engine: SearchEngine<S>,
}

impl<S: Scorer> ToolHandlers<S> {
    /// Creates handlers over `engine`.
    #[must_use]
    pub const fn new(engine: SearchEngine<S>) -> Self {
        Self { engine }
    }

    /// Returns the underlying engine.
    #[must_use]
    pub const fn engine(&self) -> &SearchEngine<S> {
        &self.engine
    }

    /// Runs tool `name` with `arguments`.
    ///
    /// Never fails at the protocol level: errors are folded into an
    /// `isError` result.
    pub fn call(&self, name: &str, arguments: &Value) -> ToolCallResult {
        match self.dispatch(name, arguments) {
            Ok(text) => ToolCallResult::text(text),
            Err(e) => {
                tracing::debug!(tool = name, error = %e, "Tool call failed");
                e.into()
            }
        }
    }

    fn dispatch(&self, name: &str, arguments: &Value) -> Result<String, ToolError> {
        match name {
            definitions::SEARCH_COMPONENTS => self.search(parse_args(name, arguments)?),
            definitions::GET_COMPONENT_CODE => {
                let args: CodeArgs = parse_args(name, arguments)?;
                let record = self.resolve(&args.component)?;
                Ok(format::component_code(record, args.include_props, args.include_examples))
            }
            definitions::GET_COMPONENT_PROPS => {
                let args: ComponentRef = parse_args(name, arguments)?;
                Ok(format::component_props(self.resolve(&args)?))
            }
            definitions::LIST_CATEGORIES => {
                let args: CategoriesArgs = parse_args(name, arguments)?;
                Ok(format::categories(
                    &self.engine.metadata(),
                    args.include_subcategories,
                    args.include_stats,
                ))
            }
            definitions::GET_INSTALLATION_GUIDE => {
                let args: InstallArgs = parse_args(name, arguments)?;
                let record = self.resolve(&args.component)?;
                Ok(format::installation_guide(record, args.project_type))
            }
            definitions::ANALYZE_DEPENDENCIES => {
                let args: AnalyzeArgs = parse_args(name, arguments)?;
                let records: Vec<&ComponentRecord> = args
                    .component_ids
                    .iter()
                    .filter_map(|id| self.engine.get_by_id(id))
                    .collect();
                if records.is_empty() {
                    return Err(ToolError::NoValidComponents);
                }
                Ok(format::dependency_analysis(&records, args.package_manager))
            }
            definitions::GET_SIMILAR_COMPONENTS => {
                let args: SimilarArgs = parse_args(name, arguments)?;
                if self.engine.get_by_id(&args.component_id).is_none() {
                    return Err(ToolError::ComponentNotFound);
                }
                let similar = self.engine.similar(&args.component_id, args.limit);
                Ok(format::similar_components(&similar, &args.component_id))
            }
            definitions::GET_POPULAR_COMPONENTS => {
                let args: PopularArgs = parse_args(name, arguments)?;
                let popular = self.engine.popular(args.limit, args.category);
                Ok(format::popular_components(
                    &popular,
                    args.category.map(Category::as_str),
                ))
            }
            definitions::GET_RECOMMENDATIONS => {
                let prefs: Preferences = parse_args(name, arguments)?;
                let recs = self.engine.recommendations(&prefs);
                Ok(format::recommendations(&recs, &prefs))
            }
            definitions::GET_COMPONENT_METADATA => {
                let args: MetadataArgs = parse_args(name, arguments)?;
                Ok(format::metadata(
                    &self.engine.metadata(),
                    args.include_stats,
                    args.include_dependencies,
                    args.include_tags,
                ))
            }
            _ => Err(ToolError::UnknownTool(name.to_string())),
        }
    }

    fn search(&self, args: SearchArgs) -> Result<String, ToolError> {
        let filters = SearchFilters {
            category: args.category,
            subcategory: args.subcategory,
            tags: args.tags,
            complexity: args.complexity,
            performance: args.performance,
            has_props: Vec::new(),
        };
        let result = self.engine.search(&args.query, &filters);
        let page: Vec<&ComponentRecord> = result.records.into_iter().take(args.limit).collect();

        let filters_json = if filters.is_empty() {
            None
        } else {
            Some(serde_json::to_string_pretty(&filters).map_err(ToolError::Serialise)?)
        };

        Ok(format::search_results(
            &page,
            result.total,
            &args.query,
            filters_json.as_deref(),
        ))
    }

    /// Resolves a record by id, falling back to a case-insensitive name.
    fn resolve(&self, component: &ComponentRef) -> Result<&ComponentRecord, ToolError> {
        let found = match (&component.component_id, &component.component_name) {
            (Some(id), _) => self.engine.get_by_id(id),
            (None, Some(name)) => self.engine.get_by_name(name),
            (None, None) => return Err(ToolError::MissingComponentRef),
        };
        found.ok_or(ToolError::ComponentNotFound)
    }
}

/// Deserialises tool arguments, treating absent arguments as `{}`.
fn parse_args<T: DeserializeOwned>(tool: &str, arguments: &Value) -> Result<T, ToolError> {
    let value = if arguments.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        arguments.clone()
    };
    serde_json::from_value(value).map_err(|source| ToolError::InvalidArguments {
        tool: tool.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::record;
    use crate::catalog::Catalog;
    use serde_json::json;

    fn handlers() -> ToolHandlers {
        let mut split = record(
            "textanimations-split-text",
            "SplitText",
            Category::TextAnimations,
            "SplitText",
        );
        split.tags = vec!["textanimations".into(), "gsap".into(), "text".into()];
        split.dependencies = vec!["gsap".into()];

        let mut aurora = record("backgrounds-aurora", "Aurora", Category::Backgrounds, "Aurora");
        aurora.dependencies = vec!["ogl".into()];
        aurora.complexity = Complexity::Complex;

        ToolHandlers::new(SearchEngine::new(Catalog::new(vec![split, aurora])))
    }

    #[test]
    fn tool_call_result_text() {
        let result = ToolCallResult::text("Hello, world!");
        assert!(!result.is_error);
        assert_eq!(result.joined_text(), "Hello, world!");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({"content": [{"type": "text", "text": "Hello, world!"}]}));
    }

    #[test]
    fn tool_call_result_error() {
        let result = ToolCallResult::error("Something went wrong");
        assert!(result.is_error);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isError"], true);
    }

    #[test]
    fn unknown_tool_is_an_error_payload() {
        let result = handlers().call("nope", &json!({}));
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Error: Unknown tool: nope");
    }

    #[test]
    fn missing_component_is_reported_plainly() {
        let result = handlers().call("get_component_code", &json!({"componentId": "missing"}));
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Component not found");
    }

    #[test]
    fn code_falls_back_to_name_lookup() {
        let result = handlers().call("get_component_code", &json!({"componentName": "aurora"}));
        assert!(!result.is_error);
        assert!(result.joined_text().starts_with("# Aurora Component"));
    }

    #[test]
    fn component_ref_is_required() {
        let result = handlers().call("get_component_props", &Value::Null);
        assert!(result.is_error);
        assert!(result.joined_text().contains("componentId or componentName"));
    }

    #[test]
    fn search_applies_limit_and_reports_total() {
        let result = handlers().call("search_vue_components", &json!({"limit": 1}));
        let text = result.joined_text();
        assert!(text.contains("**Found:** 1 of 2 components"));
        assert!(text.contains("## 1. SplitText"));
        assert!(!text.contains("Aurora"));
    }

    #[test]
    fn search_echoes_filters() {
        let result = handlers().call(
            "search_vue_components",
            &json!({"query": "split", "category": "TextAnimations"}),
        );
        let text = result.joined_text();
        assert!(text.contains("**Query:** \"split\""));
        assert!(text.contains("\"category\": \"TextAnimations\""));
    }

    #[test]
    fn invalid_arguments_are_an_error_payload() {
        let result = handlers().call("search_vue_components", &json!({"limit": "ten"}));
        assert!(result.is_error);
        assert!(result.joined_text().starts_with("Error: Invalid arguments for search_vue_components"));
    }

    #[test]
    fn analyze_dependencies_drops_unknown_ids() {
        let h = handlers();
        let result = h.call(
            "analyze_dependencies",
            &json!({"componentIds": ["missing", "backgrounds-aurora"], "packageManager": "yarn"}),
        );
        assert!(!result.is_error);
        assert!(result.joined_text().contains("yarn add ogl"));

        let result = h.call("analyze_dependencies", &json!({"componentIds": ["missing"]}));
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "No valid components found");
    }

    #[test]
    fn include_dev_dependencies_does_not_change_the_report() {
        let h = handlers();
        let ids = ["textanimations-split-text", "backgrounds-aurora"];
        let plain = h.call("analyze_dependencies", &json!({"componentIds": ids}));
        let with_dev = h.call(
            "analyze_dependencies",
            &json!({"componentIds": ids, "includeDevDependencies": true}),
        );

        assert!(!with_dev.is_error);
        assert_eq!(with_dev.joined_text(), plain.joined_text());
        assert!(!with_dev.joined_text().contains("Development"));
    }

    #[test]
    fn similar_with_unknown_reference_is_not_found() {
        let result = handlers().call("get_similar_components", &json!({"componentId": "missing"}));
        assert!(result.is_error);
        assert_eq!(result.joined_text(), "Component not found");
    }

    #[test]
    fn popular_filters_by_category() {
        let result = handlers().call("get_popular_components", &json!({"category": "Backgrounds"}));
        let text = result.joined_text();
        assert!(text.contains("**Category:** Backgrounds"));
        assert!(text.contains("## 1. Aurora"));
        assert!(!text.contains("SplitText"));
    }

    #[test]
    fn recommendations_and_metadata_render() {
        let h = handlers();
        let recs = h.call("get_recommendations", &json!({"tags": ["gsap"]}));
        assert!(recs.joined_text().contains("## 1. SplitText"));

        let meta = h.call("get_component_metadata", &json!({"includeTags": false}));
        let text = meta.joined_text();
        assert!(text.contains("- **Total Components:** 2"));
        assert!(!text.contains("## Popular Tags"));

        let cats = h.call("list_categories", &json!({}));
        assert!(cats.joined_text().contains("## TextAnimations\n**Count:** 1 components"));
    }
}
