//! Static tool declarations returned by `tools/list`.

use serde_json::json;

use super::ToolDefinition;

/// Search tool name.
pub const SEARCH_COMPONENTS: &str = "search_vue_components";
/// Source listing tool name.
pub const GET_COMPONENT_CODE: &str = "get_component_code";
/// Props table tool name.
pub const GET_COMPONENT_PROPS: &str = "get_component_props";
/// Category listing tool name.
pub const LIST_CATEGORIES: &str = "list_categories";
/// Installation guide tool name.
pub const GET_INSTALLATION_GUIDE: &str = "get_installation_guide";
/// Dependency analysis tool name.
pub const ANALYZE_DEPENDENCIES: &str = "analyze_dependencies";
/// Similar components tool name.
pub const GET_SIMILAR_COMPONENTS: &str = "get_similar_components";
/// Popular components tool name.
pub const GET_POPULAR_COMPONENTS: &str = "get_popular_components";
/// Recommendations tool name.
pub const GET_RECOMMENDATIONS: &str = "get_recommendations";
/// Library metadata tool name.
pub const GET_COMPONENT_METADATA: &str = "get_component_metadata";

/// Every tool name, in `tools/list` order.
pub const TOOL_NAMES: [&str; 10] = [
    SEARCH_COMPONENTS,
    GET_COMPONENT_CODE,
    GET_COMPONENT_PROPS,
    LIST_CATEGORIES,
    GET_INSTALLATION_GUIDE,
    ANALYZE_DEPENDENCIES,
    GET_SIMILAR_COMPONENTS,
    GET_POPULAR_COMPONENTS,
    GET_RECOMMENDATIONS,
    GET_COMPONENT_METADATA,
];

const CATEGORY_ENUM: [&str; 4] = ["TextAnimations", "Animations", "Components", "Backgrounds"];
const COMPLEXITY_ENUM: [&str; 3] = ["simple", "medium", "complex"];
const PERFORMANCE_ENUM: [&str; 3] = ["high", "medium", "low"];

fn tool(name: &str, description: &str, input_schema: serde_json::Value) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: Some(description.to_string()),
        input_schema,
    }
}

/// Returns the definitions of all tools.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn all() -> Vec<ToolDefinition> {
    vec![
        tool(
            SEARCH_COMPONENTS,
            "Search for Vue Bits animated components by name, category, or functionality",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query (component name, functionality, or keywords)"
                    },
                    "category": {
                        "type": "string",
                        "enum": CATEGORY_ENUM,
                        "description": "Filter by component category"
                    },
                    "subcategory": {
                        "type": "string",
                        "description": "Filter by subcategory (e.g., \"Split Text\", \"Blur Text\")"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Filter by tags (e.g., [\"gsap\", \"3d\", \"interactive\"])"
                    },
                    "complexity": {
                        "type": "string",
                        "enum": COMPLEXITY_ENUM,
                        "description": "Filter by implementation complexity"
                    },
                    "performance": {
                        "type": "string",
                        "enum": PERFORMANCE_ENUM,
                        "description": "Filter by performance characteristics"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of results to return (default: 10)",
                        "default": 10
                    }
                }
            }),
        ),
        tool(
            GET_COMPONENT_CODE,
            "Get the complete Vue component source code and implementation details",
            json!({
                "type": "object",
                "properties": {
                    "componentId": {
                        "type": "string",
                        "description": "Component ID (from search results)"
                    },
                    "componentName": {
                        "type": "string",
                        "description": "Component name (alternative to ID)"
                    },
                    "includeProps": {
                        "type": "boolean",
                        "description": "Include detailed props documentation",
                        "default": true
                    },
                    "includeExamples": {
                        "type": "boolean",
                        "description": "Include usage examples",
                        "default": true
                    }
                }
            }),
        ),
        tool(
            GET_COMPONENT_PROPS,
            "Get detailed information about component properties and configuration options",
            json!({
                "type": "object",
                "properties": {
                    "componentId": {
                        "type": "string",
                        "description": "Component ID"
                    },
                    "componentName": {
                        "type": "string",
                        "description": "Component name (alternative to ID)"
                    }
                }
            }),
        ),
        tool(
            LIST_CATEGORIES,
            "List all available component categories and subcategories with counts",
            json!({
                "type": "object",
                "properties": {
                    "includeSubcategories": {
                        "type": "boolean",
                        "description": "Include subcategories in the response",
                        "default": true
                    },
                    "includeStats": {
                        "type": "boolean",
                        "description": "Include component counts and statistics",
                        "default": true
                    }
                }
            }),
        ),
        tool(
            GET_INSTALLATION_GUIDE,
            "Get installation and setup instructions for a specific component",
            json!({
                "type": "object",
                "properties": {
                    "componentId": {
                        "type": "string",
                        "description": "Component ID"
                    },
                    "componentName": {
                        "type": "string",
                        "description": "Component name (alternative to ID)"
                    },
                    "projectType": {
                        "type": "string",
                        "enum": ["vue3", "nuxt3", "vite", "webpack"],
                        "description": "Target project type for installation instructions",
                        "default": "vue3"
                    }
                }
            }),
        ),
        tool(
            ANALYZE_DEPENDENCIES,
            "Analyze dependencies required for components and get installation commands",
            json!({
                "type": "object",
                "properties": {
                    "componentIds": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of component IDs to analyze"
                    },
                    "includeDevDependencies": {
                        "type": "boolean",
                        "description": "Accepted for compatibility; the report lists runtime dependencies only",
                        "default": false
                    },
                    "packageManager": {
                        "type": "string",
                        "enum": ["npm", "yarn", "pnpm"],
                        "description": "Preferred package manager",
                        "default": "npm"
                    }
                },
                "required": ["componentIds"]
            }),
        ),
        tool(
            GET_SIMILAR_COMPONENTS,
            "Find components similar to a given component based on functionality and characteristics",
            json!({
                "type": "object",
                "properties": {
                    "componentId": {
                        "type": "string",
                        "description": "Reference component ID"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of similar components to return",
                        "default": 5
                    }
                },
                "required": ["componentId"]
            }),
        ),
        tool(
            GET_POPULAR_COMPONENTS,
            "Get the most popular and commonly used components",
            json!({
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "enum": CATEGORY_ENUM,
                        "description": "Filter by category"
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum number of components to return",
                        "default": 10
                    }
                }
            }),
        ),
        tool(
            GET_RECOMMENDATIONS,
            "Get personalized component recommendations based on preferences",
            json!({
                "type": "object",
                "properties": {
                    "categories": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": CATEGORY_ENUM
                        },
                        "description": "Preferred categories"
                    },
                    "complexity": {
                        "type": "string",
                        "enum": COMPLEXITY_ENUM,
                        "description": "Preferred complexity level"
                    },
                    "performance": {
                        "type": "string",
                        "enum": PERFORMANCE_ENUM,
                        "description": "Required performance level"
                    },
                    "tags": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Preferred tags/technologies"
                    },
                    "projectType": {
                        "type": "string",
                        "description": "Type of project (e.g., \"landing page\", \"dashboard\", \"portfolio\")"
                    }
                }
            }),
        ),
        tool(
            GET_COMPONENT_METADATA,
            "Get comprehensive metadata about the Vue Bits component library",
            json!({
                "type": "object",
                "properties": {
                    "includeStats": {
                        "type": "boolean",
                        "description": "Include detailed statistics",
                        "default": true
                    },
                    "includeDependencies": {
                        "type": "boolean",
                        "description": "Include dependency analysis",
                        "default": true
                    },
                    "includeTags": {
                        "type": "boolean",
                        "description": "Include tag statistics",
                        "default": true
                    }
                }
            }),
        ),
    ]
}
