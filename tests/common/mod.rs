//! Shared fixtures for integration tests.

#![allow(dead_code)]

use serde_json::json;

use vue_bits_mcp::catalog::{Catalog, ComponentRecord};
use vue_bits_mcp::mcp::McpHandler;
use vue_bits_mcp::search::SearchEngine;
use vue_bits_mcp::tools::ToolHandlers;

/// A small catalogue in cache-file form.
pub fn records() -> Vec<ComponentRecord> {
    serde_json::from_value(json!([
        {
            "id": "textanimations-splittext",
            "name": "SplitText",
            "category": "TextAnimations",
            "subcategory": "SplitText",
            "description": "Animated text that splits into characters with staggered animations",
            "filePath": "src/content/TextAnimations/SplitText/SplitText.vue",
            "code": "<template><p>{{ text }}</p></template>",
            "props": [
                {"name": "text", "type": "string", "required": true, "description": "Text to animate"},
                {"name": "delay", "type": "number", "required": false, "default": "100", "description": "Delay between letters"}
            ],
            "dependencies": ["gsap"],
            "tags": ["textanimations", "gsap", "text", "animation"],
            "complexity": "medium",
            "performance": "high"
        },
        {
            "id": "textanimations-blurtext",
            "name": "BlurText",
            "category": "TextAnimations",
            "subcategory": "BlurText",
            "description": "Text that animates in with a blur effect",
            "filePath": "src/content/TextAnimations/BlurText/BlurText.vue",
            "code": "<template><p>{{ text }}</p></template>",
            "props": [
                {"name": "text", "type": "string", "required": false, "default": "''", "description": ""}
            ],
            "dependencies": ["motion-v"],
            "tags": ["textanimations", "text", "blur"],
            "complexity": "simple",
            "performance": "high"
        },
        {
            "id": "backgrounds-aurora",
            "name": "Aurora",
            "category": "Backgrounds",
            "subcategory": "Aurora",
            "description": "Flowing aurora borealis background",
            "filePath": "src/content/Backgrounds/Aurora/Aurora.vue",
            "code": "<template><canvas ref=\"canvas\" /></template>",
            "props": [],
            "dependencies": ["ogl", "gsap"],
            "tags": ["backgrounds", "webgl", "3d"],
            "complexity": "complex",
            "performance": "low"
        },
        {
            "id": "components-dock",
            "name": "Dock",
            "category": "Components",
            "subcategory": "Dock",
            "description": "macOS style magnifying dock",
            "filePath": "src/content/Components/Dock/Dock.vue",
            "code": "<template><nav /></template>",
            "props": [
                {"name": "items", "type": "DockItem[]", "required": true, "description": "Dock entries"}
            ],
            "dependencies": ["motion-v"],
            "tags": ["components", "interactive", "navigation"],
            "complexity": "medium",
            "performance": "medium"
        }
    ]))
    .expect("fixture records deserialise")
}

/// The fixture catalogue.
pub fn catalog() -> Catalog {
    Catalog::new(records())
}

/// A bare record with no props, tags or dependencies.
pub fn record(name: &str, category: &str) -> ComponentRecord {
    serde_json::from_value(json!({
        "id": format!("{}-{}", category.to_lowercase(), name.to_lowercase()),
        "name": name,
        "category": category,
        "subcategory": name,
        "description": format!("{name} component"),
        "complexity": "simple",
        "performance": "medium"
    }))
    .unwrap()
}

/// A request handler over the fixture catalogue.
pub fn handler() -> McpHandler {
    McpHandler::new(ToolHandlers::new(SearchEngine::new(catalog())))
}
