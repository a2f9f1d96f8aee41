//! Best-effort extraction of component metadata from `.vue` sources.
//!
//! The scanner expects the Vue Bits layout:
//!
//! ```text
//! <root>/src/content/<Category>/<Subcategory>/**/*.vue
//! ```
//!
//! Props, defaults and imports are scraped with regular expressions. This
//! is not a parser: anything the patterns do not recognise simply yields
//! fewer props or tags. Scraping never fails a scan; only directory I/O
//! does.

use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info, warn};

use super::{Category, ComponentProp, ComponentRecord, Complexity, Performance};
use crate::error::CatalogError;

/// Scans a Vue Bits checkout into component records.
pub struct ComponentParser {
    root: PathBuf,
    script_block: Regex,
    props_interface: Regex,
    prop_field: Regex,
    with_defaults: Regex,
    default_entry: Regex,
    import_from: Regex,
    lifecycle_hook: Regex,
}

impl ComponentParser {
    /// Creates a parser rooted at the Vue Bits checkout `root`.
    ///
    /// # Errors
    ///
    /// Returns an error if a scraping pattern fails to compile.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Ok(Self {
            root: root.into(),
            script_block: Regex::new(r"(?s)<script[^>]*>(.*?)</script>")?,
            props_interface: Regex::new(r"interface\s+(\w+Props)\s*\{([^}]+)\}")?,
            prop_field: Regex::new(r"(\w+)(\?)?:\s*([^;\n]+);?")?,
            with_defaults: Regex::new(r"withDefaults\([^,]+,\s*\{([^}]+)\}")?,
            default_entry: Regex::new(r"(\w+):\s*([^,\n]+)")?,
            import_from: Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#)?,
            lifecycle_hook: Regex::new(r"useEffect|onMounted")?,
        })
    }

    /// Returns the checkout root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans every category under `<root>/src/content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory is missing or a directory
    /// listing fails.
    pub fn parse_all(&self) -> Result<Vec<ComponentRecord>, CatalogError> {
        let content = self.root.join("src").join("content");
        if !content.is_dir() {
            return Err(CatalogError::SourceNotFound {
                path: self.root.clone(),
            });
        }

        info!(path = %content.display(), "Scanning Vue Bits components");

        let mut records = Vec::new();
        for (dir_name, category_path) in sorted_subdirs(&content)? {
            let Some(category) = Category::from_name(&dir_name) else {
                warn!(directory = %dir_name, "Skipping unknown component category");
                continue;
            };
            for (subcategory, sub_path) in sorted_subdirs(&category_path)? {
                self.parse_subcategory(category, &subcategory, &sub_path, &mut records)?;
            }
        }

        info!(count = records.len(), "Parsed components");
        Ok(records)
    }

    fn parse_subcategory(
        &self,
        category: Category,
        subcategory: &str,
        dir: &Path,
        out: &mut Vec<ComponentRecord>,
    ) -> Result<(), CatalogError> {
        let pattern = format!(
            "{}/**/*.vue",
            glob::Pattern::escape(&dir.to_string_lossy())
        );

        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable source entry");
                    continue;
                }
            };

            let source = match std::fs::read_to_string(&path) {
                Ok(source) => source,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable component");
                    continue;
                }
            };

            let relative = path.strip_prefix(&self.root).unwrap_or(&path);
            let record = self.parse_source(category, subcategory, relative, &source);
            debug!(id = %record.id, name = %record.name, "Parsed component");
            out.push(record);
        }

        Ok(())
    }

    /// Builds a record from one source file.
    ///
    /// `file_path` is stored as given and its stem becomes the component name.
    #[must_use]
    pub fn parse_source(
        &self,
        category: Category,
        subcategory: &str,
        file_path: &Path,
        source: &str,
    ) -> ComponentRecord {
        let name = file_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let script = self.script_content(source);
        let props = self.extract_props(&script);
        let dependencies = self.extract_dependencies(source);
        let tags = generate_tags(&name, category, &dependencies, source);
        let complexity = self.assess_complexity(source, &dependencies);
        let performance = assess_performance(&dependencies, source);

        ComponentRecord {
            id: component_id(category, subcategory),
            description: describe(&name, category),
            name,
            category,
            subcategory: subcategory.to_string(),
            file_path: file_path.to_string_lossy().replace('\\', "/"),
            code: source.to_string(),
            props,
            dependencies,
            tags,
            examples: Vec::new(),
            complexity,
            performance,
        }
    }

    fn script_content(&self, source: &str) -> String {
        self.script_block
            .captures_iter(source)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn extract_props(&self, script: &str) -> Vec<ComponentProp> {
        let mut props: Vec<ComponentProp> = Vec::new();

        for interface in self.props_interface.captures_iter(script) {
            let Some(body) = interface.get(2) else {
                continue;
            };
            for field in self.prop_field.captures_iter(body.as_str()) {
                let (Some(name), Some(ty)) = (field.get(1), field.get(3)) else {
                    continue;
                };
                let prop_type = ty.as_str().trim().trim_end_matches(',').trim().to_string();
                props.push(ComponentProp {
                    name: name.as_str().to_string(),
                    description: describe_prop(name.as_str(), &prop_type),
                    prop_type,
                    required: field.get(2).is_none(),
                    default: None,
                    options: Vec::new(),
                });
            }
        }

        if let Some(defaults) = self.with_defaults.captures(script).and_then(|c| c.get(1)) {
            for entry in self.default_entry.captures_iter(defaults.as_str()) {
                let (Some(name), Some(value)) = (entry.get(1), entry.get(2)) else {
                    continue;
                };
                if let Some(prop) = props.iter_mut().find(|p| p.name == name.as_str()) {
                    prop.default = Some(value.as_str().trim().to_string());
                }
            }
        }

        props
    }

    fn extract_dependencies(&self, source: &str) -> Vec<String> {
        let mut deps: Vec<String> = Vec::new();
        for capture in self.import_from.captures_iter(source) {
            let Some(path) = capture.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if path.starts_with('.') || path.starts_with("@/") {
                continue;
            }
            if !deps.iter().any(|d| d == path) {
                deps.push(path.to_string());
            }
        }
        deps
    }

    fn assess_complexity(&self, source: &str, deps: &[String]) -> Complexity {
        let has = |name: &str| deps.iter().any(|d| d == name);
        let mut score = 0;

        if has("three") {
            score += 3;
        }
        if has("gsap") {
            score += 2;
        }
        if has("matter-js") {
            score += 2;
        }

        if source.chars().count() > 5000 {
            score += 2;
        }
        if source.contains("WebGL") {
            score += 2;
        }
        if source.contains("canvas") {
            score += 1;
        }
        if self.lifecycle_hook.find_iter(source).count() > 3 {
            score += 1;
        }

        match score {
            s if s >= 6 => Complexity::Complex,
            s if s >= 3 => Complexity::Medium,
            _ => Complexity::Simple,
        }
    }
}

/// Derives the slug id for a category/subcategory pair.
#[must_use]
pub fn component_id(category: Category, subcategory: &str) -> String {
    let sub = subcategory
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{sub}", category.as_str().to_lowercase())
}

fn sorted_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, CatalogError> {
    let read_err = |e| CatalogError::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push((entry.file_name().to_string_lossy().into_owned(), path));
        }
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

fn generate_tags(name: &str, category: Category, deps: &[String], source: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut add = |tag: &str| {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };
    let has = |dep: &str| deps.iter().any(|d| d == dep);

    add(&category.as_str().to_lowercase());

    if has("gsap") {
        add("gsap");
    }
    if has("three") {
        add("3d");
    }
    if has("matter-js") {
        add("physics");
    }

    if source.contains("ScrollTrigger") {
        add("scroll");
    }
    if source.contains("mouse") || source.contains("cursor") {
        add("interactive");
    }
    if source.contains("canvas") {
        add("canvas");
    }
    if source.contains("WebGL") {
        add("webgl");
    }

    let lower = name.to_lowercase();
    for keyword in ["text", "card", "button", "hover"] {
        if lower.contains(keyword) {
            add(keyword);
        }
    }

    tags
}

fn assess_performance(deps: &[String], source: &str) -> Performance {
    let has = |name: &str| deps.iter().any(|d| d == name);
    let mut score: i32 = 0;

    if has("three") {
        score -= 2;
    }
    if has("matter-js") {
        score -= 1;
    }
    if source.contains("requestAnimationFrame") {
        score += 1;
    }
    if source.contains("WebGL") {
        score -= 1;
    }
    if source.contains("canvas") {
        score -= 1;
    }

    match score {
        s if s >= 1 => Performance::High,
        s if s >= -1 => Performance::Medium,
        _ => Performance::Low,
    }
}

fn describe(name: &str, category: Category) -> String {
    let known = match name {
        "SplitText" => Some(
            "Animated text component that splits text into characters, words, or lines with customizable animations",
        ),
        "BlurText" => Some("Text animation with blur effects and smooth transitions"),
        "CircularText" => Some("Text arranged in a circular pattern with rotation animations"),
        "ShinyText" => Some("Text with metallic shine and reflection effects"),
        _ => None,
    };

    known.map_or_else(
        || {
            format!(
                "{name} - A {} component with advanced animation capabilities",
                category.as_str().to_lowercase()
            )
        },
        str::to_string,
    )
}

fn describe_prop(name: &str, prop_type: &str) -> String {
    let known = match name {
        "text" => Some("The text content to display"),
        "className" => Some("Additional CSS classes to apply"),
        "delay" => Some("Animation delay in milliseconds"),
        "duration" => Some("Animation duration in seconds"),
        "ease" => Some("Animation easing function"),
        "threshold" => Some("Intersection observer threshold"),
        "rootMargin" => Some("Root margin for intersection observer"),
        _ => None,
    };

    known.map_or_else(
        || format!("{name} property of type {prop_type}"),
        str::to_string,
    )
}
