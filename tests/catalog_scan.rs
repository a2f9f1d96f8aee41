//! Integration tests for scanning a Vue Bits checkout and caching the result.

use std::fs;
use std::path::Path;

use vue_bits_mcp::catalog::{self, Category, Complexity};
use vue_bits_mcp::error::CatalogError;

const SPLIT_TEXT: &str = r#"<template>
  <p ref="el">{{ text }}</p>
</template>

<script setup lang="ts">
import { onMounted, ref } from 'vue'
import { gsap } from 'gsap'
import { useHelper } from './helper'

interface SplitTextProps {
  text: string;
  delay?: number;
  ease?: string;
}

const props = withDefaults(defineProps<SplitTextProps>(), {
  delay: 100,
  ease: 'power3.out'
})

onMounted(() => gsap.from('.char', { opacity: 0 }))
</script>
"#;

const AURORA: &str = r"<template>
  <div ref='container' />
</template>

<script setup lang='ts'>
import { Renderer, Program } from 'ogl'
</script>
";

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn checkout() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "src/content/TextAnimations/SplitText/SplitText.vue", SPLIT_TEXT);
    write(
        root,
        "src/content/TextAnimations/SplitText/SplitTextDemo.vue",
        "<template><SplitText /></template>",
    );
    write(root, "src/content/Backgrounds/Aurora/Aurora.vue", AURORA);
    write(root, "src/content/Backgrounds/Aurora/README.md", "not a component");
    write(root, "src/content/Showcase/Hero/Hero.vue", "<template />");
    dir
}

#[test]
fn rebuild_scans_known_categories_and_writes_cache() {
    let source = checkout();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache_path = cache_dir.path().join("nested").join("components.json");

    let catalog = catalog::rebuild(source.path(), &cache_path).unwrap();

    // Backgrounds sorts before TextAnimations; the unknown category is skipped.
    let ids: Vec<&str> = catalog.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "backgrounds-aurora",
            "textanimations-splittext",
            "textanimations-splittext-split-text-demo",
        ]
    );
    assert!(cache_path.exists());

    let split = catalog.get("textanimations-splittext").unwrap();
    assert_eq!(split.name, "SplitText");
    assert_eq!(split.category, Category::TextAnimations);
    assert_eq!(split.file_path, "src/content/TextAnimations/SplitText/SplitText.vue");
    // Relative imports are not dependencies.
    assert_eq!(split.dependencies, ["vue", "gsap"]);

    let names: Vec<&str> = split.props.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["text", "delay", "ease"]);
    assert!(split.props[0].required);
    assert_eq!(split.props[1].default.as_deref(), Some("100"));

    let aurora = catalog.get("backgrounds-aurora").unwrap();
    assert_eq!(aurora.dependencies, ["ogl"]);
    assert_eq!(aurora.category, Category::Backgrounds);
}

#[test]
fn load_or_rebuild_prefers_cache() {
    let source = checkout();
    let cache_dir = tempfile::tempdir().unwrap();
    let cache_path = cache_dir.path().join("components.json");

    let first = catalog::load_or_rebuild(&cache_path, source.path());
    assert_eq!(first.len(), 3);

    // A new file on disk is not seen while the cache exists.
    write(source.path(), "src/content/Components/Dock/Dock.vue", "<template />");
    let second = catalog::load_or_rebuild(&cache_path, source.path());
    assert_eq!(second.len(), 3);
    assert_eq!(second.records(), first.records());

    let rebuilt = catalog::rebuild(source.path(), &cache_path).unwrap();
    assert_eq!(rebuilt.len(), 4);
}

#[test]
fn load_or_rebuild_degrades_to_empty() {
    let missing = tempfile::tempdir().unwrap();
    let cache_path = missing.path().join("components.json");

    let catalog = catalog::load_or_rebuild(&cache_path, &missing.path().join("no-checkout"));
    assert!(catalog.is_empty());
    assert!(!cache_path.exists());
}

#[test]
fn corrupt_cache_degrades_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("components.json");
    fs::write(&cache_path, "{ not json").unwrap();

    let catalog = catalog::load_or_rebuild(&cache_path, dir.path());
    assert!(catalog.is_empty());
}

#[test]
fn rebuild_fails_without_sources() {
    let dir = tempfile::tempdir().unwrap();
    let result = catalog::rebuild(&dir.path().join("absent"), &dir.path().join("c.json"));
    assert!(matches!(result, Err(CatalogError::SourceNotFound { .. })));
}

#[test]
fn simple_markup_only_component() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/content/Components/Dock/Dock.vue", "<template><nav /></template>");

    let catalog = catalog::rebuild(dir.path(), &dir.path().join("c.json")).unwrap();
    let dock = catalog.get("components-dock").unwrap();
    assert!(dock.props.is_empty());
    assert!(dock.dependencies.is_empty());
    assert_eq!(dock.complexity, Complexity::Simple);
}
