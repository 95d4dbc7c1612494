//! Raw, partially-specified build options.
//!
//! This is the declarative input shape as an author writes it, mirroring the
//! familiar config-file layout:
//!
//! ```js
//! export default {
//!   plugins: [{ name: "vue" }],
//!   root: "src",
//!   base: "/static/",
//!   server: { origin: "http://localhost:5173", port: 5173 },
//!   build: { manifest: true, outDir: "..", emptyOutDir: false, assetsDir: ".",
//!            input: { home: "/home.js" } },
//!   resolve: { alias: { vue: "vue/dist/vue.esm.js" } },
//! };
//! ```
//!
//! Every field is optional here; [`crate::plan::resolve`] applies defaults and
//! validates. Nothing in this module touches the filesystem.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Partially-specified options object, before defaulting and validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOptions {
    /// Ordered plugin descriptors. Identity and order matter; contents are
    /// opaque and handed to the engine uninterpreted.
    pub plugins: Vec<PluginSpec>,

    /// Directory entry-point paths are resolved from.
    pub root: Option<String>,

    /// Public base path prefixed onto emitted asset URLs.
    pub base: Option<String>,

    /// Dev-server options.
    pub server: Option<ServerOptions>,

    /// Build output options.
    pub build: Option<BuildOptions>,

    /// Module resolution options.
    pub resolve: Option<ResolveOptions>,
}

/// An opaque plugin descriptor. Order within the plugin list is significant
/// for transform pipeline ordering; the resolver never interprets `options`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSpec {
    pub name: String,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub options: serde_json::Value,
}

impl PluginSpec {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: serde_json::Value::Null,
        }
    }
}

/// Dev-server options from the config file.
///
/// `port` is deliberately wider than a TCP port so out-of-range values (e.g.
/// 70000) survive deserialization and are rejected by validation instead of
/// by serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerOptions {
    pub origin: Option<String>,
    pub port: Option<u32>,
}

/// Build output options from the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Emit a manifest mapping logical entry names to emitted files.
    pub manifest: Option<bool>,

    /// Output directory, relative to `root`.
    pub out_dir: Option<String>,

    /// Purge the output directory before writing.
    pub empty_out_dir: Option<bool>,

    /// Subdirectory of `outDir` for non-entry static assets.
    pub assets_dir: Option<String>,

    /// Logical entry name to source path, resolved relative to `root`.
    pub input: BTreeMap<String, String>,
}

/// Module resolution options from the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolveOptions {
    /// Import specifier to replacement path/specifier.
    pub alias: BTreeMap<String, String>,
}

impl RawOptions {
    /// Create an empty options object. Same as `Default`, spelled out for
    /// call sites that build options programmatically.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root directory.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the public base path.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set the dev-server port.
    #[must_use]
    pub fn with_port(mut self, port: u32) -> Self {
        self.server.get_or_insert_with(ServerOptions::default).port = Some(port);
        self
    }

    /// Set the dev-server origin URL.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.server
            .get_or_insert_with(ServerOptions::default)
            .origin = Some(origin.into());
        self
    }

    /// Set whether a manifest is emitted.
    #[must_use]
    pub fn with_manifest(mut self, manifest: bool) -> Self {
        self.build.get_or_insert_with(BuildOptions::default).manifest = Some(manifest);
        self
    }

    /// Set the output directory (relative to root).
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<String>) -> Self {
        self.build.get_or_insert_with(BuildOptions::default).out_dir = Some(out_dir.into());
        self
    }

    /// Set whether the output directory is purged before a build.
    #[must_use]
    pub fn with_empty_out_dir(mut self, empty: bool) -> Self {
        self.build
            .get_or_insert_with(BuildOptions::default)
            .empty_out_dir = Some(empty);
        self
    }

    /// Set the assets subdirectory (relative to outDir).
    #[must_use]
    pub fn with_assets_dir(mut self, assets_dir: impl Into<String>) -> Self {
        self.build
            .get_or_insert_with(BuildOptions::default)
            .assets_dir = Some(assets_dir.into());
        self
    }

    /// Add a named entry point.
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>, path: impl Into<String>) -> Self {
        self.build
            .get_or_insert_with(BuildOptions::default)
            .input
            .insert(name.into(), path.into());
        self
    }

    /// Add a module alias.
    #[must_use]
    pub fn alias(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.resolve
            .get_or_insert_with(ResolveOptions::default)
            .alias
            .insert(from.into(), to.into());
        self
    }

    /// Append a plugin descriptor, preserving order.
    #[must_use]
    pub fn plugin(mut self, spec: PluginSpec) -> Self {
        self.plugins.push(spec);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_accumulates_nested_fields() {
        let raw = RawOptions::new()
            .with_root("src")
            .with_port(5173)
            .with_origin("http://localhost:5173")
            .with_manifest(true)
            .entry("home", "/home.js")
            .entry("activity", "/activity.js")
            .alias("vue", "vue/dist/vue.esm.js");

        assert_eq!(raw.root.as_deref(), Some("src"));
        let server = raw.server.as_ref().unwrap();
        assert_eq!(server.port, Some(5173));
        assert_eq!(server.origin.as_deref(), Some("http://localhost:5173"));
        let build = raw.build.as_ref().unwrap();
        assert_eq!(build.manifest, Some(true));
        assert_eq!(build.input.len(), 2);
        assert_eq!(
            raw.resolve.unwrap().alias.get("vue").map(String::as_str),
            Some("vue/dist/vue.esm.js")
        );
    }

    #[test]
    fn test_deserialize_camel_case_json() {
        let raw: RawOptions = serde_json::from_str(
            r#"{
                "root": "src",
                "base": "/static/",
                "server": { "origin": "http://localhost:5173", "port": 5173 },
                "build": {
                    "manifest": true,
                    "outDir": "..",
                    "emptyOutDir": false,
                    "assetsDir": ".",
                    "input": { "home": "/home.js", "settings.instance": "/settings.instance.js" }
                },
                "resolve": { "alias": { "vue": "vue/dist/vue.esm.js" } }
            }"#,
        )
        .unwrap();

        let build = raw.build.as_ref().unwrap();
        assert_eq!(build.out_dir.as_deref(), Some(".."));
        assert_eq!(build.empty_out_dir, Some(false));
        // Dotted entry keys are plain names, no special meaning
        assert!(build.input.contains_key("settings.instance"));
    }

    #[test]
    fn test_out_of_range_port_deserializes() {
        let raw: RawOptions = serde_json::from_str(r#"{ "server": { "port": 70000 } }"#).unwrap();
        assert_eq!(raw.server.unwrap().port, Some(70000));
    }

    #[test]
    fn test_plugin_order_preserved() {
        let raw = RawOptions::new()
            .plugin(PluginSpec::new("vue"))
            .plugin(PluginSpec::new("legacy"));
        let names: Vec<&str> = raw.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["vue", "legacy"]);
    }
}
