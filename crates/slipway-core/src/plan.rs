//! Build plan resolution.
//!
//! [`resolve`] takes a partially-specified [`RawOptions`], applies defaults,
//! validates, and returns a fully-populated immutable [`BuildPlan`], failing
//! fast on configuration defects. Resolution is pure, synchronous, and
//! deterministic: no filesystem I/O, no environment lookups, all-or-nothing.
//! Path existence is validated lazily by the engine, not here.

use crate::error::Error;
use crate::options::{PluginSpec, RawOptions};
use crate::paths::{join_root, normalize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Default dev-server port when the config specifies none.
pub const DEFAULT_PORT: u16 = 5173;

/// Default output directory, relative to the root.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// The normalized build configuration, constructed once per invocation and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    /// Ordered plugin descriptors, passed through uninterpreted.
    pub plugins: Vec<PluginSpec>,

    /// Directory entry-point paths were resolved from.
    pub root_dir: PathBuf,

    /// URL prefix for emitted assets; always starts and ends with `/`.
    pub public_base_path: String,

    /// Dev-server origin and port.
    pub dev_server: DevServer,

    /// Output directory layout and manifest flag.
    pub output: OutputSpec,

    /// Logical entry name to source path, joined onto `root_dir`.
    /// BTreeMap keeps iteration order stable across runs.
    pub entry_points: BTreeMap<String, PathBuf>,

    /// Import specifier to replacement, applied during module resolution.
    pub module_aliases: BTreeMap<String, String>,
}

/// Dev-server settings the engine uses to rewrite asset references during
/// development.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DevServer {
    pub origin: Url,
    pub port: u16,
}

/// Output directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    /// Write a machine-readable entry-name to emitted-file manifest.
    pub emit_manifest: bool,

    /// Output directory, resolved relative to the root and normalized.
    pub out_dir: PathBuf,

    /// Purge the output directory before writing.
    pub empty_out_dir: bool,

    /// Subdirectory of `out_dir` for non-entry static assets. `.` means the
    /// output root.
    pub assets_subdir: PathBuf,
}

/// Resolve raw options into a [`BuildPlan`].
///
/// Defaults: root `.`, base `/`, port 5173, origin `http://localhost:{port}`,
/// outDir `dist`, manifest off, emptyOutDir on, assets in the output root.
///
/// # Errors
///
/// - [`Error::InvalidConfig`] when the entry mapping is empty, an entry key
///   or path is empty, an alias is malformed, the port is out of range, or
///   the origin is not an absolute URL.
/// - [`Error::ConflictingPaths`] when `outDir` resolves to the same path as
///   the root while `emptyOutDir` is true; purging would delete sources.
pub fn resolve(raw: &RawOptions) -> Result<BuildPlan, Error> {
    let build = raw.build.clone().unwrap_or_default();

    if build.input.is_empty() {
        return Err(Error::invalid("entryPoints must be a non-empty mapping"));
    }

    let root = raw.root.as_deref().unwrap_or(".");
    if root.is_empty() {
        return Err(Error::invalid("root must be a non-empty path"));
    }
    let root_dir = normalize(Path::new(root));

    let mut entry_points = BTreeMap::new();
    for (name, path) in &build.input {
        if name.is_empty() {
            return Err(Error::invalid("entry point names must be non-empty"));
        }
        if path.is_empty() {
            return Err(Error::invalid(format!(
                "entry point \"{name}\" has an empty path"
            )));
        }
        entry_points.insert(name.clone(), join_root(&root_dir, path));
    }

    let mut module_aliases = BTreeMap::new();
    if let Some(resolve_opts) = &raw.resolve {
        for (from, to) in &resolve_opts.alias {
            if from.is_empty() || to.is_empty() {
                return Err(Error::invalid(format!(
                    "malformed alias: \"{from}\" -> \"{to}\""
                )));
            }
            module_aliases.insert(from.clone(), to.clone());
        }
    }

    let server = raw.server.clone().unwrap_or_default();
    let port = match server.port {
        None => DEFAULT_PORT,
        Some(p) => u16::try_from(p)
            .ok()
            .filter(|p| *p >= 1)
            .ok_or_else(|| Error::invalid(format!("devServer.port {p} is out of range [1, 65535]")))?,
    };
    let origin = match server.origin.as_deref() {
        Some(raw_origin) => Url::parse(raw_origin).map_err(|e| {
            Error::invalid(format!("devServer.origin \"{raw_origin}\" is not a valid URL: {e}"))
        })?,
        // Derived from the resolved port, never from the environment
        None => Url::parse(&format!("http://localhost:{port}"))
            .map_err(|e| Error::invalid(format!("default origin: {e}")))?,
    };

    let out_dir = normalize(&root_dir.join(build.out_dir.as_deref().unwrap_or(DEFAULT_OUT_DIR)));
    let empty_out_dir = build.empty_out_dir.unwrap_or(true);
    if empty_out_dir && out_dir == root_dir {
        return Err(Error::ConflictingPaths {
            out_dir,
            root_dir,
        });
    }

    let assets_subdir = normalize(Path::new(build.assets_dir.as_deref().unwrap_or(".")));

    Ok(BuildPlan {
        plugins: raw.plugins.clone(),
        root_dir,
        public_base_path: normalize_base(raw.base.as_deref().unwrap_or("/")),
        dev_server: DevServer { origin, port },
        output: OutputSpec {
            emit_manifest: build.manifest.unwrap_or(false),
            out_dir,
            empty_out_dir,
            assets_subdir,
        },
        entry_points,
        module_aliases,
    })
}

/// Ensure the public base path starts and ends with `/`, for path-joining
/// consistency. An empty base becomes `/`.
fn normalize_base(base: &str) -> String {
    let mut out = String::with_capacity(base.len() + 2);
    if !base.starts_with('/') {
        out.push('/');
    }
    out.push_str(base);
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> RawOptions {
        RawOptions::new().entry("home", "/home.js")
    }

    #[test]
    fn test_resolve_preserves_entry_mapping() {
        let raw = RawOptions::new()
            .entry("home", "/home.js")
            .entry("activity", "/activity.js")
            .entry("settings.instance", "/settings.instance.js");

        let plan = resolve(&raw).unwrap();
        assert_eq!(plan.entry_points.len(), 3);
        assert_eq!(plan.entry_points["home"], Path::new("home.js"));
        assert_eq!(
            plan.entry_points["settings.instance"],
            Path::new("settings.instance.js")
        );
    }

    #[test]
    fn test_resolve_joins_entries_onto_root() {
        // root "src", outDir "..", entry "/home.js"
        let raw = RawOptions::new()
            .with_root("src")
            .with_out_dir("..")
            .entry("home", "/home.js");

        let plan = resolve(&raw).unwrap();
        assert_eq!(plan.entry_points["home"], Path::new("src/home.js"));
        // outDir ".." collapses to the cwd, which is not the root
        assert_eq!(plan.output.out_dir, Path::new("."));
        // Documented default still applies
        assert!(plan.output.empty_out_dir);
    }

    #[test]
    fn test_resolve_empty_entries_is_invalid() {
        let err = resolve(&RawOptions::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = resolve(&RawOptions::new().with_root("src")).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_resolve_is_deterministic_and_idempotent() {
        let raw = RawOptions::new()
            .with_root("src")
            .with_base("/static/")
            .with_port(5173)
            .with_manifest(true)
            .entry("home", "/home.js")
            .alias("vue", "vue/dist/vue.esm.js");

        let first = resolve(&raw).unwrap();
        let second = resolve(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_dir_equal_to_root_conflicts_when_purging() {
        let raw = RawOptions::new()
            .with_root("src")
            .with_out_dir(".")
            .entry("home", "/home.js");

        let err = resolve(&raw).unwrap_err();
        assert!(matches!(err, Error::ConflictingPaths { .. }));
        assert_eq!(err.code(), "CONFLICTING_PATHS");
    }

    #[test]
    fn test_out_dir_above_absolute_root_conflicts_when_purging() {
        // "/.." is still "/", so purging the out dir would purge the root
        let raw = RawOptions::new()
            .with_root("/")
            .with_out_dir("..")
            .entry("home", "/home.js");

        let err = resolve(&raw).unwrap_err();
        assert!(matches!(err, Error::ConflictingPaths { .. }));
    }

    #[test]
    fn test_out_dir_equal_to_root_allowed_without_purging() {
        let raw = RawOptions::new()
            .with_root("src")
            .with_out_dir(".")
            .with_empty_out_dir(false)
            .entry("home", "/home.js");

        let plan = resolve(&raw).unwrap();
        assert_eq!(plan.output.out_dir, plan.root_dir);
        assert!(!plan.output.empty_out_dir);
    }

    #[test]
    fn test_out_of_range_port_is_invalid() {
        let err = resolve(&minimal().with_port(70000)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = resolve(&minimal().with_port(0)).unwrap_err();
        assert_eq!(err.code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_default_origin_follows_port() {
        let plan = resolve(&minimal().with_port(3000)).unwrap();
        assert_eq!(plan.dev_server.port, 3000);
        assert_eq!(plan.dev_server.origin.as_str(), "http://localhost:3000/");
    }

    #[test]
    fn test_explicit_origin_is_validated() {
        let plan = resolve(&minimal().with_origin("http://localhost:5173")).unwrap();
        assert_eq!(plan.dev_server.origin.port(), Some(5173));

        let err = resolve(&minimal().with_origin("not a url")).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_base_is_normalized_to_slashes() {
        assert_eq!(resolve(&minimal()).unwrap().public_base_path, "/");
        assert_eq!(
            resolve(&minimal().with_base("/static/")).unwrap().public_base_path,
            "/static/"
        );
        assert_eq!(
            resolve(&minimal().with_base("static")).unwrap().public_base_path,
            "/static/"
        );
        assert_eq!(resolve(&minimal().with_base("")).unwrap().public_base_path, "/");
    }

    #[test]
    fn test_documented_defaults() {
        let plan = resolve(&minimal()).unwrap();
        assert_eq!(plan.root_dir, Path::new("."));
        assert_eq!(plan.dev_server.port, DEFAULT_PORT);
        assert_eq!(plan.output.out_dir, Path::new(DEFAULT_OUT_DIR));
        assert!(!plan.output.emit_manifest);
        assert!(plan.output.empty_out_dir);
        assert_eq!(plan.output.assets_subdir, Path::new("."));
        assert!(plan.plugins.is_empty());
        assert!(plan.module_aliases.is_empty());
    }

    #[test]
    fn test_malformed_alias_is_invalid() {
        let err = resolve(&minimal().alias("vue", "")).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_empty_entry_name_or_path_is_invalid() {
        let err = resolve(&RawOptions::new().entry("", "/home.js")).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));

        let err = resolve(&RawOptions::new().entry("home", "")).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_plugin_order_survives_resolution() {
        let raw = minimal()
            .plugin(crate::options::PluginSpec::new("vue"))
            .plugin(crate::options::PluginSpec::new("legacy"));
        let plan = resolve(&raw).unwrap();
        let names: Vec<&str> = plan.plugins.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["vue", "legacy"]);
    }

    #[test]
    fn test_plan_serializes_camel_case() {
        let plan = resolve(&minimal().with_manifest(true)).unwrap();
        let value = serde_json::to_value(&plan).unwrap();
        assert!(value.get("publicBasePath").is_some());
        assert!(value["output"].get("emitManifest").is_some());
        assert_eq!(value["output"]["emitManifest"], true);
        assert!(value["entryPoints"].get("home").is_some());
    }
}
