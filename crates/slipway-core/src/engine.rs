//! Engine invocation mapping.
//!
//! The resolver hands a finished [`BuildPlan`] to the external bundling
//! engine. [`to_engine_invocation`] is the pure, total mapping from the plan
//! to the flat structure the engine's entry point consumes; it has no side
//! effects and the output carries a schema version so downstream consumers
//! can rely on a stable shape.

use crate::options::PluginSpec;
use crate::plan::BuildPlan;
use crate::version::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Flat invocation structure consumed by the bundling engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInvocation {
    pub schema_version: u32,
    pub root: PathBuf,
    pub base: String,
    pub plugins: Vec<PluginSpec>,
    pub input: BTreeMap<String, PathBuf>,
    pub aliases: BTreeMap<String, String>,
    pub server: ServerInvocation,
    pub output: OutputInvocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInvocation {
    pub origin: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputInvocation {
    pub dir: PathBuf,
    pub assets_dir: PathBuf,
    pub manifest: bool,
    /// Whether the engine may clear `dir` before writing. The resolver has
    /// already rejected plans where clearing would delete sources.
    pub clean: bool,
}

/// Map a resolved plan to an engine invocation. Pure and total: every valid
/// plan maps to exactly one invocation.
#[must_use]
pub fn to_engine_invocation(plan: &BuildPlan) -> EngineInvocation {
    EngineInvocation {
        schema_version: SCHEMA_VERSION,
        root: plan.root_dir.clone(),
        base: plan.public_base_path.clone(),
        plugins: plan.plugins.clone(),
        input: plan.entry_points.clone(),
        aliases: plan.module_aliases.clone(),
        server: ServerInvocation {
            origin: plan.dev_server.origin.to_string(),
            port: plan.dev_server.port,
        },
        output: OutputInvocation {
            dir: plan.output.out_dir.clone(),
            assets_dir: plan.output.assets_subdir.clone(),
            manifest: plan.output.emit_manifest,
            clean: plan.output.empty_out_dir,
        },
    }
}

impl EngineInvocation {
    /// Serialize to pretty JSON for handoff or inspection.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RawOptions;
    use crate::plan::resolve;
    use std::path::Path;

    fn plan() -> BuildPlan {
        let raw = RawOptions::new()
            .with_root("src")
            .with_base("/static/")
            .with_manifest(true)
            .with_out_dir("../dist")
            .entry("home", "/home.js")
            .alias("vue", "vue/dist/vue.esm.js");
        resolve(&raw).unwrap()
    }

    #[test]
    fn test_invocation_mirrors_plan() {
        let plan = plan();
        let inv = to_engine_invocation(&plan);

        assert_eq!(inv.schema_version, SCHEMA_VERSION);
        assert_eq!(inv.root, plan.root_dir);
        assert_eq!(inv.base, "/static/");
        assert_eq!(inv.input["home"], Path::new("src/home.js"));
        assert_eq!(inv.output.dir, Path::new("dist"));
        assert!(inv.output.manifest);
        assert!(inv.output.clean);
        assert_eq!(inv.server.port, 5173);
    }

    #[test]
    fn test_mapping_is_pure() {
        let plan = plan();
        assert_eq!(to_engine_invocation(&plan), to_engine_invocation(&plan));
    }

    #[test]
    fn test_json_shape_is_camel_case() {
        let inv = to_engine_invocation(&plan());
        let value: serde_json::Value = serde_json::from_str(&inv.to_json()).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert!(value["output"].get("assetsDir").is_some());
        assert!(value["aliases"].get("vue").is_some());
    }
}
