//! `slipway resolve` command implementation.
//!
//! Loads the config, resolves it into a normalized build plan, and prints
//! the plan (or the engine invocation with `--engine`). With `--json` the
//! output is exactly one stable JSON object on stdout.

use crate::commands::{load_config, ErrorJson};
use miette::Result;
use serde::Serialize;
use slipway_core::{resolve, to_engine_invocation, BuildPlan, EngineInvocation, SCHEMA_VERSION};
use std::path::Path;

#[derive(Serialize)]
struct ResolveResultJson {
    schema_version: u32,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    plan: Option<BuildPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    invocation: Option<EngineInvocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
}

impl ResolveResultJson {
    fn failure(config: Option<String>, error: ErrorJson) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            ok: false,
            config,
            plan: None,
            invocation: None,
            error: Some(error),
        }
    }
}

pub fn run(cwd: &Path, config: Option<&Path>, engine: bool, json: bool) -> Result<()> {
    let (config_path, raw) = match load_config(cwd, config) {
        Ok(loaded) => loaded,
        Err(error) => return fail(None, error, json),
    };
    let config_display = config_path.display().to_string();

    let plan = match resolve(&raw) {
        Ok(plan) => plan,
        Err(err) => return fail(Some(config_display), ErrorJson::from(&err), json),
    };
    tracing::debug!(entries = plan.entry_points.len(), "resolved build plan");

    if json {
        let result = if engine {
            ResolveResultJson {
                schema_version: SCHEMA_VERSION,
                ok: true,
                config: Some(config_display),
                plan: None,
                invocation: Some(to_engine_invocation(&plan)),
                error: None,
            }
        } else {
            ResolveResultJson {
                schema_version: SCHEMA_VERSION,
                ok: true,
                config: Some(config_display),
                plan: Some(plan),
                invocation: None,
                error: None,
            }
        };
        println!("{}", serde_json::to_string(&result).unwrap());
        return Ok(());
    }

    if engine {
        println!("{}", to_engine_invocation(&plan).to_json());
        return Ok(());
    }

    print_plan(&config_display, &plan);
    Ok(())
}

fn print_plan(config: &str, plan: &BuildPlan) {
    println!("  config: {config}");
    println!("  root: {}", plan.root_dir.display());
    println!("  base: {}", plan.public_base_path);
    println!(
        "  server: {} (port {})",
        plan.dev_server.origin, plan.dev_server.port
    );
    println!(
        "  out: {} (manifest: {}, empty: {}, assets: {})",
        plan.output.out_dir.display(),
        plan.output.emit_manifest,
        plan.output.empty_out_dir,
        plan.output.assets_subdir.display()
    );

    if !plan.plugins.is_empty() {
        let names: Vec<&str> = plan.plugins.iter().map(|p| p.name.as_str()).collect();
        println!("  plugins: {}", names.join(", "));
    }

    println!("  entries:");
    for (name, path) in &plan.entry_points {
        println!("    {name} -> {}", path.display());
    }

    for (from, to) in &plan.module_aliases {
        println!("  alias: {from} -> {to}");
    }
}

fn fail(config: Option<String>, error: ErrorJson, json: bool) -> Result<()> {
    if json {
        let result = ResolveResultJson::failure(config, error);
        println!("{}", serde_json::to_string(&result).unwrap());
    } else {
        eprintln!("error: {}", error.message);
    }
    std::process::exit(1);
}
