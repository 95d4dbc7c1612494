//! `slipway check` command implementation.
//!
//! Validates the config without printing a plan: loads, resolves, and
//! reports ok or the first configuration defect.

use crate::commands::{load_config, ErrorJson};
use miette::Result;
use serde::Serialize;
use slipway_core::{resolve, SCHEMA_VERSION};
use std::path::Path;

#[derive(Serialize)]
struct CheckResultJson {
    schema_version: u32,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<String>,
    entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorJson>,
}

pub fn run(cwd: &Path, config: Option<&Path>, json: bool) -> Result<()> {
    let outcome = load_config(cwd, config)
        .and_then(|(path, raw)| match resolve(&raw) {
            Ok(plan) => Ok((path, plan)),
            Err(err) => Err(ErrorJson::from(&err)),
        });

    match outcome {
        Ok((path, plan)) => {
            if json {
                let result = CheckResultJson {
                    schema_version: SCHEMA_VERSION,
                    ok: true,
                    config: Some(path.display().to_string()),
                    entry_count: plan.entry_points.len(),
                    error: None,
                };
                println!("{}", serde_json::to_string(&result).unwrap());
            } else {
                println!(
                    "ok: {} ({} entry points)",
                    path.display(),
                    plan.entry_points.len()
                );
            }
            Ok(())
        }
        Err(error) => {
            if json {
                let result = CheckResultJson {
                    schema_version: SCHEMA_VERSION,
                    ok: false,
                    config: None,
                    entry_count: 0,
                    error: Some(error),
                };
                println!("{}", serde_json::to_string(&result).unwrap());
            } else {
                eprintln!("error: {}", error.message);
            }
            std::process::exit(1);
        }
    }
}
