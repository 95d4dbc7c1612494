#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::return_self_not_must_use)]

pub mod engine;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod options;
pub mod paths;
pub mod plan;
pub mod version;

pub use engine::{to_engine_invocation, EngineInvocation};
pub use error::Error;
pub use loader::{find_config_file, load_options};
pub use manifest::{Manifest, ManifestEntry};
pub use options::{BuildOptions, PluginSpec, RawOptions, ResolveOptions, ServerOptions};
pub use plan::{resolve, BuildPlan, DevServer, OutputSpec};
pub use version::{SCHEMA_VERSION, VERSION};
