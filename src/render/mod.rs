//! Output rendering for datasets.
//!
//! The pipeline itself is storage-agnostic; these renderers turn a finished
//! [`Dataset`](crate::Dataset) into JSON text or an importable TypeScript
//! module.
//!
//! # Example
//!
//! ```no_run
//! use swarmset::{build_dataset_from_file, render::*};
//!
//! let dataset = build_dataset_from_file("telemetry.xlsx")?;
//!
//! // Render to JSON
//! let json = to_json(&dataset, JsonFormat::Pretty)?;
//!
//! // Render to a TypeScript module
//! let ts = to_typescript_module(&dataset, &ModuleOptions::default())?;
//! # Ok::<(), swarmset::Error>(())
//! ```

mod json;
mod module;
mod options;

pub use json::{to_json, to_json_default, JsonFormat};
pub use module::to_typescript_module;
pub use options::ModuleOptions;
