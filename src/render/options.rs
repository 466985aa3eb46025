//! Output module options.

use super::json::JsonFormat;

/// Options for rendering a dataset as a TypeScript module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOptions {
    /// Name of the exported constant
    pub export_name: String,

    /// Type the parsed JSON is asserted to
    pub type_name: String,

    /// Module the type is imported from (None = no import)
    pub type_import: Option<String>,

    /// Comment lines written at the top of the module
    pub banner: Vec<String>,

    /// Layout of the embedded JSON
    pub json_format: JsonFormat,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            export_name: "excelDataset".to_string(),
            type_name: "DroneSwarmDataset".to_string(),
            type_import: Some("@/types/drone".to_string()),
            banner: vec![
                "Drone swarm dataset curated for the visualization dashboard.".to_string(),
                "Generated by swarmset; do not edit by hand.".to_string(),
            ],
            json_format: JsonFormat::Pretty,
        }
    }
}

impl ModuleOptions {
    /// Create new module options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the exported constant's name.
    pub fn with_export_name(mut self, name: impl Into<String>) -> Self {
        self.export_name = name.into();
        self
    }

    /// Set the asserted type name.
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    /// Set the module the type is imported from.
    pub fn with_type_import(mut self, module: impl Into<String>) -> Self {
        self.type_import = Some(module.into());
        self
    }

    /// Do not emit a type import.
    pub fn without_type_import(mut self) -> Self {
        self.type_import = None;
        self
    }

    /// Replace the banner comment.
    pub fn with_banner<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.banner = lines.into_iter().map(Into::into).collect();
        self
    }

    /// Set the layout of the embedded JSON.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}
