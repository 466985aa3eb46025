//! TypeScript module renderer.
//!
//! Embeds the dataset JSON in a template literal and parses it at import
//! time, so a front end can `import { excelDataset } from './excelDataset'`.

use crate::error::{Error, Result};
use crate::model::Dataset;

use super::json::to_json;
use super::options::ModuleOptions;

/// Escape text for a JavaScript template literal.
fn escape_template(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            _ => out.push(c),
        }
    }
    out
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Render a dataset as a TypeScript module.
pub fn to_typescript_module(dataset: &Dataset, options: &ModuleOptions) -> Result<String> {
    for name in [&options.export_name, &options.type_name] {
        if !is_identifier(name) {
            return Err(Error::Render(format!("not a valid identifier: {:?}", name)));
        }
    }

    let json = to_json(dataset, options.json_format)?;
    let mut out = String::new();

    for line in &options.banner {
        out.push_str("// ");
        out.push_str(line);
        out.push('\n');
    }
    if !options.banner.is_empty() {
        out.push('\n');
    }

    if let Some(ref module) = options.type_import {
        out.push_str(&format!(
            "import {{ {} }} from '{}';\n\n",
            options.type_name,
            module.replace('\'', "\\'")
        ));
    }

    out.push_str(&format!("const rawDataset = `{}`;\n\n", escape_template(&json)));
    out.push_str(&format!(
        "export const {} = JSON.parse(rawDataset) as {};\n",
        options.export_name, options.type_name
    ));

    Ok(out)
}
