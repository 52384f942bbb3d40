//! Catalog metadata export.
//!
//! Neither function looks at a certificate or runs the engine.

use std::io::Write;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::lint::{LintDefinition, LintSource};
use crate::registry::Registry;
use crate::CertlintError;

/// Metadata of one rule, as written to the JSON-lines catalog.
///
/// Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintDescription {
    pub name: &'static str,
    pub description: &'static str,
    pub citation: &'static str,
    pub source: LintSource,
    /// RFC 3339 timestamp.
    pub effective_date: String,
}

impl LintDescription {
    fn from_definition(def: &LintDefinition) -> Result<Self, CertlintError> {
        let effective_date = def.effective_date.format(&Rfc3339).map_err(|e| {
            CertlintError::Config(format!("{}: unformattable effective date: {e}", def.name))
        })?;
        Ok(LintDescription {
            name: def.name,
            description: def.description,
            citation: def.citation,
            source: def.source,
            effective_date,
        })
    }
}

/// Descriptions of every rule, in name order.
pub fn lint_descriptions(registry: &Registry) -> Result<Vec<LintDescription>, CertlintError> {
    registry.iter().map(LintDescription::from_definition).collect()
}

/// Write one JSON object per rule, one per line, in name order.
pub fn write_lint_descriptions<W: Write>(
    registry: &Registry,
    mut writer: W,
) -> Result<(), CertlintError> {
    for description in lint_descriptions(registry)? {
        serde_json::to_writer(&mut writer, &description)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// A schema declaration with one boolean field per rule, sorted by name.
pub fn lint_schema(registry: &Registry) -> String {
    let mut schema = String::from("Lints = SubRecord({\n");
    for name in registry.names() {
        schema.push_str("    \"");
        schema.push_str(name);
        schema.push_str("\":LintBool(),\n");
    }
    schema.push_str("})\n");
    schema
}
