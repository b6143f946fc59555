//! Report types and their text and JSON renderings.
//!
//! Reports go to stdout. Logs never do.

use std::io::Write;

use clap::ValueEnum;
use rawschema::{Literal, Schema, SchemaType};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Outcome of `rawschema check`.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    pub checked: usize,
    pub failed: usize,
    pub ok: bool,
    pub failures: Vec<Failure>,
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub path: String,
    pub error: String,
}

impl CheckReport {
    pub fn record_failure(&mut self, path: String, error: String) {
        self.failed += 1;
        self.failures.push(Failure { path, error });
    }
}

/// One schema node that carries `const` and/or `enum`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstEntry {
    pub pointer: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<Literal>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Literal>,
}

/// Collects every node with `const` or `enum`, in document order.
#[must_use]
pub fn collect_consts(schema: &Schema) -> Vec<ConstEntry> {
    let mut entries = Vec::new();
    schema.walk(&mut |node| {
        if node.const_set() || !node.enum_values.is_empty() {
            entries.push(ConstEntry {
                pointer: node.location.pointer.to_string(),
                schema_type: node.schema_type,
                const_value: node.const_value.clone(),
                enum_values: node.enum_values.clone(),
            });
        }
    });
    entries
}

/// Writes any report as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<T: Serialize + ?Sized>(report: &T, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn write_check_text(report: &CheckReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    for failure in &report.failures {
        writeln!(writer, "FAIL {}", failure.path)?;
        writeln!(writer, "     {}", failure.error)?;
    }
    if report.ok {
        writeln!(writer, "ok: {} document(s) checked", report.checked)?;
    } else {
        writeln!(
            writer,
            "{} of {} document(s) failed",
            report.failed, report.checked
        )?;
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if writing fails.
pub fn write_consts_text(entries: &[ConstEntry], writer: &mut dyn Write) -> anyhow::Result<()> {
    if entries.is_empty() {
        writeln!(writer, "no const or enum keywords")?;
        return Ok(());
    }
    for entry in entries {
        write!(writer, "{}", entry.pointer)?;
        if let Some(t) = entry.schema_type {
            write!(writer, " ({t})")?;
        }
        if let Some(value) = &entry.const_value {
            write!(writer, " const={value}")?;
        }
        if !entry.enum_values.is_empty() {
            write!(writer, " enum={}", Literal::Array(entry.enum_values.clone()))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use rawschema::{File, Parser, Settings};

    fn parse(raw: &str) -> Schema {
        Parser::new(Settings::new(File::new("t.yaml")))
            .parse_document(raw.as_bytes())
            .unwrap()
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_collect_consts_in_document_order() {
        let schema = parse(
            "type: object\nproperties:\n  status:\n    type: string\n    const: active\n    enum: [active, inactive]\n  note:\n    type: string\n  flag:\n    const: null\n",
        );
        let entries = collect_consts(&schema);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].pointer, "#/properties/status");
        assert_eq!(entries[0].enum_values.len(), 2);
        assert_eq!(entries[1].pointer, "#/properties/flag");
        assert_eq!(entries[1].const_value, Some(Literal::Null));
    }

    #[test]
    fn test_consts_text() {
        let schema = parse("type: string\nconst: active\nenum: [active, inactive]\n");
        let out = render(|w| write_consts_text(&collect_consts(&schema), w));
        assert_eq!(
            out,
            "# (string) const=\"active\" enum=[\"active\",\"inactive\"]\n"
        );

        let empty = render(|w| write_consts_text(&[], w));
        assert_eq!(empty, "no const or enum keywords\n");
    }

    #[test]
    fn test_consts_json_keeps_null_const() {
        let schema = parse("const: null\n");
        let out = render(|w| write_json(&collect_consts(&schema), w));
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, serde_json::json!([{"pointer": "#", "const": null}]));
    }

    #[test]
    fn test_check_text() {
        let mut report = CheckReport {
            checked: 2,
            ..CheckReport::default()
        };
        report.record_failure("bad.json".to_owned(), "bad.json: boom".to_owned());

        let out = render(|w| write_check_text(&report, w));
        assert_eq!(out, "FAIL bad.json\n     bad.json: boom\n1 of 2 document(s) failed\n");
    }
}
