//! Notebook data model handed to the filter by the host pipeline.
//!
//! Only the fields the filter reads are typed; everything else a cell or
//! notebook carries is kept in a flattened `extra` map so it survives a
//! deserialize/serialize cycle untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{HideCodeError, Result};

/// Major nbformat version this data model understands.
pub const NBFORMAT_MAJOR: u32 = 4;

/// Side-channel map the host threads through every preprocessor.
pub type Resources = Map<String, Value>;

// ---------------------------------------------------------------------------
// CellType
// ---------------------------------------------------------------------------

/// Kind of a notebook cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    Code,
    Markdown,
    Raw,
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Code => "code",
            Self::Markdown => "markdown",
            Self::Raw => "raw",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Code, markdown, or raw.
    pub cell_type: CellType,
    /// Cell text. The on-disk list-of-lines form is joined on read.
    #[serde(default, deserialize_with = "deserialize_source")]
    pub source: String,
    /// Recorded outputs. Absent for non-code cells.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<Value>>,
    /// Per-cell metadata; any key may be missing.
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Remaining keys (`id`, `execution_count`, `attachments`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Create a cell of the given type with no outputs and empty metadata.
    pub fn new(cell_type: CellType, source: impl Into<String>) -> Self {
        Self {
            cell_type,
            source: source.into(),
            outputs: None,
            metadata: Map::new(),
            extra: Map::new(),
        }
    }

    /// Create a code cell with an empty output list.
    pub fn code(source: impl Into<String>) -> Self {
        Self {
            outputs: Some(Vec::new()),
            ..Self::new(CellType::Code, source)
        }
    }

    /// Create a markdown cell.
    pub fn markdown(source: impl Into<String>) -> Self {
        Self::new(CellType::Markdown, source)
    }

    /// Builder-style metadata setter.
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Builder-style outputs setter.
    pub fn with_outputs(mut self, outputs: Vec<Value>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    /// `true` when `key` is present in the metadata and its value is truthy.
    ///
    /// A missing key, `null`, or a value of any unexpected shape that is not
    /// truthy all read as "not set".
    pub fn metadata_flag(&self, key: &str) -> bool {
        self.metadata.get(key).is_some_and(is_truthy)
    }

    /// Number of recorded outputs (zero when absent).
    pub fn output_count(&self) -> usize {
        self.outputs.as_ref().map_or(0, Vec::len)
    }
}

/// Truthiness of a JSON value as the notebook host evaluates metadata flags.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are falsy; everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn deserialize_source<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Source {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match Source::deserialize(deserializer)? {
        Source::Text(text) => text,
        Source::Lines(lines) => lines.concat(),
    })
}

// ---------------------------------------------------------------------------
// Notebook
// ---------------------------------------------------------------------------

/// A notebook document: ordered cells plus notebook-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    /// Cells in document order.
    #[serde(default)]
    pub cells: Vec<Cell>,
    /// Notebook-level metadata (kernelspec, language_info, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Major format version.
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    /// Minor format version.
    #[serde(default)]
    pub nbformat_minor: u32,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_nbformat() -> u32 {
    NBFORMAT_MAJOR
}

impl Notebook {
    /// Create an nbformat 4 notebook from a list of cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            metadata: Map::new(),
            nbformat: NBFORMAT_MAJOR,
            nbformat_minor: 5,
            extra: Map::new(),
        }
    }

    /// Deserialize a notebook from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the notebook as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject notebooks whose major format version this model does not describe.
    pub fn validate(&self) -> Result<()> {
        if self.nbformat != NBFORMAT_MAJOR {
            return Err(HideCodeError::validation(format!(
                "nbformat {} not supported (expected {NBFORMAT_MAJOR})",
                self.nbformat
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn truthiness_matches_host_semantics() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(!is_truthy(&falsy), "{falsy} should be falsy");
        }
        for truthy in [json!(true), json!(1), json!(-2.5), json!("no"), json!([0]), json!({"a": 1})] {
            assert!(is_truthy(&truthy), "{truthy} should be truthy");
        }
    }

    #[test]
    fn metadata_flag_missing_key_is_unset() {
        let cell = Cell::code("x = 1");
        assert!(!cell.metadata_flag("hideCode"));

        let cell = cell.with_metadata("hideCode", json!(true));
        assert!(cell.metadata_flag("hideCode"));
    }

    #[test]
    fn source_lines_are_joined() {
        let cell: Cell = serde_json::from_value(json!({
            "cell_type": "code",
            "source": ["import os\n", "print(os.name)"],
            "metadata": {},
            "outputs": [],
            "execution_count": null
        }))
        .expect("deserialize cell");

        assert_eq!(cell.source, "import os\nprint(os.name)");
        assert_eq!(cell.extra.get("execution_count"), Some(&Value::Null));
    }

    #[test]
    fn markdown_cell_has_no_outputs_key() {
        let json = serde_json::to_value(Cell::markdown("# Title")).expect("serialize");
        assert!(json.get("outputs").is_none());
        assert_eq!(json["cell_type"], "markdown");
    }

    #[test]
    fn notebook_preserves_unknown_keys() {
        let input = json!({
            "cells": [{
                "cell_type": "raw",
                "id": "abc123",
                "source": "raw text",
                "metadata": {"format": "text/plain"}
            }],
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 5,
            "x-custom": "kept"
        });

        let nb: Notebook = serde_json::from_value(input.clone()).expect("deserialize");
        assert_eq!(nb.cells[0].cell_type, CellType::Raw);
        assert_eq!(nb.extra["x-custom"], "kept");

        let output = serde_json::to_value(&nb).expect("serialize");
        assert_eq!(output, input);
    }

    #[test]
    fn validate_rejects_old_format() {
        let mut nb = Notebook::new(vec![]);
        assert!(nb.validate().is_ok());

        nb.nbformat = 3;
        let err = nb.validate().unwrap_err();
        assert!(err.to_string().contains("nbformat 3"));
    }

    #[test]
    fn from_json_reports_parse_error() {
        let err = Notebook::from_json(r#"{"cells": [{"cell_type": "widget"}]}"#).unwrap_err();
        assert!(matches!(err, HideCodeError::Parse { .. }));
    }
}
