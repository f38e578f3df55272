//! Output record model for converted templates.
//!
//! One [`TemplateDocument`] is built per input file, never mutated after
//! assembly, and serialized to exactly one output file. Key names keep the
//! PascalCase spelling of the target format; the serde renames and the
//! hand-written emitter in [`crate::emit`] agree on them.

use serde::{Deserialize, Serialize};

/// One converted template: the data-entry form plus its tabular report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDocument {
    #[serde(rename = "Form")]
    pub form: FormRecord,
    #[serde(rename = "Report")]
    pub report: ReportRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "TitleOnPage")]
    pub title_on_page: String,
    /// Free text shown with the form; `None` when the source element is
    /// empty.
    #[serde(rename = "Info")]
    pub info: Option<String>,
    /// Field order follows source document order.
    #[serde(rename = "Fields")]
    pub fields: Vec<FieldRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub ty: String,
    #[serde(rename = "Subtype")]
    pub subtype: String,
    #[serde(rename = "Caption")]
    pub caption: String,
    /// Only injected for the well-known range fields in
    /// [`FIELD_OVERRIDES`].
    #[serde(rename = "DefaultVal", default, skip_serializing_if = "Option::is_none")]
    pub default_val: Option<i64>,
    #[serde(rename = "LookupQuery", default, skip_serializing_if = "Option::is_none")]
    pub lookup_query: Option<String>,
}

/// One cell of a report's column-header layout. `text` is never empty; a
/// blank source cell becomes a single space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderCell {
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Colspan", default, skip_serializing_if = "Option::is_none")]
    pub colspan: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Headers")]
    pub headers: Vec<Vec<HeaderCell>>,
    #[serde(rename = "Query")]
    pub query: BlockText,
    #[serde(rename = "FileName")]
    pub file_name: String,
    #[serde(rename = "PdfConfig")]
    pub pdf_config: PdfConfigRecord,
}

/// Page layout for the report's fixed-format rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfigRecord {
    /// Fixed order: bottom, top, right, left.
    #[serde(rename = "Margins")]
    pub margins: [i64; 4],
    #[serde(rename = "CellWidths")]
    pub cell_widths: Vec<f64>,
}

/// Marks text for literal block rendering. The emitter is the only
/// consumer of the tag; everywhere else this behaves as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockText(pub String);

impl BlockText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BlockText {
    fn from(text: String) -> Self {
        BlockText(text)
    }
}

/// Name-keyed reinterpretation rule for a well-known field: the subtype it
/// is forced to and the default value it receives.
#[derive(Debug, Clone, Copy)]
pub struct FieldOverride {
    pub name: &'static str,
    pub subtype: &'static str,
    pub default_val: i64,
}

/// The range fields of the legacy format carry subtypes the new format
/// does not understand; these rules replace them wholesale. Extending the
/// table is the entire change for a new special-cased field.
pub const FIELD_OVERRIDES: &[FieldOverride] = &[
    FieldOverride {
        name: "hrsFrom",
        subtype: "time",
        default_val: 6,
    },
    FieldOverride {
        name: "hrsTo",
        subtype: "time",
        default_val: 16,
    },
    FieldOverride {
        name: "from",
        subtype: "datetime",
        default_val: 6,
    },
    FieldOverride {
        name: "to",
        subtype: "datetime",
        default_val: 16,
    },
];

/// Look up the override rule for a field name, if any.
pub fn field_override(name: &str) -> Option<&'static FieldOverride> {
    FIELD_OVERRIDES.iter().find(|rule| rule.name == name)
}
