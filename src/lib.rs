//! Converter for legacy XML form/report templates.
//!
//! Each input file is decoded from the legacy ISO-8859-2 codepage, parsed
//! into an element tree, reshaped into typed form/report records (field
//! subtype remapping, header cleanup, SQL placeholder rewriting) and
//! rendered as a YAML document. The batch driver mirrors the input
//! directory layout into the output tree, one `.yml` per `.xml`.
//!
//! The pipeline is strictly linear and per-file: no state survives a
//! file, and a file either converts fully or produces no output.

pub mod batch;
pub mod emit;
pub mod error;
pub mod extract;
pub mod model;
pub mod sql;
pub mod xml;

pub use batch::{convert_bytes, convert_file, convert_tree};
pub use error::ConvertError;
pub use model::{
    BlockText, FieldRecord, FormRecord, HeaderCell, PdfConfigRecord, ReportRecord,
    TemplateDocument,
};
