//! Error handling for the template conversion pipeline.
//!
//! Every fault is per-file: a file either converts fully or produces no
//! output. The batch driver attaches the source file path on top of these
//! via `anyhow::Context`, so a failure names both the file and the
//! offending element or attribute.

use thiserror::Error;

/// Faults discovered while converting a single template file.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input bytes are not valid in the fixed legacy codepage.
    #[error("input is not valid ISO-8859-2 text")]
    Decode,

    /// The decoded text is not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Parse { position: u64, message: String },

    /// An element the template format requires is absent.
    #[error("expected element '{element}' is missing")]
    MissingElement { element: String },

    /// A required attribute is absent. `field` is the owning field's name
    /// where one exists, otherwise the owning element's name.
    #[error("'{field}' is missing required attribute '{attribute}'")]
    MissingAttribute { field: String, attribute: String },

    /// An attribute value does not parse as its declared type.
    #[error("attribute '{attribute}' has value '{value}', expected {expected}")]
    Format {
        attribute: String,
        value: String,
        expected: &'static str,
    },
}
