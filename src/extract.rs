//! Extraction of form and report records from the legacy element tree.
//!
//! Layout of a template document:
//!
//! ```text
//! <root>
//!   <fileName file="..."/>
//!   <get_data>
//!     <title/> <titleOnWeb/> <infoOnWeb/>
//!     <fields> <field name= type= subtype= caption=>lookup?</field>... </fields>
//!   </get_data>
//!   <report>
//!     <display_result>
//!       <title/> <header> <tr><td/>...</tr>... </header>
//!       <pdf m_bot= m_top= m_right= m_left=/>
//!       <pdf_object cell_widths="..."/>
//!     </display_result>
//!     <sql> <sql_question>raw query</sql_question> </sql>
//!   </report>
//! </root>
//! ```

use crate::error::ConvertError;
use crate::model::{
    field_override, BlockText, FieldRecord, FormRecord, HeaderCell, PdfConfigRecord, ReportRecord,
};
use crate::sql;
use crate::xml::Element;

/// Stray windows-1250 byte that legacy templates mix into otherwise
/// ISO-8859-2 text; it always stands for 'ś'.
const LEGACY_S_ACUTE: char = '\u{9c}';

/// Convert one `<field>` node, applying the name-keyed override table and
/// lookup-query extraction.
pub fn field_record(node: &Element) -> Result<FieldRecord, ConvertError> {
    let name = node.require_attr("name")?.to_string();
    let ty = node.require_attr("type")?.to_string();
    let mut subtype = node.require_attr("subtype")?.to_string();
    let caption = node.require_attr("caption")?.to_string();

    let rule = field_override(&name);
    if let Some(rule) = rule {
        subtype = rule.subtype.to_string();
    }
    let default_val = rule.map(|rule| rule.default_val);

    // The multiList casing fix only applies to fields that carry a lookup
    // query; fields without one keep the source spelling.
    let mut lookup_query = None;
    if let Some(text) = node.text_opt() {
        lookup_query = Some(text.trim().to_string());
        if subtype == "multiList" {
            subtype = "multilist".to_string();
        }
    }

    Ok(FieldRecord {
        name,
        ty,
        subtype,
        caption,
        default_val,
        lookup_query,
    })
}

/// Convert one `<td>` header cell. Blank cells become a single space.
pub fn header_cell(node: &Element) -> Result<HeaderCell, ConvertError> {
    let colspan = match node.attr("colspan") {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| ConvertError::Format {
            attribute: "colspan".to_string(),
            value: raw.to_string(),
            expected: "an integer",
        })?),
        None => None,
    };

    let text = match node.text_opt().map(str::trim) {
        None | Some("") => " ".to_string(),
        Some(trimmed) => trimmed.replace(LEGACY_S_ACUTE, "ś"),
    };

    Ok(HeaderCell { text, colspan })
}

/// Assemble the form record from `<get_data>`.
pub fn form_record(get_data: &Element) -> Result<FormRecord, ConvertError> {
    let mut fields = Vec::new();
    for node in get_data.require("fields")?.find_all("field") {
        fields.push(field_record(node)?);
    }

    Ok(FormRecord {
        title: text_or_empty(get_data.require("title")?),
        title_on_page: text_or_empty(get_data.require("titleOnWeb")?),
        info: get_data
            .require("infoOnWeb")?
            .text_opt()
            .map(str::to_string),
        fields,
    })
}

/// Assemble the report record from `<report>`. `file_name` comes from the
/// document's top-level `fileName/@file` metadata.
pub fn report_record(report: &Element, file_name: &str) -> Result<ReportRecord, ConvertError> {
    let display = report.require("display_result")?;

    let mut headers = Vec::new();
    for row in display.require("header")?.find_all("tr") {
        let mut cells = Vec::new();
        for cell in row.find_all("td") {
            cells.push(header_cell(cell)?);
        }
        headers.push(cells);
    }

    let raw_query = report.require("sql")?.require("sql_question")?.text.clone();
    let query = BlockText(sql::rewrite_query(&raw_query));

    Ok(ReportRecord {
        title: text_or_empty(display.require("title")?),
        headers,
        query,
        file_name: file_name.to_string(),
        pdf_config: pdf_config(display)?,
    })
}

/// Extract page margins and column widths from the display node.
pub fn pdf_config(display: &Element) -> Result<PdfConfigRecord, ConvertError> {
    let pdf = display.require("pdf")?;
    let margins = [
        margin(pdf, "m_bot")?,
        margin(pdf, "m_top")?,
        margin(pdf, "m_right")?,
        margin(pdf, "m_left")?,
    ];

    let widths_raw = display.require("pdf_object")?.require_attr("cell_widths")?;
    let mut cell_widths = Vec::new();
    for token in widths_raw.split(',') {
        let token = token.trim();
        let width = token.parse::<f64>().map_err(|_| ConvertError::Format {
            attribute: "cell_widths".to_string(),
            value: token.to_string(),
            expected: "a comma-separated list of numbers",
        })?;
        cell_widths.push(width);
    }

    Ok(PdfConfigRecord {
        margins,
        cell_widths,
    })
}

fn margin(pdf: &Element, attribute: &str) -> Result<i64, ConvertError> {
    let raw = pdf.require_attr(attribute)?;
    raw.parse::<i64>().map_err(|_| ConvertError::Format {
        attribute: attribute.to_string(),
        value: raw.to_string(),
        expected: "an integer",
    })
}

fn text_or_empty(node: &Element) -> String {
    node.text_opt().unwrap_or_default().to_string()
}
