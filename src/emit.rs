//! YAML rendering for converted templates.
//!
//! The output format pins key order (`Form` before `Report`, fields in
//! record order) and two non-default styles: query text renders as a
//! literal block scalar and the PDF layout numbers render as inline flow
//! sequences. serde_yaml offers no per-field style control, so the
//! document is rendered here by a serialization layer that knows each
//! record's schema; the record types still derive serde traits, which is
//! how the tests read the output back.

use crate::model::{
    BlockText, FieldRecord, FormRecord, HeaderCell, PdfConfigRecord, ReportRecord,
    TemplateDocument,
};

const INDENT: &str = "  ";

/// Render a full template document.
pub fn document(doc: &TemplateDocument) -> String {
    let mut out = String::new();
    out.push_str("Form:\n");
    form(&mut out, &doc.form, 1);
    out.push_str("Report:\n");
    report(&mut out, &doc.report, 1);
    out
}

fn form(out: &mut String, form: &FormRecord, depth: usize) {
    key_scalar(out, depth, "Title", &form.title);
    key_scalar(out, depth, "TitleOnPage", &form.title_on_page);
    match &form.info {
        Some(info) => key_scalar(out, depth, "Info", info),
        None => push_line(out, depth, "Info: null"),
    }
    if form.fields.is_empty() {
        push_line(out, depth, "Fields: []");
    } else {
        push_line(out, depth, "Fields:");
        for field in &form.fields {
            field_item(out, field, depth);
        }
    }
}

fn field_item(out: &mut String, field: &FieldRecord, depth: usize) {
    push_line(out, depth, &format!("- Name: {}", scalar(&field.name)));
    key_scalar(out, depth + 1, "Type", &field.ty);
    key_scalar(out, depth + 1, "Subtype", &field.subtype);
    key_scalar(out, depth + 1, "Caption", &field.caption);
    if let Some(default_val) = field.default_val {
        push_line(out, depth + 1, &format!("DefaultVal: {default_val}"));
    }
    if let Some(lookup_query) = &field.lookup_query {
        key_scalar(out, depth + 1, "LookupQuery", lookup_query);
    }
}

fn report(out: &mut String, report: &ReportRecord, depth: usize) {
    key_scalar(out, depth, "Title", &report.title);
    if report.headers.is_empty() {
        push_line(out, depth, "Headers: []");
    } else {
        push_line(out, depth, "Headers:");
        header_rows(out, &report.headers, depth);
    }
    block_text(out, depth, "Query", &report.query);
    key_scalar(out, depth, "FileName", &report.file_name);
    push_line(out, depth, "PdfConfig:");
    pdf(out, &report.pdf_config, depth + 1);
}

/// Rows render as a nested block sequence, the first cell of each row
/// carrying both dashes (`- - Text: ...`).
fn header_rows(out: &mut String, rows: &[Vec<HeaderCell>], depth: usize) {
    for row in rows {
        if row.is_empty() {
            push_line(out, depth, "- []");
            continue;
        }
        for (i, cell) in row.iter().enumerate() {
            let text_entry = format!("- Text: {}", scalar(&cell.text));
            if i == 0 {
                push_line(out, depth, &format!("- {text_entry}"));
            } else {
                push_line(out, depth + 1, &text_entry);
            }
            if let Some(colspan) = cell.colspan {
                push_line(out, depth + 2, &format!("Colspan: {colspan}"));
            }
        }
    }
}

fn pdf(out: &mut String, config: &PdfConfigRecord, depth: usize) {
    let margins: Vec<String> = config.margins.iter().map(i64::to_string).collect();
    push_line(out, depth, &format!("Margins: [{}]", margins.join(", ")));

    let widths: Vec<String> = config.cell_widths.iter().map(|w| float(*w)).collect();
    push_line(out, depth, &format!("CellWidths: [{}]", widths.join(", ")));
}

/// Literal block scalar: `|` keeps the trailing newline, `|-` strips it.
/// Lines go out verbatim, so embedded quotes need no escaping.
fn block_text(out: &mut String, depth: usize, key: &str, text: &BlockText) {
    let body = text.as_str();
    if body.is_empty() {
        push_line(out, depth, &format!("{key}: ''"));
        return;
    }

    let header = if body.ends_with('\n') { "|" } else { "|-" };
    push_line(out, depth, &format!("{key}: {header}"));
    for line in body.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            for _ in 0..=depth {
                out.push_str(INDENT);
            }
            out.push_str(line);
            out.push('\n');
        }
    }
}

fn key_scalar(out: &mut String, depth: usize, key: &str, value: &str) {
    push_line(out, depth, &format!("{key}: {}", scalar(value)));
}

fn push_line(out: &mut String, depth: usize, content: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(content);
    out.push('\n');
}

/// Quote a string scalar only as far as the plain-style rules demand:
/// unquoted when safe, single quotes for edge whitespace, indicator
/// characters or lookalike literals, double quotes when escapes are
/// needed.
fn scalar(value: &str) -> String {
    if value.chars().any(|c| c.is_control()) {
        return double_quoted(value);
    }
    if plain_safe(value) {
        return value.to_string();
    }
    single_quoted(value)
}

fn plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if value.trim() != value {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if value.contains(": ") || value.ends_with(':') || value.contains(" #") {
        return false;
    }
    !resembles_other_type(value)
}

/// Strings that would read back as null, bool or number must be quoted.
fn resembles_other_type(value: &str) -> bool {
    matches!(
        value,
        "~" | "null" | "Null" | "NULL" | "true" | "True" | "TRUE" | "false" | "False" | "FALSE"
            | "yes" | "Yes" | "YES" | "no" | "No" | "NO" | "on" | "On" | "ON" | "off" | "Off"
            | "OFF"
    ) || value.parse::<f64>().is_ok()
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn double_quoted(value: &str) -> String {
    let mut quoted = String::from("\"");
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Floats always carry a decimal point so they read back as floats.
fn float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}
