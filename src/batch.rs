//! Batch conversion: file discovery, per-file pipeline, tree mirroring.
//!
//! Files convert independently and sequentially; the batch stops at the
//! first failing file, leaving already-written output in place.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::emit;
use crate::error::ConvertError;
use crate::extract;
use crate::model::TemplateDocument;
use crate::xml;

/// Extension of legacy template files under the input root.
const INPUT_EXTENSION: &str = "xml";
/// Extension of converted templates under the output root.
const OUTPUT_EXTENSION: &str = "yml";

/// Convert one template's raw bytes into the rendered output document.
pub fn convert_bytes(bytes: &[u8]) -> Result<String, ConvertError> {
    let text = xml::decode(bytes)?;
    let root = xml::parse(&text)?;

    let file_name = root.require("fileName")?.require_attr("file")?.to_string();
    let form = extract::form_record(root.require("get_data")?)?;
    let report = extract::report_record(root.require("report")?, &file_name)?;

    let document = TemplateDocument { form, report };
    Ok(emit::document(&document))
}

/// Convert one file from the input tree, mirroring its relative directory
/// under the output root. Returns the path written.
pub fn convert_file(source: &Path, input_root: &Path, output_root: &Path) -> Result<PathBuf> {
    let bytes =
        fs::read(source).with_context(|| format!("failed to read {}", source.display()))?;
    let rendered = convert_bytes(&bytes)
        .with_context(|| format!("failed to convert {}", source.display()))?;

    let relative = source
        .strip_prefix(input_root)
        .with_context(|| format!("{} is outside the input root", source.display()))?;
    let target_dir = match relative.parent() {
        Some(parent) => output_root.join(parent),
        None => output_root.to_path_buf(),
    };
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("failed to create {}", target_dir.display()))?;

    let file_name = relative
        .file_name()
        .with_context(|| format!("{} has no file name", source.display()))?;
    let target = target_dir.join(file_name).with_extension(OUTPUT_EXTENSION);
    fs::write(&target, rendered)
        .with_context(|| format!("failed to write {}", target.display()))?;

    info!("converted {} -> {}", source.display(), target.display());
    Ok(target)
}

/// Convert every template under `input_root`, writing the mirrored tree
/// under `output_root`. Returns the number of files converted.
pub fn convert_tree(input_root: &Path, output_root: &Path) -> Result<usize> {
    let sources = find_template_files(input_root)?;
    debug!(
        "discovered {} template file(s) under {}",
        sources.len(),
        input_root.display()
    );

    for source in &sources {
        convert_file(source, input_root, output_root)?;
    }

    Ok(sources.len())
}

/// Recursively collect template files. Sorted for deterministic order.
fn find_template_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            files.extend(find_template_files(&path)?);
        } else if path
            .extension()
            .map(|e| e == INPUT_EXTENSION)
            .unwrap_or(false)
        {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
