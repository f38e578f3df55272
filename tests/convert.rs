//! End-to-end tests: a temp directory tree of legacy templates in, a
//! mirrored tree of YAML documents out.

use std::fs;

use tempfile::tempdir;

use tplconv::{convert_tree, TemplateDocument};

fn template(file: &str, query: &str) -> String {
    format!(
        r#"<template>
  <fileName file="{file}"/>
  <get_data>
    <title>Working hours</title>
    <titleOnWeb>Working hours</titleOnWeb>
    <infoOnWeb/>
    <fields>
      <field name="q" type="string" subtype="plain" caption="Query"/>
    </fields>
  </get_data>
  <report>
    <display_result>
      <title>Hours report</title>
      <header>
        <tr><td/></tr>
      </header>
      <pdf m_bot="0" m_top="0" m_right="0" m_left="0"/>
      <pdf_object cell_widths="10,20"/>
    </display_result>
    <sql>
      <sql_question>{query}</sql_question>
    </sql>
  </report>
</template>"#
    )
}

#[test]
fn converts_a_minimal_template() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();
    fs::write(input.join("hours.xml"), template("hours_report", "SELECT 1")).unwrap();

    let count = convert_tree(&input, &output).unwrap();
    assert_eq!(count, 1);

    let rendered = fs::read_to_string(output.join("hours.yml")).unwrap();
    assert!(rendered.starts_with("Form:\n"));
    assert!(rendered.contains("Query: |-"));

    let doc: TemplateDocument = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(doc.form.title, "Working hours");
    assert_eq!(doc.form.fields.len(), 1);
    assert_eq!(doc.form.fields[0].name, "q");
    assert_eq!(doc.report.query.as_str(), "SELECT 1");
    assert_eq!(doc.report.file_name, "hours_report");
    assert_eq!(doc.report.headers.len(), 1);
    assert_eq!(doc.report.headers[0][0].text, " ");
    assert_eq!(doc.report.headers[0][0].colspan, None);
    assert_eq!(doc.report.pdf_config.margins, [0, 0, 0, 0]);
    assert_eq!(doc.report.pdf_config.cell_widths, vec![10.0, 20.0]);
}

#[test]
fn mirrors_nested_directories_with_swapped_extensions() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("out");
    fs::create_dir_all(input.join("a/b")).unwrap();

    fs::write(input.join("one.xml"), template("one", "SELECT 1")).unwrap();
    fs::write(input.join("a/two.xml"), template("two", "SELECT 2")).unwrap();
    fs::write(input.join("a/b/three.xml"), template("three", "SELECT 3")).unwrap();
    // Non-template files are left alone.
    fs::write(input.join("a/notes.txt"), "not a template").unwrap();

    let count = convert_tree(&input, &output).unwrap();
    assert_eq!(count, 3);

    assert!(output.join("one.yml").is_file());
    assert!(output.join("a/two.yml").is_file());
    assert!(output.join("a/b/three.yml").is_file());
    assert!(!output.join("a/notes.txt").exists());
    assert!(!output.join("a/notes.yml").exists());
}

#[test]
fn rerunning_produces_identical_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    fs::write(
        input.join("hours.xml"),
        template("hours_report", "SELECT *\nFROM hours\nWHERE d=@day"),
    )
    .unwrap();

    let first_out = dir.path().join("out1");
    let second_out = dir.path().join("out2");
    convert_tree(&input, &first_out).unwrap();
    convert_tree(&input, &second_out).unwrap();

    let first = fs::read(first_out.join("hours.yml")).unwrap();
    let second = fs::read(second_out.join("hours.yml")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn aborts_on_the_first_failing_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();

    // Sorts before the good file, so nothing is written.
    fs::write(input.join("broken.xml"), "<a><b></a>").unwrap();
    fs::write(input.join("hours.xml"), template("hours", "SELECT 1")).unwrap();

    let err = convert_tree(&input, &output).unwrap_err();
    assert!(format!("{err:#}").contains("broken.xml"));
    assert!(!output.join("hours.yml").exists());
}

#[test]
fn legacy_codepage_text_survives_into_utf8_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    let output = dir.path().join("out");
    fs::create_dir_all(&input).unwrap();

    // '!' marks the spots for raw legacy bytes: 0xB3 is 'ł' in
    // ISO-8859-2 and 0x9C is the stray windows-1250 'ś'.
    let mut bytes = template("dzialy", "SELECT imi! FROM dzialy")
        .replace("Working hours", "Dzia!y")
        .into_bytes();
    let mut replacements = [0xB3u8, 0xB3, 0x9C].into_iter();
    for byte in bytes.iter_mut() {
        if *byte == b'!' {
            *byte = replacements.next().unwrap();
        }
    }
    fs::write(input.join("dzialy.xml"), bytes).unwrap();

    convert_tree(&input, &output).unwrap();

    let rendered = fs::read_to_string(output.join("dzialy.yml")).unwrap();
    let doc: TemplateDocument = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(doc.form.title, "Działy");
    assert_eq!(doc.report.query.as_str(), "SELECT imiś FROM dzialy");
}
