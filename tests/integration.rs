// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Integration tests for jsdoc-tooltips parsing, rendering and the CLI.

use jsdoc_tooltips::{generate, parser, renderer};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const MODULE_PREFIX: &str = "/*eslint-disable*/\nexport const tooltips = ";

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/graph-config-jsdoc.json")
}

fn fixture_json() -> String {
    fs::read_to_string(fixture_path()).expect("Failed to read fixture")
}

/// Extracts the mapping object from a generated module.
fn parse_module(module: &str) -> serde_json::Map<String, serde_json::Value> {
    let body = module
        .strip_prefix(MODULE_PREFIX)
        .and_then(|rest| rest.strip_suffix(";\n"))
        .unwrap_or_else(|| panic!("Unexpected module wrapper: {module}"));

    match serde_json::from_str(body).expect("Module body should be JSON") {
        serde_json::Value::Object(map) => map,
        other => panic!("Expected an object, got {other:?}"),
    }
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_jsdoc-tooltips"))
        .args(args)
        .output()
        .expect("Failed to run binary")
}

/// Renders the sample parser output and checks every parameter made it through.
#[test]
fn renders_sample_config() {
    let json = fixture_json();
    let module = generate(&json, &renderer::RenderOptions::default()).unwrap();
    let tooltips = parse_module(&module);

    let keys: Vec<_> = tooltips.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "automaticRearrangeOnDataChange",
            "height",
            "node.labelProperty",
            "link.color",
            "node.payload",
        ]
    );
}

/// Tests that the key set matches the parameter names.
#[test]
fn key_set_matches_param_names() {
    let json = fixture_json();
    let params = parser::parse_params(&json).unwrap();
    let tooltips = renderer::merge_all(&params, &renderer::RenderOptions::default());

    let mut names: Vec<_> = params.iter().map(|p| p.name.clone()).collect();
    let mut keys: Vec<_> = tooltips.iter().map(|e| e.name.clone()).collect();
    names.sort();
    keys.sort();
    assert_eq!(names, keys);
}

/// Tests the single-parameter example end to end.
#[test]
fn round_trips_single_param() {
    let json = r#"[{ "params": [{
        "name": "a.b",
        "type": { "names": ["number"] },
        "optional": false,
        "defaultvalue": 0,
        "description": "x"
    }] }]"#;

    let module = generate(json, &renderer::RenderOptions::default()).unwrap();
    let tooltips = parse_module(&module);

    assert_eq!(tooltips.len(), 1);
    let markup = tooltips["a.b"].as_str().unwrap();
    assert!(markup.contains("<h4>a.b</h4>"));
    assert!(markup.contains("number"));
    assert!(markup.contains("false"));
    assert!(markup.contains('0'));
}

/// Tests that image sizes in descriptions are clamped.
#[test]
fn clamps_description_images() {
    let module = generate(&fixture_json(), &renderer::RenderOptions::default()).unwrap();
    let tooltips = parse_module(&module);
    let markup = tooltips["link.color"].as_str().unwrap();

    assert!(markup.contains("width='400'"), "Width should be clamped");
    assert!(markup.contains("height='200'"), "Height should be clamped");
    assert!(!markup.contains("820"));
    assert!(!markup.contains("380"));
}

/// Tests that untyped parameters get the wildcard type.
#[test]
fn untyped_param_uses_wildcard() {
    let module = generate(&fixture_json(), &renderer::RenderOptions::default()).unwrap();
    let tooltips = parse_module(&module);
    let markup = tooltips["node.payload"].as_str().unwrap();

    assert!(markup.contains("<b>type</b>: * |"));
    assert!(markup.contains("<b>default value</b>: undefined"));
}

/// Tests that type unions keep their declared order.
#[test]
fn type_union_order_preserved() {
    let module = generate(&fixture_json(), &renderer::RenderOptions::default()).unwrap();
    let tooltips = parse_module(&module);
    let markup = tooltips["node.labelProperty"].as_str().unwrap();

    assert!(markup.contains("<b>type</b>: string|function |"));
}

/// Tests that javascript code blocks are removed from the output.
#[test]
fn javascript_blocks_stripped() {
    let module = generate(&fixture_json(), &renderer::RenderOptions::default()).unwrap();

    assert!(!module.contains("```"), "Fences should be stripped");
    assert!(!module.contains("labelProperty: node =>"));

    let tooltips = parse_module(&module);
    let markup = tooltips["node.labelProperty"].as_str().unwrap();
    assert!(markup.contains("fetch the label content.<br/>\n</div>"));
}

/// Tests that generation is byte-for-byte repeatable.
#[test]
fn output_is_idempotent() {
    let json = fixture_json();
    let opts = renderer::RenderOptions::default();

    assert_eq!(
        generate(&json, &opts).unwrap(),
        generate(&json, &opts).unwrap()
    );
}

/// Tests the shape checks on parser output.
#[test]
fn rejects_malformed_parser_output() {
    let opts = renderer::RenderOptions::default();

    assert!(matches!(
        generate("[]", &opts),
        Err(parser::ParseError::NoEntries)
    ));
    assert!(matches!(
        generate(r#"[{"kind": "member"}]"#, &opts),
        Err(parser::ParseError::MissingParams)
    ));
}

#[test]
fn cli_writes_module_to_stdout() {
    let fixture = fixture_path();
    let output = run_cli(&[fixture.to_str().unwrap()]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        generate(&fixture_json(), &renderer::RenderOptions::default()).unwrap()
    );
}

#[test]
fn cli_writes_module_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("generated/tooltips.js");
    let fixture = fixture_path();

    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "Nothing should go to stdout");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Wrote"), "Progress message expected: {stderr}");
    assert!(stderr.contains("(5 tooltips)"));

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with(MODULE_PREFIX));
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tooltips.js");
    fs::write(&out_path, "existing").unwrap();
    let fixture = fixture_path();

    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "existing");

    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "--force",
    ]);
    assert!(output.status.success());
    assert!(
        fs::read_to_string(&out_path)
            .unwrap()
            .starts_with(MODULE_PREFIX)
    );
}

#[test]
fn cli_fails_on_invalid_input_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.json");
    let out_path = dir.path().join("tooltips.js");
    fs::write(&input, "[]").unwrap();

    let output = run_cli(&[input.to_str().unwrap(), "-o", out_path.to_str().unwrap()]);

    assert!(!output.status.success());
    assert!(!out_path.exists(), "No output should be written");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(
        stderr.contains("invalid JSON provided from jsdoc parser"),
        "Unexpected error: {stderr}"
    );
}

#[test]
fn cli_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tooltips.js");
    let fixture = fixture_path();

    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "--dry-run",
    ]);

    assert!(output.status.success());
    assert!(!out_path.exists());
    assert!(String::from_utf8(output.stderr).unwrap().contains("Would write"));
}

#[test]
fn cli_reads_stdin_and_warns_on_duplicates() {
    let json = r#"[{ "params": [
        { "name": "dup", "description": "first" },
        { "name": "dup", "description": "second" }
    ] }]"#;

    let mut child = Command::new(env!("CARGO_BIN_EXE_jsdoc-tooltips"))
        .args(["-", "--last-wins"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(json.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("duplicate parameter `dup` (kept last occurrence)"));

    let tooltips = parse_module(&String::from_utf8(output.stdout).unwrap());
    assert_eq!(tooltips.len(), 1);
    assert!(tooltips["dup"].as_str().unwrap().contains(">second</div>"));
}

#[test]
fn cli_reports_missing_params_from_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_jsdoc-tooltips"))
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn binary");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"[{"x": 1}]"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("<stdin>"), "Unexpected error: {stderr}");
    assert!(
        stderr.contains("first doc entry has no `params` array"),
        "Unexpected error: {stderr}"
    );
}

#[test]
fn cli_quiet_silences_dry_run_and_skip_messages() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("tooltips.js");
    let fixture = fixture_path();

    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "--dry-run",
        "--quiet",
    ]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    assert!(!out_path.exists());

    fs::write(&out_path, "existing").unwrap();
    let output = run_cli(&[
        fixture.to_str().unwrap(),
        "-o",
        out_path.to_str().unwrap(),
        "-q",
    ]);
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    assert_eq!(fs::read_to_string(&out_path).unwrap(), "existing");

    let output = run_cli(&[fixture.to_str().unwrap(), "-n", "-q"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(output.stderr.is_empty());
}
