#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::fs;

use anyhow::Result;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;

use common::{docs_dir, doctree_cmd};

fn json_stdout(output: &std::process::Output) -> Result<Value> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn list_shows_markdown_documents() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("list")
        .arg(docs.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("guide.md"))
        .stdout(predicate::str::contains("nested/deep.md"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn list_json_is_sorted_by_id() -> Result<()> {
    // Given: a directory with two markdown files
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    // When: listing as JSON
    let assert = doctree_cmd(&home)
        .arg("list")
        .arg(docs.path())
        .args(["--format", "json"])
        .assert()
        .success();

    // Then: ids and titles come from paths and stems
    let listed = json_stdout(assert.get_output())?;
    let ids: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["guide.md", "nested/deep.md"]);
    assert_eq!(listed[0]["title"], "guide");
    assert!(listed[0]["lastEditedTime"].is_string());
    Ok(())
}

#[test]
fn config_pattern_selects_text_files() -> Result<()> {
    let docs = docs_dir();
    let home = tempfile::tempdir()?;
    let config = home.path().join("doctree.toml");
    fs::write(&config, "[local]\npattern = \"*.txt\"\n")?;

    doctree_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("list")
        .arg(docs.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"))
        .stdout(predicate::str::contains("guide.md").not());
    Ok(())
}

#[test]
fn tree_prints_indented_outline() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("tree")
        .arg(docs.path())
        .arg("guide.md")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Guide\n"))
        .stdout(predicate::str::contains("\n  ## Install\n"))
        .stdout(predicate::str::contains("[bulleted_list_item] step one"));
}

#[test]
fn tree_depth_mode_nests_indented_items() -> Result<()> {
    // Given: a nested list
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    // When: building the tree by indentation
    let assert = doctree_cmd(&home)
        .arg("tree")
        .arg(docs.path())
        .args(["nested/deep.md", "--depth-mode", "indent", "-f", "json"])
        .assert()
        .success();

    // Then: the child item hangs below its parent item
    let tree = json_stdout(assert.get_output())?;
    let heading = &tree["children"][0];
    assert_eq!(heading["type"], "heading_2");
    let parent = &heading["children"][0];
    assert_eq!(parent["content"], "parent");
    assert_eq!(parent["children"][0]["content"], "child");
    Ok(())
}

#[test]
fn render_as_rst_and_outline() -> Result<()> {
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    doctree_cmd(&home)
        .arg("render")
        .arg(docs.path())
        .args(["guide.md", "--as", "rst"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Guide\n=====\n"))
        .stdout(predicate::str::contains("Install\n-------\n"));

    let assert = doctree_cmd(&home)
        .arg("render")
        .arg(docs.path())
        .args(["guide.md", "--as", "outline"])
        .assert()
        .success();
    let outline = json_stdout(assert.get_output())?;
    assert_eq!(outline["id"], "guide.md");
    assert_eq!(outline["content"][0]["type"], "heading_1");
    assert_eq!(outline["content"][0]["key"], "heading_0_guide");
    Ok(())
}

#[test]
fn render_plain_text_document_as_markdown() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("render")
        .arg(docs.path())
        .arg("notes.txt")
        .assert()
        .success()
        .stdout("first note\nsecond note\n");
}

#[test]
fn preview_by_sentences_and_blocks() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("preview")
        .arg(docs.path())
        .args(["guide.md", "--sentences", "1"])
        .assert()
        .success()
        .stdout("Guide Intro paragraph....\n");

    doctree_cmd(&home)
        .arg("preview")
        .arg(docs.path())
        .args(["guide.md", "--blocks", "1"])
        .assert()
        .success()
        .stdout("[heading_1] Guide\n");
}

#[test]
fn preview_bounds_are_exclusive() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("preview")
        .arg(docs.path())
        .args(["guide.md", "--blocks", "1", "--chars", "5"])
        .assert()
        .failure();
}

#[test]
fn preview_sizes_come_from_config() -> Result<()> {
    // Given: a config with small preview bounds
    let docs = docs_dir();
    let home = tempfile::tempdir()?;
    let config = home.path().join("doctree.toml");
    fs::write(&config, "[preview]\nblocks = 1\nchars = 5\nsentences = 2\n")?;
    let preview = |extra: &[&str]| {
        let mut cmd = doctree_cmd(&home);
        cmd.arg("--config")
            .arg(&config)
            .arg("preview")
            .arg(docs.path())
            .arg("guide.md")
            .args(extra);
        cmd
    };

    // When/Then: bare bounds and the no-bound default use the configured sizes
    preview(&["--chars"]).assert().success().stdout("Guide...\n");
    preview(&["--sentences"])
        .assert()
        .success()
        .stdout("Guide Intro paragraph. Second sentence!...\n");
    preview(&[]).assert().success().stdout("[heading_1] Guide\n");

    // And: an explicit number still wins
    preview(&["--chars", "3"]).assert().success().stdout("Gui...\n");
    Ok(())
}

#[test]
fn window_json_reports_position() -> Result<()> {
    // Given: a six block document
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    // When: asking for the second page of two
    let assert = doctree_cmd(&home)
        .arg("window")
        .arg(docs.path())
        .args(["guide.md", "--offset", "2", "--limit", "2", "-f", "json"])
        .assert()
        .success();

    // Then: the page sits in the middle
    let window = json_stdout(assert.get_output())?;
    assert_eq!(window["total_count"], 6);
    assert_eq!(window["offset"], 2);
    assert_eq!(window["has_previous"], true);
    assert_eq!(window["has_next"], true);
    assert_eq!(window["items"][0]["type"], "heading_2");
    Ok(())
}

#[test]
fn window_all_covers_every_block_once() -> Result<()> {
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    let assert = doctree_cmd(&home)
        .arg("window")
        .arg(docs.path())
        .args(["guide.md", "--all", "--limit", "4", "-f", "json"])
        .assert()
        .success();

    let windows = json_stdout(assert.get_output())?;
    let sizes: Vec<usize> = windows
        .as_array()
        .unwrap()
        .iter()
        .map(|window| window["items"].as_array().unwrap().len())
        .collect();
    assert_eq!(sizes, vec![4, 2]);
    Ok(())
}

#[test]
fn window_text_has_header_and_footer() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("window")
        .arg(docs.path())
        .args(["guide.md", "--limit", "2", "--tree"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# guide (Window 0-2 of 6)"))
        .stdout(predicate::str::contains("More content available in next window"));
}

#[test]
fn find_text_starts_window_at_match() -> Result<()> {
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    let assert = doctree_cmd(&home)
        .arg("find")
        .arg(docs.path())
        .args(["guide.md", "--text", "INSTALLER", "-f", "json"])
        .assert()
        .success();

    let window = json_stdout(assert.get_output())?;
    assert_eq!(window["offset"], 3);
    assert_eq!(window["items"][0]["id"], "guide_4");
    Ok(())
}

#[test]
fn find_case_sensitive_miss_fails() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("find")
        .arg(docs.path())
        .args(["guide.md", "--text", "INSTALLER", "--case-sensitive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn find_block_in_tree_uses_context() -> Result<()> {
    let docs = docs_dir();
    let home = tempfile::tempdir()?;

    let assert = doctree_cmd(&home)
        .arg("find")
        .arg(docs.path())
        .args(["guide.md", "--block", "guide_5", "--tree", "-C", "1", "-f", "json"])
        .assert()
        .success();

    let window = json_stdout(assert.get_output())?;
    assert_eq!(window["offset"], 3);
    assert_eq!(window["items"][1]["block"]["id"], "guide_5");
    Ok(())
}

#[test]
fn unknown_document_fails_with_message() {
    let docs = docs_dir();
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .arg("tree")
        .arg(docs.path())
        .arg("missing.md")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Document 'missing.md' not found"));
}

#[test]
fn missing_directory_fails() {
    let home = tempfile::tempdir().unwrap();

    doctree_cmd(&home)
        .args(["list", "/definitely/not/a/doctree/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open source directory"));
}
