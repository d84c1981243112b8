#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

use std::fs;
use std::time::Duration;

use assert_cmd::Command;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

pub const GUIDE: &str = "# Guide\n\nIntro paragraph. Second sentence! Third one?\n\n## Install\n\nRun the installer.\n\n- step one\n- step two\n";

/// A `doctree` command isolated from the user's config and environment.
pub fn doctree_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("doctree"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("XDG_CONFIG_HOME", config_home.path());
    cmd.env("NO_COLOR", "1");
    for key in [
        "DOCTREE_CONFIG",
        "DOCTREE_WINDOW_SIZE",
        "DOCTREE_TREE_NODES_PER_WINDOW",
        "DOCTREE_DEPTH_MODE",
        "DOCTREE_ERROR_POLICY",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

/// `guide.md`, `nested/deep.md` and `notes.txt` in a fresh directory.
pub fn docs_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create docs dir");
    fs::write(dir.path().join("guide.md"), GUIDE).unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(
        dir.path().join("nested/deep.md"),
        "## Deep\n\n- parent\n  - child\n",
    )
    .unwrap();
    fs::write(dir.path().join("notes.txt"), "first note\n\nsecond note\n").unwrap();
    dir
}
