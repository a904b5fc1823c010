//! Config discovery and layering, checked through the built binary.
//!
//! Most tests read the effective settings back from `info --json`; the rest
//! check that loaded settings change what `density` and `count` do.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary from `dir`.
///
/// The user config directory is pointed inside `dir` so a developer's own
/// `~/.config/seo-lens/` never leaks into assertions.
#[allow(deprecated)]
fn cmd_in(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .env_remove("RUST_LOG")
        .args(["-C", dir.to_str().unwrap()]);
    cmd
}

/// Run `cmd`, require success, and parse stdout.
fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "exit {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn info_json(dir: &Path) -> Value {
    stdout_json(cmd_in(dir).args(["info", "--json"]))
}

const STUFFED: &str = "SEO is great. SEO helps you rank. I love SEO strategy.";

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "info");
    assert_eq!(json["config"]["ngram_size"], 1);
    assert_eq!(json["config"]["prominence_window"], 100);
    assert_eq!(json["config"]["max_phrases"], 20);
    assert_eq!(json["config"]["min_count"], 2);
    assert_eq!(json["config"]["title_range"], serde_json::json!([30, 60]));
    assert_eq!(json["config"]["description_range"], serde_json::json!([70, 160]));
    assert!(
        json["config"]["config_file"].is_null(),
        "no config file should be reported"
    );
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "ngram_size = 2\n").unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["ngram_size"], 2);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".seo-lens.toml"), "reported: {reported}");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("content").join("blog");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join("seo-lens.toml"), "max_grade = 9.0\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["max_grade"], 9.0);
}

#[test]
fn regular_name_overrides_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join("seo-lens.toml"), r#"log_level = "error""#).unwrap();

    let json = info_json(tmp.path());

    assert_eq!(
        json["config"]["log_level"], "error",
        "seo-lens.toml should override .seo-lens.toml"
    );
}

#[test]
fn closer_config_takes_precedence() {
    let tmp = TempDir::new().unwrap();
    let sub_dir = tmp.path().join("site");
    fs::create_dir_all(&sub_dir).unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "ngram_size = 3\n").unwrap();
    fs::write(sub_dir.join(".seo-lens.toml"), "ngram_size = 2\n").unwrap();

    let json = info_json(&sub_dir);

    assert_eq!(json["config"]["ngram_size"], 2);
}

// =============================================================================
// Formats and Nested Tables
// =============================================================================

#[test]
fn parses_toml_tables() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".seo-lens.toml"),
        "[density]\nmin_count = 3\nmax_phrases = 5\n\n[serp]\ntitle_max = 55\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["min_count"], 3);
    assert_eq!(json["config"]["max_phrases"], 5);
    assert_eq!(json["config"]["title_range"], serde_json::json!([30, 55]));
}

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".seo-lens.yaml"),
        "log_level: warn\ndensity:\n  prominence_window: 50\n",
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "warn");
    assert_eq!(json["config"]["prominence_window"], 50);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".seo-lens.json"),
        r#"{"max_density_percent": 2.5, "serp": {"description_min": 100}}"#,
    )
    .unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["max_density_percent"], 2.5);
    assert_eq!(json["config"]["description_range"], serde_json::json!([100, 160]));
}

#[test]
fn later_extension_overrides_earlier_in_same_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), r#"log_level = "debug""#).unwrap();
    fs::write(tmp.path().join(".seo-lens.yaml"), "log_level: error\n").unwrap();

    let json = info_json(tmp.path());

    assert_eq!(json["config"]["log_level"], "error", "yaml should override toml");
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "ngram_size = 2\n").unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, "ngram_size = 3\n").unwrap();

    let json = stdout_json(cmd_in(tmp.path()).args([
        "--config",
        explicit.to_str().unwrap(),
        "info",
        "--json",
    ]));
    assert_eq!(json["config"]["ngram_size"], 3);
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.toml"), "reported: {reported}");
}

// =============================================================================
// Environment Overrides
// =============================================================================

#[test]
fn env_var_overrides_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "max_grade = 8.0\n").unwrap();

    let json = stdout_json(
        cmd_in(tmp.path())
            .env("SEO_LENS_MAX_GRADE", "11.5")
            .env("SEO_LENS_SERP__TITLE_MAX", "50")
            .args(["info", "--json"]),
    );
    assert_eq!(json["config"]["max_grade"], 11.5);
    assert_eq!(json["config"]["title_range"], serde_json::json!([30, 50]));
}

#[test]
fn disable_input_limit_removes_limit() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "disable_input_limit = true\n").unwrap();

    let json = info_json(tmp.path());

    assert!(json["config"]["max_input_bytes"].is_null());
}

// =============================================================================
// Config Driving Commands
// =============================================================================

#[test]
fn config_max_density_gates_density_command() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "max_density_percent = 10.0\n").unwrap();
    fs::write(tmp.path().join("page.txt"), STUFFED).unwrap();

    cmd_in(tmp.path())
        .args(["density", "page.txt", "--target", "seo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("keyword stuffing"));
}

#[test]
fn cli_flag_overrides_config_max_density() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "max_density_percent = 10.0\n").unwrap();
    fs::write(tmp.path().join("page.txt"), STUFFED).unwrap();

    cmd_in(tmp.path())
        .args(["density", "page.txt", "--target", "seo", "--max-density", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS:"));
}

#[test]
fn extra_stop_words_filter_top_phrases() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".seo-lens.toml"),
        "[density]\nextra_stop_words = [\"acme\"]\n",
    )
    .unwrap();
    fs::write(tmp.path().join("page.txt"), "acme widgets. acme widgets.").unwrap();

    let json = stdout_json(cmd_in(tmp.path()).args(["--json", "density", "page.txt"]));
    let phrases = json["top_phrases"].as_array().unwrap();
    assert_eq!(phrases.len(), 1);
    assert_eq!(phrases[0]["phrase"], "widgets");
}

#[test]
fn config_ngram_size_is_default_for_density() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "ngram_size = 2\n").unwrap();
    fs::write(
        tmp.path().join("page.txt"),
        "search engine optimization search engine results",
    )
    .unwrap();

    let json = stdout_json(cmd_in(tmp.path()).args(["--json", "density", "page.txt"]));
    assert_eq!(json["top_phrases"][0]["phrase"], "search engine");
    assert_eq!(json["top_phrases"][0]["count"], 2);
}

#[test]
fn config_input_limit_applies() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "max_input_bytes = 10\n").unwrap();
    fs::write(tmp.path().join("page.txt"), STUFFED).unwrap();

    cmd_in(tmp.path())
        .args(["count", "page.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn invalid_toml_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "this is not valid toml [[[").unwrap();

    cmd_in(tmp.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_json_config_shows_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.json"), "{not valid json}").unwrap();

    cmd_in(tmp.path()).arg("info").assert().failure();
}

#[test]
fn out_of_range_ngram_size_in_config_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".seo-lens.toml"), "ngram_size = 4\n").unwrap();

    cmd_in(tmp.path())
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn unknown_config_field_is_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".seo-lens.toml"),
        "log_level = \"info\"\nunknown_field = \"should be ignored\"\n",
    )
    .unwrap();

    let json = info_json(tmp.path());
    assert_eq!(json["config"]["log_level"], "info");
}

// =============================================================================
// Boundary Marker Tests
// =============================================================================

#[test]
fn git_boundary_stops_config_search() {
    let tmp = TempDir::new().unwrap();
    let parent = tmp.path().join("parent");
    let repo = parent.join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    fs::write(parent.join(".seo-lens.toml"), r#"log_level = "error""#).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();

    let json = info_json(&src);

    assert_eq!(
        json["config"]["log_level"], "info",
        "search should stop at the .git boundary"
    );
    assert!(json["config"]["config_file"].is_null());
}

#[test]
fn config_in_same_dir_as_git_is_found() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let src = repo.join("src");
    fs::create_dir_all(&src).unwrap();

    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(repo.join(".seo-lens.toml"), r#"log_level = "debug""#).unwrap();

    let json = info_json(&src);

    assert_eq!(json["config"]["log_level"], "debug");
    assert!(json["config"]["config_file"].as_str().is_some());
}
