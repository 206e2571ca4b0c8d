use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_cmdinfo")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_of(assert: assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Copy the site manifest and its source file into `dir`.
fn stage_site(dir: &Path) -> String {
    fs::copy(fixture_path("site.json"), dir.join("site.json")).unwrap();
    fs::copy(fixture_path("SiteCommands.php"), dir.join("SiteCommands.php")).unwrap();
    dir.join("site.json").to_str().unwrap().to_string()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_markdown() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    let output = stdout_of(cmd().write_stdin(input).assert().success());

    assert!(output.starts_with("## Index\n\n* [cache:rebuild](#cacherebuild)\n"));
    assert!(output.contains("### cache:rebuild\n"));
    assert!(output.contains("Rebuild all caches."));
    assert!(output.contains("cache:rebuild [options] [--] <site>"));
    assert!(output.contains("* `cr`"));
    assert!(output.contains("* `rebuild`"));
    assert!(output.contains("* `<site>` Site alias."));
    assert!(output.contains("* `--no-warm` Skip warming."));
    assert!(output.contains("* `--format[=FORMAT]` (default: `\"table\"`)"));
    assert!(output.contains("* `cache:rebuild default --no-warm` Rebuild without warming."));
    assert!(output.contains("Clears the render cache first"));
}

#[test]
fn stdin_mode_skips_hidden_hooks_and_plain_methods() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    let output = stdout_of(cmd().write_stdin(input).assert().success());

    assert!(!output.contains("secret:thing"));
    assert!(!output.contains("before:rebuild"));
    assert!(!output.contains("my:cool-command"));
    assert!(!output.contains("construct"));
}

#[test]
fn stdin_mode_show_hidden() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    cmd()
        .arg("--show-hidden")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("### secret:thing"));
}

#[test]
fn stdin_mode_all_methods() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    let output = stdout_of(cmd().arg("--all-methods").write_stdin(input).assert().success());

    assert!(output.contains("### my:cool-command"));
    assert!(output.contains("Does something cool."));
    assert!(output.contains("* `-s, --silent`"));
    assert!(output.contains("* `my:cool-command --silent` Runs quietly."));
    // Hooks stay out even when every method counts
    assert!(!output.contains("before:rebuild"));
}

#[test]
fn stdin_json_format() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    let output = stdout_of(cmd().args(["-f", "json", "--all-methods"]).write_stdin(input).assert().success());

    let doc: serde_json::Value = serde_json::from_str(&output).unwrap();
    let commands = doc["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0]["name"], "cache:rebuild");
    assert_eq!(commands[0]["aliases"], serde_json::json!(["cr", "rebuild"]));
    assert_eq!(commands[0]["arguments"]["site"]["description"], "Site alias.");
    assert_eq!(commands[1]["name"], "my:cool-command");
    assert_eq!(commands[1]["options"]["silent|s"]["default"], false);
    assert_eq!(commands[1]["arguments"], serde_json::json!({}));
    assert_eq!(
        commands[1]["example_usages"]["my:cool-command --silent"],
        "Runs quietly."
    );
}

#[test]
fn stdin_class_filter() {
    let input = fs::read_to_string(fixture_path("site.json")).unwrap();
    let output = stdout_of(
        cmd()
            .args(["--class", "Other\\Commands"])
            .write_stdin(input)
            .assert()
            .success(),
    );
    assert_eq!(output, "");
}

#[test]
fn stdin_malformed_manifest_fails() {
    cmd()
        .write_stdin("{ \"classes\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse manifest from stdin"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("site.json"))
        .assert()
        .success();

    let output = fs::read_to_string(dir.path().join("site.md")).unwrap();
    assert!(output.contains("### cache:rebuild"));
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("site.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn file_mode_json_format() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "json"])
        .arg(fixture_path("site.json"))
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("site.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["commands"][0]["name"], "cache:rebuild");
    assert_eq!(doc["commands"][0]["class"], "Site\\Commands");
}

#[test]
fn invalid_format_fails() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .args(["-f", "xml"])
        .arg(fixture_path("site.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn file_mode_directory_skips_broken_manifest() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path(""))
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipping"))
        .stderr(predicate::str::contains("broken.json"));

    assert!(dir.path().join("site.md").exists());
    assert!(!dir.path().join("broken.md").exists());
}

#[test]
fn file_mode_no_match_warns() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("*.nothing"))
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}

// -- cache --

#[test]
fn cache_dir_stores_one_record_per_method() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let manifest = stage_site(src.path());

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .args(["--cache-dir", cache.path().to_str().unwrap()])
        .arg(&manifest)
        .assert()
        .success();

    assert!(cache.path().join("Site%5CCommands%3A%3AcacheRebuild.json").exists());
    assert!(cache.path().join("Site%5CCommands%3A%3AsecretThing.json").exists());
    assert!(cache.path().join("Site%5CCommands%3A%3AbeforeRebuild.json").exists());
    // Plain methods are cached too, as invalid records
    let plain = fs::read_to_string(cache.path().join("Site%5CCommands%3A%3AmyCoolCommand.json")).unwrap();
    let plain: serde_json::Value = serde_json::from_str(&plain).unwrap();
    assert_eq!(plain["name"], "");
    assert_eq!(fs::read_dir(cache.path()).unwrap().count(), 4);
}

#[test]
fn fresh_cache_record_is_used_and_stale_one_rebuilt() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let manifest = stage_site(src.path());
    let run = || {
        cmd()
            .args(["-o", out.path().to_str().unwrap()])
            .args(["--cache-dir", cache.path().to_str().unwrap()])
            .arg(&manifest)
            .assert()
            .success();
        fs::read_to_string(out.path().join("site.md")).unwrap()
    };

    run();
    let entry = cache.path().join("Site%5CCommands%3A%3AcacheRebuild.json");
    let mut record: serde_json::Value = serde_json::from_str(&fs::read_to_string(&entry).unwrap()).unwrap();
    assert!(record["mtime"].as_u64().unwrap() > 0);

    record["description"] = "From the cache.".into();
    fs::write(&entry, serde_json::to_string(&record).unwrap()).unwrap();
    assert!(run().contains("From the cache."));

    // A record for another file revision is rebuilt from the docblock
    record["mtime"] = 1.into();
    fs::write(&entry, serde_json::to_string(&record).unwrap()).unwrap();
    let output = run();
    assert!(!output.contains("From the cache."));
    assert!(output.contains("Rebuild all caches."));
}

#[test]
fn garbage_cache_entry_is_a_miss() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let cache = TempDir::new().unwrap();
    let manifest = stage_site(src.path());
    fs::write(cache.path().join("Site%5CCommands%3A%3AcacheRebuild.json"), "not json").unwrap();

    cmd()
        .args(["-o", out.path().to_str().unwrap()])
        .args(["--cache-dir", cache.path().to_str().unwrap()])
        .arg(&manifest)
        .assert()
        .success();

    let output = fs::read_to_string(out.path().join("site.md")).unwrap();
    assert!(output.contains("### cache:rebuild"));
    let rewritten = fs::read_to_string(cache.path().join("Site%5CCommands%3A%3AcacheRebuild.json")).unwrap();
    assert!(rewritten.contains("\"schema\""));
}
