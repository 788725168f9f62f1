use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const TEMPLATE: &str = "inst_{year:04d}_{day:03d}.dat";

fn skycat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_skycat"))
}

fn run_cli(home: &Path, args: &[&str]) -> Output {
    Command::new(skycat_bin())
        .args(args)
        .env("SKYCAT_HOME", home)
        .env_remove("SKYCAT_CONFIG")
        .output()
        .expect("failed to execute skycat CLI")
}

fn run_cli_json(home: &Path, args: &[&str]) -> serde_json::Value {
    let output = run_cli(home, args);
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "failed to parse JSON output: {}\nstdout:\n{}",
            err,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

#[test]
fn list_json_reports_entries_in_time_order() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    touch(&data, &["inst_2009_002.dat", "inst_2009_001.dat", "notes.txt"]);

    let value = run_cli_json(
        temp.path(),
        &["list", "--path", data.to_str().unwrap(), "--template", TEMPLATE, "--json"],
    );
    assert_eq!(value["count"], 2);
    assert_eq!(value["entries"][0]["filename"], "inst_2009_001.dat");
    assert_eq!(value["entries"][1]["timestamp"], "2009-01-02T00:00:00");
    assert_eq!(value["stats"]["filesNew"], 2);
    assert_eq!(value["stats"]["filesUnmatched"], 1);
}

#[test]
fn lookup_json_and_missing_time() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    touch(&data, &["inst_2008_366.dat"]);
    let path = data.to_str().unwrap();

    let value = run_cli_json(
        temp.path(),
        &["lookup", "--path", path, "--template", TEMPLATE, "--time", "2008-12-31", "--json"],
    );
    assert_eq!(value["filename"], "inst_2008_366.dat");

    let output = run_cli(
        temp.path(),
        &["lookup", "--path", path, "--template", TEMPLATE, "--time", "2009-001"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No file at 2009-001"));
}

#[test]
fn new_reports_only_files_since_last_run() {
    let temp = TempDir::new().unwrap();
    let data_root = temp.path().join("root");
    let instrument = data_root.join("pysat").join("testing");
    touch(&instrument, &["inst_2009_001.dat"]);

    let config = temp.path().join("skycat.toml");
    fs::write(
        &config,
        format!(
            "data_root = {:?}\nplatform = \"pysat\"\nname = \"testing\"\nfile_format = \"{}\"\n",
            data_root.to_str().unwrap(),
            TEMPLATE
        ),
    )
    .unwrap();
    let config = config.to_str().unwrap();

    let first = run_cli_json(temp.path(), &["new", "--config", config, "--json"]);
    assert_eq!(first["new"].as_array().unwrap().len(), 1);

    touch(&instrument, &["inst_2009_002.dat"]);
    let second = run_cli_json(temp.path(), &["new", "--config", config, "--json"]);
    let new = second["new"].as_array().unwrap();
    assert_eq!(new.len(), 1);
    assert_eq!(new[0]["filename"], "inst_2009_002.dat");
    assert_eq!(second["total"], 2);

    let third = run_cli_json(temp.path(), &["new", "--config", config, "--json"]);
    assert!(third["new"].as_array().unwrap().is_empty());
}

#[test]
fn check_template_rejects_fieldless_template() {
    let temp = TempDir::new().unwrap();
    let output = run_cli(temp.path(), &["check-template", "plain.dat"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid filename template"));

    let value = run_cli_json(temp.path(), &["check-template", TEMPLATE, "--json"]);
    assert_eq!(value["dayOfYear"], true);
    assert_eq!(value["fields"][0]["field"], "year");
}
