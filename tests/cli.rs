use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::tempdir;

/// Environment variables that would leak the caller's setup into a test run
const AMBIENT_ENV: [&str; 12] = [
    "GHAS_CONFIG",
    "GHAS_RECIPIENT",
    "GHAS_ORGS_FILE",
    "GHAS_GITHUB_API_URL",
    "GHAS_DEBUG",
    "AZURE_KEYVAULT_URL",
    "AZURE_TENANT_ID",
    "AZURE_CLIENT_ID",
    "AZURE_CLIENT_SECRET",
    "AZURE_AUTHORITY_HOST",
    "IDENTITY_ENDPOINT",
    "IDENTITY_HEADER",
];

fn ghas_report() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ghas-report"));
    for var in AMBIENT_ENV {
        cmd.env_remove(var);
    }
    cmd
}

fn write_config(dir: &Path, vault_url: Option<&str>) -> PathBuf {
    let path = dir.join("config.yaml");
    let mut contents = String::from("recipient: security@example.com\norganizations_file: orgs.json\n");
    if let Some(url) = vault_url {
        contents.push_str(&format!("vault_url: {url}\n"));
    }
    fs::write(&path, contents).expect("failed to write config");
    path
}

fn write_orgs(dir: &Path, json: &str) {
    fs::write(dir.join("orgs.json"), json).expect("failed to write organizations file");
}

#[test]
fn version_prints_package_version() {
    ghas_report()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn status_uses_custom_config_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), Some("https://kv-test.vault.azure.net/"));
    write_orgs(
        temp.path(),
        r#"{"organizations":[{"name":"acme"},{"name":"globex","enabled":true},{"name":"initech","enabled":false}]}"#,
    );

    let assert = ghas_report()
        .arg("status")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(stdout.contains(&config_path.to_string_lossy().to_string()));
    assert!(stdout.contains("Key Vault: https://kv-test.vault.azure.net/"));
    assert!(stdout.contains("Recipient: security@example.com"));
    assert!(stdout.contains("(2 enabled, 1 disabled)"));

    Ok(())
}

#[test]
fn status_reports_missing_explicit_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let missing = temp.path().join("nope.yaml");

    ghas_report()
        .arg("status")
        .arg("--config")
        .arg(&missing)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file not found"))
        .stdout(predicate::str::contains("ghas-report init"));

    Ok(())
}

#[test]
fn report_without_vault_url_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = tempdir()?;
    let config_path = write_config(temp.path(), None);
    write_orgs(temp.path(), r#"{"organizations":[{"name":"acme"}]}"#);

    ghas_report()
        .arg("report")
        .arg("--no-email")
        .arg("--config")
        .arg(&config_path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Key Vault URL not configured"));

    Ok(())
}

#[test]
fn scan_rejects_unknown_format() {
    ghas_report()
        .args(["scan", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn completion_generates_script() {
    ghas_report()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ghas-report"));
}
