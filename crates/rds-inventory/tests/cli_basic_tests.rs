use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test command isolated from the user's config and AWS setup
fn rds_inventory(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rds-inventory").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RDS_INVENTORY_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .env_remove("AWS_PROFILE");
    cmd
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("accounts.toml");
    fs::write(&path, content).unwrap();
    path
}

const TWO_ACCOUNTS: &str = r#"
regions = ["us-east-1", "sa-east-1"]

[[accounts]]
profile = "account-dev"
alias = "dev"

[[accounts]]
profile = "account-prod"
alias = "prod"
"#;

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("RDS instances and clusters"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_help_short_flag() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rds-inventory"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scan_help() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-dir"))
        .stdout(predicate::str::contains("--region"))
        .stdout(predicate::str::contains("--profile"));
}

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .arg("invalid-command")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .args(["accounts", "-o", "xml"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_no_args_without_config_fails_before_aws() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("No accounts configured"))
        .stderr(predicate::str::contains("rds-inventory config-path"));
}

#[test]
fn test_accounts_lists_configured_accounts() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, TWO_ACCOUNTS);

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .arg("accounts")
        .assert()
        .success()
        .stdout(predicate::str::contains("account-dev"))
        .stdout(predicate::str::contains("prod"))
        .stdout(predicate::str::contains("Regions: us-east-1, sa-east-1"));
}

#[test]
fn test_accounts_json_output() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, TWO_ACCOUNTS);

    let output = rds_inventory(&home)
        .env("RDS_INVENTORY_CONFIG_FILE", &config)
        .args(["accounts", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["accounts"][1]["profile"], "account-prod");
    assert_eq!(value["regions"][1], "sa-east-1");
}

#[test]
fn test_config_path_honours_explicit_file() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, TWO_ACCOUNTS);

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("accounts.toml"));
}

#[test]
fn test_config_path_default_location() {
    let home = TempDir::new().unwrap();
    rds_inventory(&home)
        .arg("config-path")
        .assert()
        .success()
        .stdout(predicate::str::contains("rds-inventory"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_scan_unknown_profile_filter() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, TWO_ACCOUNTS);

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .args(["scan", "--profile", "account-staging"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Profile 'account-staging' is not configured",
        ))
        .stderr(predicate::str::contains("rds-inventory accounts"));
}

#[test]
fn test_scan_rejects_duplicate_profiles() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
[[accounts]]
profile = "account-dev"
alias = "dev"

[[accounts]]
profile = "account-dev"
alias = "dev-again"
"#,
    );

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .arg("scan")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Profile 'account-dev' is configured more than once",
        ));
}

#[test]
fn test_scan_rejects_empty_region() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, TWO_ACCOUNTS);
    let out_dir = home.path().join("reports");

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .args(["scan", "--region", ""])
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Region entry #0 is empty"));

    // Nothing is written for a rejected config
    assert!(!out_dir.exists());
}

#[test]
fn test_corrupt_config_is_reported() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, "[[accounts]\nprofile = ");

    rds_inventory(&home)
        .arg("--config-file")
        .arg(&config)
        .arg("accounts")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}
