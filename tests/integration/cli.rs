//! Tests for the headless `vrcf-installer` binary

use super::common::{project_with_manifest, zip_bytes};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn installer_command() -> Command {
    Command::cargo_bin("vrcf-installer").unwrap()
}

#[test]
fn test_cli_skips_local_dev_install() {
    let temp = project_with_manifest("{\n  \"com.vrcfury.vrcfury\": \"file:../vrcfury\"\n}\n");

    installer_command()
        .arg("--project")
        .arg(temp.path())
        .arg("--url")
        .arg("http://127.0.0.1:1/never")
        .assert()
        .success()
        .stdout(predicate::str::contains("development mode"));

    assert!(!temp.path().join("Temp").exists());
}

#[test]
fn test_cli_missing_project() {
    installer_command()
        .arg("--project")
        .arg("/definitely/not/a/project/dir")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not accessible"));
}

#[test]
fn test_cli_invalid_config() {
    let temp = project_with_manifest("{}\n");
    let config = temp.path().join("installer.yaml");
    fs::write(&config, "legacy_paths:\n  - ../../etc\n").unwrap();

    installer_command()
        .arg("--project")
        .arg(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Path must stay inside the project"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_installs_package() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloadRawZip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(zip_bytes(&[("package.json", "{}"), ("Editor/A.cs", "a")])),
        )
        .mount(&mock_server)
        .await;

    let temp = project_with_manifest("{\n  \"dependencies\": {}\n}\n");
    let url = format!("{}/downloadRawZip", mock_server.uri());
    let project = temp.path().to_path_buf();

    tokio::task::spawn_blocking(move || {
        installer_command()
            .arg("--project")
            .arg(&project)
            .arg("--url")
            .arg(&url)
            .arg("--restart-delay")
            .arg("0")
            .assert()
            .success();
    })
    .await
    .unwrap();

    let installed = temp.path().join("Packages/com.vrcfury.vrcfury");
    assert!(installed.join("package.json").is_file());
    assert!(installed.join("Editor/A.cs").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cli_reports_download_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let temp = project_with_manifest("{}\n");
    let url = format!("{}/downloadRawZip", mock_server.uri());
    let project = temp.path().to_path_buf();
    let expected_url = url.clone();

    tokio::task::spawn_blocking(move || {
        installer_command()
            .arg("--project")
            .arg(&project)
            .arg("--url")
            .arg(&url)
            .arg("--restart-delay")
            .arg("0")
            .assert()
            .failure()
            .stderr(predicate::str::contains(expected_url))
            .stderr(predicate::str::contains("VRCFury Installer"));
    })
    .await
    .unwrap();

    assert!(!temp.path().join("Packages/com.vrcfury.vrcfury").exists());
}
