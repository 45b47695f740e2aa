//! End-to-end install runs

use super::common::{project_with_manifest, run_installer, snapshot, test_config, zip_bytes};
use std::fs;
use std::sync::Arc;
use vrcf_installer::di::mocks::{MockHost, MockPackageClient};
use vrcf_installer::package::{HttpPackageClient, InstallOutcome, InstallStage, SkipReason};
use vrcf_installer::InstallerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_local_dev_install_is_left_alone() {
    let temp = project_with_manifest(
        "{\n  \"dependencies\": {\n    \"com.vrcfury.vrcfury\": \"file:../local\"\n  }\n}\n",
    );
    let package_dir = temp.path().join("Packages/com.vrcfury.vrcfury");
    fs::create_dir_all(&package_dir).unwrap();
    fs::write(package_dir.join("package.json"), "{}").unwrap();
    let before = snapshot(temp.path());

    let host = MockHost::new(temp.path());
    let client = MockPackageClient::serving(zip_bytes(&[("foo.txt", "foo")]));
    let outcome = run_installer(
        host.clone(),
        Arc::new(client.clone()),
        test_config("http://unused.invalid/zip"),
    )
    .await;

    assert!(matches!(
        outcome,
        InstallOutcome::Skipped(SkipReason::LocalDevInstall)
    ));
    assert!(client.requests().is_empty());
    assert_eq!(host.resolution_count(), 0);
    assert!(host.dialogs().is_empty());
    assert_eq!(snapshot(temp.path()), before);
}

#[tokio::test]
async fn test_upgrade_replaces_package_and_removes_legacy() {
    let manifest = r#"{
  "dependencies": {
    "com.vrchat.avatars": "3.4.2",
    "com.vrcfury.vrcfury": "https://vrcfury.com/downloads/com.vrcfury.vrcfury.tgz",
    "com.vrcfury.legacyprefabs": "file:com.vrcfury.legacyprefabs.tgz",
    "com.unity.timeline": "1.7.4"
  }
}
"#;
    let temp = project_with_manifest(manifest);
    let root = temp.path();
    fs::create_dir_all(root.join("Packages/com.vrcfury.vrcfury/Editor")).unwrap();
    fs::write(root.join("Packages/com.vrcfury.vrcfury/Editor/Old.cs"), "old").unwrap();
    fs::create_dir_all(root.join("Packages/com.vrcfury.legacyprefabs")).unwrap();
    fs::write(root.join("Packages/com.vrcfury.legacyprefabs/prefab.asset"), "x").unwrap();

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloadRawZip"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(zip_bytes(&[
            ("foo.txt", "foo"),
            ("sub/", ""),
            ("sub/bar.txt", "bar"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let host = MockHost::new(root);
    let outcome = run_installer(
        host.clone(),
        Arc::new(HttpPackageClient::new()),
        test_config(&format!("{}/downloadRawZip", mock_server.uri())),
    )
    .await;

    assert!(
        matches!(outcome, InstallOutcome::Succeeded { restarted: true }),
        "unexpected outcome: {:?}",
        outcome
    );

    let installed = root.join("Packages/com.vrcfury.vrcfury");
    assert_eq!(fs::read_to_string(installed.join("foo.txt")).unwrap(), "foo");
    assert_eq!(fs::read_to_string(installed.join("sub/bar.txt")).unwrap(), "bar");
    assert!(!installed.join("Editor").exists());
    assert!(!root.join("Packages/com.vrcfury.legacyprefabs").exists());

    let rewritten = fs::read_to_string(root.join("Packages/manifest.json")).unwrap();
    let expected: Vec<&str> = manifest
        .lines()
        .filter(|l| !l.contains("com.vrcfury."))
        .collect();
    assert_eq!(rewritten.lines().collect::<Vec<_>>(), expected);

    assert!(root.join("Temp/vrcfInstalling").is_dir());
    assert_eq!(host.resolution_count(), 2);
    assert!(host.dialogs().is_empty());
}

#[tokio::test]
async fn test_rerun_after_success_reinstalls_cleanly() {
    let temp = project_with_manifest("{}\n");
    let client = MockPackageClient::serving(zip_bytes(&[("foo.txt", "v2")]));
    let host = MockHost::new(temp.path());

    let first = run_installer(host.clone(), Arc::new(client.clone()), test_config("http://a/zip")).await;
    assert!(matches!(first, InstallOutcome::Succeeded { restarted: false }));

    // The second load finds the first install and replaces it
    let second = run_installer(host.clone(), Arc::new(client.clone()), test_config("http://a/zip")).await;
    assert!(matches!(second, InstallOutcome::Succeeded { restarted: true }));

    let installed = temp.path().join("Packages/com.vrcfury.vrcfury/foo.txt");
    assert_eq!(fs::read_to_string(installed).unwrap(), "v2");
    assert_eq!(client.requests().len(), 2);
    assert_eq!(host.resolution_count(), 4);
}

#[tokio::test]
async fn test_server_error_fails_run() {
    let temp = project_with_manifest(
        "{\n  \"com.vrcfury.vrcfury\": \"https://vrcfury.com/com.vrcfury.vrcfury.tgz\"\n}\n",
    );
    fs::create_dir_all(temp.path().join("Packages/com.vrcfury.vrcfury")).unwrap();

    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloadRawZip"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let url = format!("{}/downloadRawZip", mock_server.uri());

    let host = MockHost::new(temp.path());
    let outcome = run_installer(
        host.clone(),
        Arc::new(HttpPackageClient::new()),
        test_config(&url),
    )
    .await;

    match outcome {
        InstallOutcome::Failed { stage, error } => {
            assert_eq!(stage, InstallStage::Downloading);
            assert!(matches!(error, InstallerError::Network { .. }));
            assert!(error.to_string().contains(&url));
        }
        other => panic!("Expected failure, got {:?}", other),
    }

    // The old install was removed and nothing new was put in its place
    assert!(!temp.path().join("Packages/com.vrcfury.vrcfury").exists());
    assert_eq!(host.resolution_count(), 1);

    let dialogs = host.dialogs();
    assert_eq!(dialogs.len(), 1);
    assert!(dialogs[0].1.contains(&url));
    assert!(dialogs[0].1.contains("https://vrcfury.com/download"));
    assert!(dialogs[0].1.contains("https://vrcfury.com/discord"));
}
