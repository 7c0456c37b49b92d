use docex_config::{BrowserKind, ExplorerConfigLoader};
use serial_test::serial;
use std::{fs, path::PathBuf};
use tempfile::TempDir;

fn write_yaml(tmp: &TempDir, name: &str, yaml: &str) -> PathBuf {
    let path = tmp.path().join(name);
    fs::write(&path, yaml).expect("write yaml");
    path
}

#[test]
#[serial]
fn loads_file_with_env_placeholders() {
    let tmp = TempDir::new().unwrap();
    let path = write_yaml(
        &tmp,
        "docex.yaml",
        r#"
base_url: "https://paperwork.example.com"
username: "qa-bot"
password: "${DOCEX_TEST_PW}"
browser:
  kind: chrome
  headless: true
timeouts:
  element_secs: 5
"#,
    );

    temp_env::with_var("DOCEX_TEST_PW", Some("s3cret"), || {
        let cfg = ExplorerConfigLoader::new()
            .with_file(&path)
            .load()
            .expect("config loads");

        assert_eq!(cfg.base_url, "https://paperwork.example.com");
        assert_eq!(cfg.password, "s3cret");
        assert_eq!(cfg.browser.kind, BrowserKind::Chrome);
        assert!(cfg.browser.headless);
        assert_eq!(cfg.timeouts.element_secs, 5);
        // Unspecified sections keep their defaults.
        assert_eq!(cfg.timeouts.table_secs, 15);
        assert_eq!(cfg.fixtures.known_document, "ReferenceCardForMac.pdf");
        cfg.validate().expect("valid config");
    });
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    let tmp = TempDir::new().unwrap();
    let path = write_yaml(
        &tmp,
        "docex.yaml",
        r#"
base_url: "https://paperwork.example.com"
username: "from-file"
password: "pw"
"#,
    );

    temp_env::with_var("DOCEX_USERNAME", Some("from-env"), || {
        let cfg = ExplorerConfigLoader::new()
            .with_file(&path)
            .load()
            .expect("config loads");
        assert_eq!(cfg.username, "from-env");
    });
}

#[test]
#[serial]
fn inline_yaml_snippets_merge() {
    let cfg = ExplorerConfigLoader::new()
        .with_yaml_str(
            r#"
base_url: "https://paperwork.example.com"
username: "qa-bot"
password: "pw"
"#,
        )
        .load()
        .expect("config loads");

    assert_eq!(cfg.browser.kind, BrowserKind::Firefox);
    assert_eq!(cfg.browser.endpoint(), "http://localhost:4444");
    assert_eq!(
        cfg.explorer_url(),
        "https://paperwork.example.com/document-explorer"
    );
}
