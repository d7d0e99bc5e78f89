use escheck::client::{EsClient, LocateError};
use escheck::config::Config;
use std::path::PathBuf;

fn stub_config() -> Config {
    let mut config = Config::default();
    config.install_root = Some(stub_root());
    config
}

fn stub_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/es_stub")
}

#[test]
fn test_locate_finds_the_stub_client() {
    assert!(EsClient::locate(&stub_config()).is_ok());
}

#[test]
fn test_locate_fails_for_an_empty_install_root() {
    let empty_root = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.install_root = Some(empty_root.path().to_path_buf());

    match EsClient::locate(&config) {
        Err(LocateError::MissingBinary(path)) => {
            assert!(path.ends_with("bin/es"));
        }
        _ => panic!("expected a missing-binary error"),
    }
}

#[test]
fn test_run_captures_stdout_and_exit_code() {
    let client = EsClient::locate(&stub_config()).unwrap();

    let output = client.run("get /ping").unwrap();
    assert_eq!(output.exit_code, 0);
    assert!(output.stdout.contains("pong"));

    let output = client.run("logout").unwrap();
    assert_eq!(output.exit_code, 1);
    assert!(output.stdout.contains("Authentication credentials"));
}

#[test]
fn test_run_appends_the_configured_datacenter() {
    let mut config = stub_config();
    config.datacenter = String::from("staging");
    let client = EsClient::locate(&config).unwrap();

    let output = client.run("get /dcecho").unwrap();
    assert!(output.stdout.contains("dc=staging"));
}

#[test]
fn test_remove_session_deletes_the_token_file() {
    let session = tempfile::NamedTempFile::new().unwrap();
    let mut config = stub_config();
    config.session_file = session.path().to_path_buf();
    let client = EsClient::locate(&config).unwrap();

    assert!(session.path().exists());
    client.remove_session();
    assert!(!session.path().exists());

    // A second removal has nothing to delete and must not fail.
    client.remove_session();
}

#[test]
fn test_nonzero_exit_with_valid_reply_is_captured() {
    let client = EsClient::locate(&stub_config()).unwrap();

    let output = client.run("get /wrongcode").unwrap();
    assert_eq!(output.exit_code, 7);
    assert!(serde_json::from_str::<serde_json::Value>(&output.stdout).is_ok());
}
