use escheck::config::Config;
use escheck::expect::fragment;
use escheck::harness::Harness;
use escheck::suites::{self, accounts, task, Suite};
use escheck::test_case::TestCase;
use serde_json::json;
use std::path::PathBuf;

fn stub_harness() -> Harness {
    let mut config = Config::default();
    config.install_root =
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/es_stub"));
    config.throttle_secs = 0;

    Harness::new(config).unwrap()
}

#[test]
fn test_ping_scenario_succeeds() {
    let mut h = stub_harness();

    assert!(suites::ping(&mut h));
    assert_eq!(h.tallies.run, 1);
    assert_eq!(h.tallies.failed, 0);
}

#[test]
fn test_ping_suite_passes_against_the_stub() {
    let mut h = stub_harness();

    suites::run(&mut h, Suite::Ping);

    assert_eq!(h.tallies.run, 1);
    assert_eq!(h.tallies.failed, 0);
    assert_eq!(h.exit_code(), 0);
}

#[test]
fn test_logout_without_session_scenario() {
    let session = tempfile::NamedTempFile::new().unwrap();
    let mut config = Config::default();
    config.install_root =
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/es_stub"));
    config.session_file = session.path().to_path_buf();
    let mut h = Harness::new(config).unwrap();

    accounts::logout_without_session(&mut h);

    assert!(!session.path().exists());
    assert_eq!(h.tallies.run, 1);
    assert_eq!(h.tallies.failed, 0);
}

#[test]
fn test_exit_code_mismatch_is_counted_not_fatal() {
    let mut h = stub_harness();

    let passed = h.run(TestCase::new(
        "wrongcode",
        "get /wrongcode",
        fragment(json!("pong")),
    ));

    assert!(!passed);
    assert_eq!(h.tallies.failed, 1);

    // The run continues: the next test still executes and passes.
    assert!(suites::ping(&mut h));
    assert_eq!(h.tallies.run, 2);
    assert_eq!(h.tallies.failed, 1);
    assert_eq!(h.exit_code(), 1);
}

#[test]
fn test_unparseable_reply_is_counted() {
    let mut h = stub_harness();

    assert!(!h.run(TestCase::new("badjson", "get /badjson", fragment(json!("anything")))));
    assert_eq!(h.tallies.failed, 1);
}

#[test]
fn test_status_code_mismatch_is_counted() {
    let mut h = stub_harness();

    let case = TestCase::new("ping_created", "get /ping", fragment(json!("pong"))).status(201);
    assert!(!h.run(case));
    assert_eq!(h.tallies.failed, 1);
}

#[test]
fn test_structure_mismatch_is_counted() {
    let mut h = stub_harness();

    assert!(!h.run(TestCase::new("ping_pang", "get /ping", fragment(json!("pang")))));
    assert_eq!(h.tallies.failed, 1);
}

#[test]
fn test_recording_the_user_task_prefix() {
    let mut h = stub_harness();

    task::record_task_prefix(&mut h, task::record_user_prefix);

    assert_eq!(h.tallies.failed, 0);
    assert_eq!(h.user_task_prefix(), "1e1d1");
    assert!(h.state.admin_task_prefix.is_none());
}

#[test]
fn test_recording_the_admin_task_prefix() {
    let mut h = stub_harness();

    task::record_task_prefix(&mut h, task::record_admin_prefix);

    assert_eq!(h.admin_task_prefix(), "1e1d1");
}

#[test]
#[should_panic(expected = "user task prefix")]
fn test_reading_an_unrecorded_prefix_is_a_programming_error() {
    let h = stub_harness();

    h.user_task_prefix();
}

#[test]
fn test_warnings_are_tallied_separately() {
    let mut h = stub_harness();

    suites::ping(&mut h);
    h.warn("throttle", "skipping break, throttle_secs is zero");

    assert_eq!(h.tallies.run, 1);
    assert_eq!(h.tallies.warned, 1);
    assert_eq!(h.tallies.failed, 0);
    assert_eq!(h.tallies.successful(), 0);
}

#[test]
fn test_throttle_returns_immediately_when_disabled() {
    let h = stub_harness();

    // throttle_secs is zero in the stub config; this must not block.
    h.throttle();
}
