use crate::client::{ClientError, ClientOutput};
use crate::expect::{Expect, Mismatch};
use crate::harness::SuiteState;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Post-match hook: runs against the reply `text` after all other checks
/// passed. Returning false fails the test. Used by fixtures that record
/// shared state for later tests (task-ID prefixes) or assert shapes the
/// structural matcher cannot express.
pub type VerifyFn = fn(&Value, &mut SuiteState) -> bool;

pub struct TestCase {
    pub name: &'static str,
    pub command: String,
    pub expect: Expect,
    pub status: i64,
    pub exit_code: i32,
    pub verify: Option<VerifyFn>,
}

impl TestCase {
    pub fn new<C>(name: &'static str, command: C, expect: Expect) -> TestCase
    where
        C: Into<String>,
    {
        TestCase {
            name,
            command: command.into(),
            expect,
            status: 200,
            exit_code: 0,
            verify: None,
        }
    }

    pub fn status(mut self, status: i64) -> TestCase {
        self.status = status;
        self
    }

    pub fn exit_code(mut self, exit_code: i32) -> TestCase {
        self.exit_code = exit_code;
        self
    }

    pub fn verified_by(mut self, verify: VerifyFn) -> TestCase {
        self.verify = Some(verify);
        self
    }
}

/// Every client reply is a status code plus a JSON payload.
#[derive(Deserialize)]
pub struct ApiReply {
    pub status: i64,
    pub text: Value,
}

pub enum CheckFailure {
    Client(ClientError),
    ExitCode { expected: i32, actual: i32 },
    ReplyNotParsed(serde_json::Error),
    StatusCode { expected: i64, actual: i64 },
    StructureNotFound(Mismatch),
    VerifyFailed,
}

impl Display for CheckFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(err) => write!(f, "{}", err),
            Self::ExitCode { expected, actual } => {
                write!(f, "return_code={} (expected {})", actual, expected)
            }
            Self::ReplyNotParsed(err) => write!(f, "json not parsed: {}", err),
            Self::StatusCode { expected, actual } => {
                write!(f, "status code mismatch: {} (expected {})", actual, expected)
            }
            Self::StructureNotFound(mismatch) => {
                write!(f, "test structure not found: {}", mismatch)
            }
            Self::VerifyFailed => write!(f, "custom check failed"),
        }
    }
}

/// Check a captured client invocation against a test case.
///
/// Checks run in a fixed order and the first failing one decides the verdict:
/// exit code, reply shape, status code, expected structure, verify hook.
pub fn evaluate(
    case: &TestCase,
    output: &ClientOutput,
    state: &mut SuiteState,
) -> Result<(), CheckFailure> {
    if output.exit_code != case.exit_code {
        return Err(CheckFailure::ExitCode {
            expected: case.exit_code,
            actual: output.exit_code,
        });
    }

    let reply: ApiReply =
        serde_json::from_str(&output.stdout).map_err(CheckFailure::ReplyNotParsed)?;

    if reply.status != case.status {
        return Err(CheckFailure::StatusCode {
            expected: case.status,
            actual: reply.status,
        });
    }

    case.expect
        .verify(&reply.text)
        .map_err(CheckFailure::StructureNotFound)?;

    if let Some(verify) = case.verify {
        if !verify(&reply.text, state) {
            return Err(CheckFailure::VerifyFailed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect::fragment;
    use serde_json::json;

    fn output(stdout: &str, exit_code: i32) -> ClientOutput {
        ClientOutput {
            stdout: stdout.to_owned(),
            stderr: String::new(),
            exit_code,
        }
    }

    fn check(case: &TestCase, out: &ClientOutput) -> Result<(), CheckFailure> {
        evaluate(case, out, &mut SuiteState::default())
    }

    #[test]
    fn test_ping_scenario_passes() {
        let case = TestCase::new("ping", "get /ping", fragment(json!("pong")));
        let out = output(r#"{"status": 200, "text": "pong"}"#, 0);

        assert!(check(&case, &out).is_ok());
    }

    #[test]
    fn test_denied_scenario_needs_exit_code_and_detail() {
        let case = TestCase::new(
            "logout_without_session",
            "logout",
            fragment(json!({"detail": "Authentication credentials were not provided."})),
        )
        .status(403)
        .exit_code(1);

        let denied = r#"{"status": 403, "text": {"detail": "Authentication credentials were not provided."}}"#;
        assert!(check(&case, &output(denied, 1)).is_ok());
        // Same reply, wrong exit code.
        assert!(matches!(
            check(&case, &output(denied, 0)),
            Err(CheckFailure::ExitCode { actual: 0, .. })
        ));

        let other_detail = r#"{"status": 403, "text": {"detail": "Permission denied"}}"#;
        assert!(matches!(
            check(&case, &output(other_detail, 1)),
            Err(CheckFailure::StructureNotFound(_))
        ));
    }

    #[test]
    fn test_exit_code_is_checked_before_parsing() {
        let case = TestCase::new("ping", "get /ping", fragment(json!("pong")));

        assert!(matches!(
            check(&case, &output("garbage", 1)),
            Err(CheckFailure::ExitCode { actual: 1, .. })
        ));
        assert!(matches!(
            check(&case, &output("garbage", 0)),
            Err(CheckFailure::ReplyNotParsed(_))
        ));
    }

    #[test]
    fn test_reply_without_status_field_does_not_parse() {
        let case = TestCase::new("ping", "get /ping", fragment(json!("pong")));
        let out = output(r#"{"text": "pong"}"#, 0);

        assert!(matches!(
            check(&case, &out),
            Err(CheckFailure::ReplyNotParsed(_))
        ));
    }

    #[test]
    fn test_status_code_mismatch() {
        let case = TestCase::new("ping", "get /ping", fragment(json!("pong"))).status(201);
        let out = output(r#"{"status": 200, "text": "pong"}"#, 0);

        assert!(matches!(
            check(&case, &out),
            Err(CheckFailure::StatusCode {
                expected: 201,
                actual: 200,
            })
        ));
    }

    #[test]
    fn test_failing_verify_hook() {
        fn never(_text: &Value, _state: &mut SuiteState) -> bool {
            false
        }

        let case = TestCase::new("ping", "get /ping", fragment(json!("pong"))).verified_by(never);
        let out = output(r#"{"status": 200, "text": "pong"}"#, 0);

        assert!(matches!(check(&case, &out), Err(CheckFailure::VerifyFailed)));
    }
}
