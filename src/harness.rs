use crate::client::{EsClient, LocateError};
use crate::config::{Config, Credentials};
use crate::report::{self, Tallies};
use crate::test_case::{evaluate, CheckFailure, TestCase};
use std::thread;
use std::time::Duration;

/// State written by designated test steps and read by later ones. Tests
/// using a recorded value must run after the step that records it.
#[derive(Default)]
pub struct SuiteState {
    pub user_task_prefix: Option<String>,
    pub admin_task_prefix: Option<String>,
}

/// Drives test cases against the client, one at a time, collecting tallies
/// and shared suite state along the way.
pub struct Harness {
    client: EsClient,
    config: Config,
    pub tallies: Tallies,
    pub state: SuiteState,
}

impl Harness {
    pub fn new(config: Config) -> Result<Harness, LocateError> {
        let client = EsClient::locate(&config)?;

        Ok(Harness {
            client,
            config,
            tallies: Tallies::default(),
            state: SuiteState::default(),
        })
    }

    /// Run a single test case: invoke the client, check the outcome, report
    /// and tally it. Returns whether the test passed; failures never abort
    /// the run.
    pub fn run(&mut self, case: TestCase) -> bool {
        self.tallies.run += 1;

        let output = match self.client.run(&case.command) {
            Ok(output) => output,
            Err(err) => {
                self.tallies.failed += 1;
                report::test_failed(case.name, &CheckFailure::Client(err).to_string(), None);
                return false;
            }
        };

        match evaluate(&case, &output, &mut self.state) {
            Ok(()) => {
                report::test_ok(case.name);
                true
            }
            Err(failure) => {
                self.tallies.failed += 1;
                report::test_failed(case.name, &failure.to_string(), Some(&output));
                false
            }
        }
    }

    /// Record a warning against the current run without failing it.
    pub fn warn(&mut self, name: &'static str, reason: &str) {
        self.tallies.warned += 1;
        report::test_warning(name, reason, None);
    }

    /// Fixed synchronous pause to stay under the API request-rate limit.
    pub fn throttle(&self) {
        let seconds = self.config.throttle_secs;
        report::throttle_banner(seconds);
        for _ in 0..seconds {
            report::throttle_tick();
            thread::sleep(Duration::from_secs(1));
        }
        report::throttle_done();
    }

    /// Drop the cached session token so the next invocation runs
    /// unauthenticated.
    pub fn remove_session(&self) {
        self.client.remove_session();
    }

    pub fn user_credentials(&self) -> &Credentials {
        &self.config.user
    }

    pub fn admin_credentials(&self) -> &Credentials {
        &self.config.admin
    }

    pub fn user_task_prefix(&self) -> &str {
        self.state
            .user_task_prefix
            .as_deref()
            .expect("user task prefix should be recorded by an earlier test step")
    }

    pub fn admin_task_prefix(&self) -> &str {
        self.state
            .admin_task_prefix
            .as_deref()
            .expect("admin task prefix should be recorded by an earlier test step")
    }

    pub fn print_summary(&self) {
        report::print_summary(&self.tallies);
    }

    /// Process exit status for the whole run: the number of failed tests.
    pub fn exit_code(&self) -> i32 {
        self.tallies.failed as i32
    }
}
