pub mod accounts;
pub mod task;
pub mod vm;

use crate::expect::fragment;
use crate::harness::Harness;
use crate::report;
use crate::test_case::TestCase;
use serde_json::json;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    Ping,
    Accounts,
    Task,
    Vm,
    All,
}

pub fn run(h: &mut Harness, suite: Suite) {
    match suite {
        Suite::Ping => require_ping(h),
        Suite::Accounts => accounts::run(h),
        Suite::Task => task::run(h),
        Suite::Vm => vm::run(h),
        Suite::All => {
            accounts::run(h);
            task::run(h);
            vm::run(h);
        }
    }
}

pub fn ping(h: &mut Harness) -> bool {
    h.run(TestCase::new("ping", "get /ping", fragment(json!("pong"))))
}

// Nothing else can be trusted when the API is unreachable.
fn require_ping(h: &mut Harness) {
    if !ping(h) {
        report::fatal("ping failed");
    }
}

pub fn create_test_user(h: &mut Harness, record_admin_task_prefix: bool) {
    accounts::login_admin_ok(h);
    if record_admin_task_prefix {
        task::record_task_prefix(h, task::record_admin_prefix);
    }
    accounts::user_create_201(h);
    accounts::logout_ok(h);
}

pub fn delete_test_user(h: &mut Harness) {
    accounts::login_admin_ok(h);
    accounts::user_delete_200(h);
    accounts::logout_ok(h);
}
