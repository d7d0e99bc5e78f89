//! Task API fixtures: permission checks against task IDs owned by the test
//! user and by the admin, built from recorded task-ID prefixes.

use crate::expect::fragment;
use crate::harness::{Harness, SuiteState};
use crate::suites::accounts;
use crate::suites::{create_test_user, delete_test_user, require_ping};
use crate::task_id::task_prefix_of;
use crate::test_case::{TestCase, VerifyFn};
use serde_json::{json, Value};

pub fn run(h: &mut Harness) {
    require_ping(h);
    create_test_user(h, true);
    accounts::login_user_ok(h);
    record_task_prefix(h, record_user_prefix);
    task_list_200(h);
    task_details_404(h);
    task_details_foreign_403(h);
    task_done_201(h);
    task_done_foreign_403(h);
    task_status_201(h);
    task_status_foreign_403(h);
    task_cancel_406(h);
    task_cancel_foreign_403(h);
    task_log_200(h);
    accounts::logout_ok(h);
    task_list_logout_403(h);
    task_status_logout_403(h);
    task_done_logout_403(h);
    task_log_logout_403(h);
    task_log_page_logout_403(h);
    delete_test_user(h);
}

/// Any command that schedules a task returns a task ID; listing servers is
/// the cheapest one. The hook keeps the ID's prefix for later fixtures.
pub fn record_task_prefix(h: &mut Harness, record: VerifyFn) {
    let exp = fragment(json!({"status": "SUCCESS", "result": []}));

    h.run(TestCase::new("record_task_prefix", "get /vm", exp).verified_by(record));
}

pub fn record_user_prefix(text: &Value, state: &mut SuiteState) -> bool {
    match text.get("task_id").and_then(Value::as_str) {
        Some(task_id) => {
            state.user_task_prefix = Some(task_prefix_of(task_id));
            true
        }
        None => false,
    }
}

pub fn record_admin_prefix(text: &Value, state: &mut SuiteState) -> bool {
    match text.get("task_id").and_then(Value::as_str) {
        Some(task_id) => {
            state.admin_task_prefix = Some(task_prefix_of(task_id));
            true
        }
        None => false,
    }
}

fn task_list_200(h: &mut Harness) {
    h.run(TestCase::new("task_list_200", "get /task", fragment(json!([]))));
}

fn task_details_404(h: &mut Harness) {
    let command = format!("get /task/{}-0000-1111-aaaa-12345678", h.user_task_prefix());
    let exp = fragment(json!({"detail": "Task does not exist"}));

    h.run(TestCase::new("task_details_404", command, exp)
        .status(404)
        .exit_code(1));
}

fn task_details_foreign_403(h: &mut Harness) {
    let command = format!("get /task/{}-6f75849b-c9ca-42b1-968e", h.admin_task_prefix());
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(TestCase::new("task_details_foreign_403", command, exp)
        .status(403)
        .exit_code(1));
}

fn task_done_201(h: &mut Harness) {
    let command = format!(
        "get /task/{}-0000-1111-aaaa-12345678/done",
        h.user_task_prefix()
    );

    h.run(TestCase::new("task_done_201", command, fragment(json!({"done": false}))).status(201));
}

fn task_done_foreign_403(h: &mut Harness) {
    let command = format!(
        "get /task/{}-6f75849b-c9ca-42b1-968e/done",
        h.admin_task_prefix()
    );
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(TestCase::new("task_done_foreign_403", command, exp)
        .status(403)
        .exit_code(1));
}

fn task_status_201(h: &mut Harness) {
    let command = format!(
        "get /task/{}-0000-1111-aaaa-12345678/status",
        h.user_task_prefix()
    );
    let exp = fragment(json!({"status": "PENDING", "result": null}));

    h.run(TestCase::new("task_status_201", command, exp).status(201));
}

fn task_status_foreign_403(h: &mut Harness) {
    let command = format!(
        "get /task/{}-6f75849b-c9ca-42b1-968e/status",
        h.admin_task_prefix()
    );
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(TestCase::new("task_status_foreign_403", command, exp)
        .status(403)
        .exit_code(1));
}

fn task_cancel_406(h: &mut Harness) {
    let command = format!(
        "set /task/{}-6f75849b-c9ca-42b1-968e/cancel",
        h.user_task_prefix()
    );
    let exp = fragment(json!({"detail": "Task cannot be canceled"}));

    h.run(TestCase::new("task_cancel_406", command, exp)
        .status(406)
        .exit_code(1));
}

fn task_cancel_foreign_403(h: &mut Harness) {
    let command = format!(
        "set /task/{}-6f75849b-c9ca-42b1-968e/cancel",
        h.admin_task_prefix()
    );
    let exp = fragment(json!({"detail": "Permission denied"}));

    h.run(TestCase::new("task_cancel_foreign_403", command, exp)
        .status(403)
        .exit_code(1));
}

fn task_log_200(h: &mut Harness) {
    h.run(TestCase::new("task_log_200", "get /task/log", fragment(json!([]))));
}

fn task_list_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(TestCase::new("task_list_logout_403", "get /task", exp)
        .status(403)
        .exit_code(1));
}

fn task_status_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(
        TestCase::new(
            "task_status_logout_403",
            "get /task/6-0000-1111-aaaa-12345678/status",
            exp,
        )
        .status(403)
        .exit_code(1),
    );
}

fn task_done_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(
        TestCase::new(
            "task_done_logout_403",
            "get /task/6-0000-1111-aaaa-12345678/done",
            exp,
        )
        .status(403)
        .exit_code(1),
    );
}

fn task_log_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(TestCase::new("task_log_logout_403", "get /task/log", exp)
        .status(403)
        .exit_code(1));
}

fn task_log_page_logout_403(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Authentication credentials were not provided."}));

    h.run(TestCase::new("task_log_page_logout_403", "get /task/log -page 1", exp)
        .status(403)
        .exit_code(1));
}
