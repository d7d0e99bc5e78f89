//! Login, logout and user management fixtures. The login/logout helpers are
//! shared by every other suite.

use crate::expect::fragment;
use crate::harness::Harness;
use crate::suites::{create_test_user, delete_test_user, require_ping};
use crate::test_case::TestCase;
use serde_json::json;

pub fn run(h: &mut Harness) {
    require_ping(h);
    logout_without_session(h);
    create_test_user(h, false);
    login_user_ok(h);
    logout_ok(h);
    logout_without_session(h);
    login_missing_both(h);
    login_missing_username(h);
    login_missing_password(h);
    login_bad_credentials(h);
    delete_test_user(h);
}

pub fn login_user_ok(h: &mut Harness) {
    let credentials = h.user_credentials();
    let command = format!(
        "login -username {} -password {}",
        credentials.username, credentials.password
    );

    h.run(TestCase::new(
        "login_user_ok",
        command,
        fragment(json!({"detail": "Welcome to Danube Cloud API."})),
    ));
}

pub fn login_admin_ok(h: &mut Harness) {
    let credentials = h.admin_credentials();
    let command = format!(
        "login -username {} -password {}",
        credentials.username, credentials.password
    );

    h.run(TestCase::new(
        "login_admin_ok",
        command,
        fragment(json!({"detail": "Welcome to Danube Cloud API."})),
    ));
}

pub fn user_create_201(h: &mut Harness) {
    let credentials = h.user_credentials();
    let command = format!(
        "create /accounts/user/{} -password {} -first_name Tester -last_name Tester \
         -email tester1@erigones.com -api_access true",
        credentials.username, credentials.password
    );
    let exp = fragment(json!({
        "status": "SUCCESS",
        "result": {
            "username": credentials.username,
            "first_name": "Tester",
            "last_name": "Tester",
            "api_access": true,
            "is_active": true,
            "is_super_admin": false,
            "callback_key": "***",
            "groups": [],
            "api_key": "***",
            "email": "tester1@erigones.com",
        },
    }));

    h.run(TestCase::new("user_create_201", command, exp).status(201));
}

pub fn user_delete_200(h: &mut Harness) {
    let command = format!("delete /accounts/user/{}", h.user_credentials().username);

    h.run(TestCase::new(
        "user_delete_200",
        command,
        fragment(json!({"status": "SUCCESS", "result": null})),
    ));
}

fn login_missing_both(h: &mut Harness) {
    let exp = fragment(json!({"detail": {
        "username": ["This field is required."],
        "password": ["This field is required."],
    }}));

    h.run(TestCase::new("login_missing_both", "login", exp)
        .status(400)
        .exit_code(4));
}

fn login_missing_username(h: &mut Harness) {
    let exp = fragment(json!({"detail": {"username": ["This field is required."]}}));

    h.run(TestCase::new("login_missing_username", "login -password test", exp)
        .status(400)
        .exit_code(4));
}

fn login_missing_password(h: &mut Harness) {
    let exp = fragment(json!({"detail": {"password": ["This field is required."]}}));

    h.run(TestCase::new("login_missing_password", "login -username test", exp)
        .status(400)
        .exit_code(4));
}

fn login_bad_credentials(h: &mut Harness) {
    let exp = fragment(json!({"detail": "Unable to log in with provided credentials."}));

    h.run(
        TestCase::new("login_bad_credentials", "login -username test -password test", exp)
            .status(400)
            .exit_code(4),
    );
}

pub fn logout_ok(h: &mut Harness) {
    h.run(TestCase::new(
        "logout_ok",
        "logout",
        fragment(json!({"detail": "Bye."})),
    ));
}

pub fn logout_without_session(h: &mut Harness) {
    h.remove_session();

    h.run(
        TestCase::new(
            "logout_without_session",
            "logout",
            fragment(json!({"detail": "Authentication credentials were not provided."})),
        )
        .status(403)
        .exit_code(1),
    );
}

/// User deletion while the user still owns servers; exercised at the end of
/// the vm suite.
pub fn user_delete_with_relations_400(h: &mut Harness) {
    let command = format!("delete /accounts/user/{}", h.user_credentials().username);
    let exp = fragment(json!({
        "status": "FAILURE",
        "result": {
            "detail": "Cannot delete user, because he has relations to some objects.",
            "relations": {"VM": ["test99.example.com"]},
        },
    }));

    h.run(TestCase::new("user_delete_with_relations_400", command, exp)
        .status(400)
        .exit_code(1));
}
