//! Smoke-test driver for the `es` API client: runs fixture suites against a
//! live API through the client binary, structurally matching the JSON it
//! prints, and can generate new fixtures from recorded client output.

pub mod cli;
pub mod client;
pub mod config;
pub mod expect;
pub mod gencase;
pub mod harness;
pub mod report;
pub mod suites;
pub mod task_id;
pub mod test_case;
