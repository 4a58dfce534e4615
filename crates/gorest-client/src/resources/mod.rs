//! One method per remote operation
//!
//! Every method sends exactly one request, records status and shape checks on
//! the caller's [`Check`], and returns the decoded body. Only transport and
//! decoding failures are returned as errors.

mod comments;
mod posts;
mod todos;
mod users;

pub use users::DELETE_CONFIRMATION;

use gorest_core::{Check, check};
use serde_json::Value;
use uuid::Uuid;

/// `"{uuid-v4}@example.com"`, unique per call.
#[must_use]
pub fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

fn expect_status(chk: &mut Check, status: u16, expected: u16, message: &str) {
    check!(chk, status == expected, message, expected, status);
}

/// GoREST answers validation errors with an array of `{field, message}`.
fn expect_object(chk: &mut Check, body: &Value, failure: &str) {
    if body.is_array() {
        chk.check(false, format!("{failure}: {body}"));
    } else if !body.is_object() {
        chk.check(false, format!("Unexpected response format: {body}"));
    }
}

fn expect_array(chk: &mut Check, body: &Value, failure: &str) {
    if !body.is_array() {
        chk.check(false, format!("{failure}: {body}"));
    }
}

/// The non-null integer `id` of a created resource.
fn created_id(chk: &mut Check, body: &Value, resource: &str) -> Option<u64> {
    let id = body.get("id").and_then(Value::as_u64);
    check!(chk, id.is_some(), format!("{resource} ID should not be None"), id);
    id
}
