use gorest_core::{Check, UserPayload, check};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, warn};

use super::{created_id, expect_object, expect_status, unique_email};
use crate::GorestClient;
use crate::error::ClientError;

/// Returned by [`GorestClient::delete_user`] regardless of outcome.
pub const DELETE_CONFIRMATION: &str = "User successfully deleted";

impl GorestClient {
    /// `POST /users` with a freshly generated email.
    ///
    /// The caller's payload is left untouched; the email actually sent is
    /// echoed back in the returned body when creation succeeds.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn create_user(
        &self,
        payload: &UserPayload,
        chk: &mut Check,
    ) -> Result<(Option<u64>, Value), ClientError> {
        let email = unique_email();
        let payload = payload.clone().with_email(email.clone());
        info!(operation = "create_user", payload = ?payload, "creating user");

        let resp = self.send(Method::POST, "POST /users", "/users", Some(&payload))?;
        expect_status(
            chk,
            resp.status,
            201,
            "Expected status code 201 for successful user creation",
        );
        expect_object(chk, &resp.body, "Failed to create user");

        let user_id = created_id(chk, &resp.body, "User");
        let response_email = resp.body.get("email").and_then(Value::as_str);
        check!(
            chk,
            response_email == Some(email.as_str()),
            "Email in the response should match the email sent in the request",
            email,
            response_email
        );

        Ok((user_id, resp.body))
    }

    /// `GET /users/{id}`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn get_user(&self, user_id: u64, chk: &mut Check) -> Result<Value, ClientError> {
        info!(operation = "get_user", user_id, "retrieving user");
        let resp = self.send::<()>(
            Method::GET,
            "GET /users/{id}",
            &format!("/users/{user_id}"),
            None,
        )?;
        expect_status(
            chk,
            resp.status,
            200,
            "Expected status code 200 for successful user retrieval",
        );
        expect_object(chk, &resp.body, "Failed to retrieve user");
        Ok(resp.body)
    }

    /// `PUT /users/{id}`; the payload is sent as given.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn update_user(
        &self,
        user_id: u64,
        payload: &UserPayload,
        chk: &mut Check,
    ) -> Result<Value, ClientError> {
        info!(operation = "update_user", user_id, payload = ?payload, "updating user");
        let resp = self.send(
            Method::PUT,
            "PUT /users/{id}",
            &format!("/users/{user_id}"),
            Some(payload),
        )?;
        expect_status(
            chk,
            resp.status,
            200,
            "Expected status code 200 for successful user update",
        );
        expect_object(chk, &resp.body, "Failed to update user");
        Ok(resp.body)
    }

    /// `DELETE /users/{id}`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON error body.
    pub fn delete_user(&self, user_id: u64, chk: &mut Check) -> Result<&'static str, ClientError> {
        info!(operation = "delete_user", user_id, "deleting user");
        let resp = self.send::<()>(
            Method::DELETE,
            "DELETE /users/{id}",
            &format!("/users/{user_id}"),
            None,
        )?;
        expect_status(
            chk,
            resp.status,
            204,
            "Expected status code 204 for successful user deletion",
        );
        if resp.status != 204 {
            chk.check(false, format!("Failed to delete user: {}", resp.body));
        }
        Ok(DELETE_CONFIRMATION)
    }

    /// Delete `user_id` if present, folding everything pending on `chk` into
    /// one combined failure.
    ///
    /// Never fails: transport errors are recorded on `chk`.
    pub fn cleanup_user(&self, user_id: Option<u64>, chk: &mut Check) {
        let Some(user_id) = user_id else {
            return;
        };

        if let Err(e) = self.delete_user(user_id, chk) {
            warn!(user_id, error = %e, "delete request failed");
            chk.check(false, format!("Failed to delete user: {e}"));
        }

        let errors = chk.consume_errors();
        if errors.is_empty() {
            info!(user_id, "User deleted successfully");
        } else {
            let folded = errors
                .iter()
                .map(|e| e.trim_end())
                .collect::<Vec<_>>()
                .join(", ");
            chk.check(false, format!("Errors occurred during deletion: [{folded}]"));
        }
    }
}
