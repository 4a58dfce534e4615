use gorest_core::Check;
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::{expect_array, expect_status};
use crate::GorestClient;
use crate::error::ClientError;

impl GorestClient {
    /// `GET /users/{id}/todos`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn get_user_todos(&self, user_id: u64, chk: &mut Check) -> Result<Value, ClientError> {
        info!(operation = "get_user_todos", user_id, "retrieving todos");
        let resp = self.send::<()>(
            Method::GET,
            "GET /users/{id}/todos",
            &format!("/users/{user_id}/todos"),
            None,
        )?;
        expect_status(
            chk,
            resp.status,
            200,
            "Expected status code 200 for successful retrieval of user todos",
        );
        expect_array(chk, &resp.body, "Failed to retrieve user todos");
        Ok(resp.body)
    }
}
