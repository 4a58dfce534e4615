use gorest_core::{Check, PostPayload};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::{created_id, expect_array, expect_object, expect_status};
use crate::GorestClient;
use crate::error::ClientError;

impl GorestClient {
    /// `POST /users/{id}/posts`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn create_user_post(
        &self,
        user_id: u64,
        payload: &PostPayload,
        chk: &mut Check,
    ) -> Result<(Option<u64>, Value), ClientError> {
        info!(operation = "create_user_post", user_id, payload = ?payload, "creating post");
        let resp = self.send(
            Method::POST,
            "POST /users/{id}/posts",
            &format!("/users/{user_id}/posts"),
            Some(payload),
        )?;
        expect_status(
            chk,
            resp.status,
            201,
            "Expected status code 201 for successful post creation",
        );
        expect_object(chk, &resp.body, "Failed to create user post");
        let post_id = created_id(chk, &resp.body, "Post");
        Ok((post_id, resp.body))
    }

    /// `GET /users/{id}/posts`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn get_user_posts(&self, user_id: u64, chk: &mut Check) -> Result<Value, ClientError> {
        info!(operation = "get_user_posts", user_id, "retrieving posts");
        let resp = self.send::<()>(
            Method::GET,
            "GET /users/{id}/posts",
            &format!("/users/{user_id}/posts"),
            None,
        )?;
        expect_status(
            chk,
            resp.status,
            200,
            "Expected status code 200 for successful retrieval of user posts",
        );
        expect_array(chk, &resp.body, "Failed to retrieve user posts");
        Ok(resp.body)
    }
}
