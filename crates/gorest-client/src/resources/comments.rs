use gorest_core::{Check, CommentPayload};
use reqwest::Method;
use serde_json::Value;
use tracing::info;

use super::{created_id, expect_array, expect_object, expect_status};
use crate::GorestClient;
use crate::error::ClientError;

impl GorestClient {
    /// `POST /posts/{id}/comments`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn create_post_comment(
        &self,
        post_id: u64,
        payload: &CommentPayload,
        chk: &mut Check,
    ) -> Result<(Option<u64>, Value), ClientError> {
        info!(operation = "create_post_comment", post_id, payload = ?payload, "creating comment");
        let resp = self.send(
            Method::POST,
            "POST /posts/{id}/comments",
            &format!("/posts/{post_id}/comments"),
            Some(payload),
        )?;
        expect_status(
            chk,
            resp.status,
            201,
            "Expected status code 201 for successful comment creation",
        );
        expect_object(chk, &resp.body, "Failed to create post comment");
        let comment_id = created_id(chk, &resp.body, "Comment");
        Ok((comment_id, resp.body))
    }

    /// `GET /posts/{id}/comments`
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-JSON body.
    pub fn get_post_comments(&self, post_id: u64, chk: &mut Check) -> Result<Value, ClientError> {
        info!(operation = "get_post_comments", post_id, "retrieving comments");
        let resp = self.send::<()>(
            Method::GET,
            "GET /posts/{id}/comments",
            &format!("/posts/{post_id}/comments"),
            None,
        )?;
        expect_status(
            chk,
            resp.status,
            200,
            "Expected status code 200 for successful retrieval of post comments",
        );
        expect_array(chk, &resp.body, "Failed to retrieve post comments");
        Ok(resp.body)
    }
}
