//! Setup/teardown for the user → post → comment chain
//!
//! A [`UserFixture`] owns the remote user it created and deletes it on
//! [`UserFixture::teardown`], or from `Drop` if the test bailed out first.
//! Posts borrow their user, so a post can never outlive the account it
//! belongs to.

use gorest_core::{Check, CommentPayload, PostPayload, UserPayload, check};
use serde_json::Value;
use tracing::{info, warn};

use crate::GorestClient;
use crate::error::{ClientError, FixtureError};

/// A created user, deleted when torn down or dropped.
pub struct UserFixture<'c> {
    client: &'c GorestClient,
    id: u64,
    body: Value,
    torn_down: bool,
}

impl<'c> UserFixture<'c> {
    /// Create a user from `template`.
    ///
    /// # Errors
    ///
    /// Hard stop with [`FixtureError::MissingId`] when the response is not an
    /// object or carries no id; there is nothing to delete in that case.
    pub fn create(
        client: &'c GorestClient,
        template: &UserPayload,
        chk: &mut Check,
    ) -> Result<Self, FixtureError> {
        let (id, body) = client.create_user(template, chk)?;
        let id = match id {
            Some(id) if body.is_object() => id,
            _ => {
                return Err(FixtureError::MissingId {
                    resource: "user",
                    body: body.to_string(),
                });
            }
        };
        info!(user_id = id, "user fixture ready");
        Ok(Self {
            client,
            id,
            body,
            torn_down: false,
        })
    }

    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Body returned by the create call.
    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Email the server stored for this user.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.body.get("email").and_then(Value::as_str)
    }

    /// Create a post owned by this user.
    ///
    /// # Errors
    ///
    /// Hard stop when the response lacks `title` or an id.
    pub fn create_post(
        &self,
        payload: &PostPayload,
        chk: &mut Check,
    ) -> Result<PostFixture<'_>, FixtureError> {
        let (id, body) = self.client.create_user_post(self.id, payload, chk)?;
        if body.get("title").is_none() {
            return Err(FixtureError::MissingField {
                resource: "post",
                field: "title",
                body: body.to_string(),
            });
        }
        let Some(id) = id else {
            return Err(FixtureError::MissingId {
                resource: "post",
                body: body.to_string(),
            });
        };

        let title = body.get("title").and_then(Value::as_str);
        let body_text = body.get("body").and_then(Value::as_str);
        check!(
            chk,
            title == Some(payload.title.as_str()),
            "Post title should match the submitted title",
            payload.title,
            title
        );
        check!(
            chk,
            body_text == Some(payload.body.as_str()),
            "Post body should match the submitted body",
            payload.body,
            body_text
        );

        info!(user_id = self.id, post_id = id, "post fixture ready");
        Ok(PostFixture {
            client: self.client,
            user_id: self.id,
            id,
            body,
        })
    }

    /// Delete the user.
    ///
    /// Failures already on `chk` are kept as they are; a failed delete adds
    /// one combined deletion failure after them.
    pub fn teardown(mut self, chk: &mut Check) {
        self.torn_down = true;
        let mut deletion = Check::new();
        self.client.cleanup_user(Some(self.id), &mut deletion);
        chk.absorb(deletion);
    }

    /// Delete the user without draining `chk`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure; the user is then left for the
    /// drop guard to retry.
    pub fn delete(mut self, chk: &mut Check) -> Result<&'static str, ClientError> {
        let confirmation = self.client.delete_user(self.id, chk)?;
        self.torn_down = true;
        Ok(confirmation)
    }
}

impl Drop for UserFixture<'_> {
    fn drop(&mut self) {
        if self.torn_down {
            return;
        }
        warn!(user_id = self.id, "user fixture dropped without teardown, deleting");
        let mut chk = Check::new();
        self.client.cleanup_user(Some(self.id), &mut chk);
        for err in chk.consume_errors() {
            warn!(user_id = self.id, "cleanup failed: {}", err.trim_end());
        }
    }
}

/// A created post, borrowed from its [`UserFixture`].
pub struct PostFixture<'u> {
    client: &'u GorestClient,
    user_id: u64,
    id: u64,
    body: Value,
}

impl PostFixture<'_> {
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub const fn user_id(&self) -> u64 {
        self.user_id
    }

    #[must_use]
    pub const fn body(&self) -> &Value {
        &self.body
    }

    /// Create a comment on this post.
    ///
    /// # Errors
    ///
    /// Hard stop when the response lacks `name` or an id.
    pub fn create_comment(
        &self,
        payload: &CommentPayload,
        chk: &mut Check,
    ) -> Result<CreatedComment, FixtureError> {
        let (id, body) = self.client.create_post_comment(self.id, payload, chk)?;
        if body.get("name").is_none() {
            return Err(FixtureError::MissingField {
                resource: "comment",
                field: "name",
                body: body.to_string(),
            });
        }
        let Some(id) = id else {
            return Err(FixtureError::MissingId {
                resource: "comment",
                body: body.to_string(),
            });
        };

        for (field, expected) in [
            ("name", &payload.name),
            ("email", &payload.email),
            ("body", &payload.body),
        ] {
            let actual = body.get(field).and_then(Value::as_str);
            check!(
                chk,
                actual == Some(expected.as_str()),
                format!("Comment {field} should match the submitted {field}"),
                expected,
                actual
            );
        }

        info!(post_id = self.id, comment_id = id, "comment created");
        Ok(CreatedComment {
            id,
            post_id: self.id,
            body,
        })
    }
}

/// A created comment. Comments are removed by the service when their user is.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedComment {
    pub id: u64,
    pub post_id: u64,
    pub body: Value,
}
