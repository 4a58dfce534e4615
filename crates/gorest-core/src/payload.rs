//! Request bodies sent to the GoREST API

use serde::{Deserialize, Serialize};

/// Body for `POST /users` and `PUT /users/{id}`.
///
/// The email of a creation payload is always replaced by a generated unique
/// address before it is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub gender: String,
    pub status: String,
}

impl UserPayload {
    #[must_use]
    pub fn new(name: impl Into<String>, gender: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: String::new(),
            gender: gender.into(),
            status: status.into(),
        }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Body for `POST /users/{id}/posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    pub body: String,
}

impl PostPayload {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// The post used throughout the suite.
    #[must_use]
    pub fn sample() -> Self {
        Self::new("Sample Post Title", "This is a sample post body.")
    }
}

/// Body for `POST /posts/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPayload {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl CommentPayload {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_payload_serializes_all_fields() {
        let user = UserPayload::new("Test User", "male", "active").with_email("a@example.com");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Test User",
                "email": "a@example.com",
                "gender": "male",
                "status": "active"
            })
        );
    }

    #[test]
    fn user_payload_email_optional_in_input() {
        let user: UserPayload =
            serde_json::from_str(r#"{"name": "N", "gender": "female", "status": "inactive"}"#)
                .unwrap();
        assert!(user.email.is_empty());
        assert_eq!(user.gender, "female");
    }

    #[test]
    fn sample_post() {
        let post = PostPayload::sample();
        assert_eq!(post.title, "Sample Post Title");
        assert_eq!(post.body, "This is a sample post body.");
    }
}
