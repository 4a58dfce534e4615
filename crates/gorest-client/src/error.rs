//! Error types for the client, fixtures and scenarios

use gorest_core::{CheckFailures, ConfigError};

/// Transport and decoding failures. Validation mismatches never end up here;
/// they are recorded on a [`gorest_core::Check`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Cannot decode response: {0}")]
    Decode(String),
    #[error("Invalid header {0}: {1}")]
    InvalidHeader(String, String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Hard stops raised while composing the user → post → comment chain.
#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("{resource} creation returned no id: {body}")]
    MissingId { resource: &'static str, body: String },
    #[error("{resource} response has no '{field}': {body}")]
    MissingField {
        resource: &'static str,
        field: &'static str,
        body: String,
    },
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Why a scenario did not pass.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Checks(#[from] CheckFailures),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error(transparent)]
    Client(#[from] ClientError),
}
