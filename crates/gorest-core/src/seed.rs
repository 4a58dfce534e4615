//! Seed users loaded from a local data file
//!
//! ```json
//! { "users": [ { "name": "Test User", "gender": "male", "status": "active" } ] }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::payload::UserPayload;

/// Default location of the seed file, relative to the working directory.
pub const DEFAULT_SEED_PATH: &str = "json_repo/users.json";

/// Creation templates for test users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub users: Vec<UserPayload>,
}

impl SeedData {
    /// Load seed data from JSON or YAML.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unparsable, or has no users.
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        info!(path = %path.display(), "loading seed data");
        let content = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Io(path.to_path_buf(), e.to_string()))?;
        let data = parse_seed(path, &content)?;
        if data.users.is_empty() {
            return Err(SeedError::Empty(path.to_path_buf()));
        }
        info!(users = data.users.len(), "seed data loaded");
        Ok(data)
    }

    /// First seed user, the template every scenario starts from.
    #[must_use]
    pub fn first_user(&self) -> Option<&UserPayload> {
        self.users.first()
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            users: vec![UserPayload::new("Test User", "male", "active")],
        }
    }
}

/// Detection: extension first (`.yaml`/`.yml`/`.json`), otherwise a leading `{`
/// means JSON and anything else is read as YAML.
fn parse_seed(path: &Path, content: &str) -> Result<SeedData, SeedError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "yaml" | "yml" => {
            serde_yml::from_str(content).map_err(|e| SeedError::Parse(format!("Invalid YAML: {e}")))
        }
        "json" => serde_json::from_str(content)
            .map_err(|e| SeedError::Parse(format!("Invalid JSON: {e}"))),
        _ => {
            if content.trim_start().starts_with('{') {
                serde_json::from_str(content)
                    .map_err(|e| SeedError::Parse(format!("Invalid JSON: {e}")))
            } else {
                serde_yml::from_str(content)
                    .map_err(|e| SeedError::Parse(format!("Invalid YAML: {e}")))
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Cannot read seed data {0}: {1}")]
    Io(PathBuf, String),
    #[error("Seed data parse error: {0}")]
    Parse(String),
    #[error("Seed data {0} contains no users")]
    Empty(PathBuf),
}
