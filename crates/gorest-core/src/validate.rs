//! Pre-flight validation of the suite configuration
//!
//! Nothing here sends requests; it only inspects the config and the local
//! filesystem so `doctor` can explain why a run would fail.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Config;

/// A validation check result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Validation {
    pub check: String,
    pub status: ValidationStatus,
    pub message: String,
}

/// Status of a validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Patterns that suggest a placeholder value rather than a real credential.
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-token",
    "your_token",
    "YOUR_TOKEN",
    "TODO",
    "CHANGEME",
    "changeme",
    "placeholder",
    "xxx",
    "XXX",
    "replace-me",
    "REPLACE_ME",
    "insert-",
    "INSERT_",
];

/// Validate config and produce validation results.
#[must_use]
pub fn validate_config(config: &Config) -> Vec<Validation> {
    let mut checks = Vec::new();

    // Base URL
    if config.base_url.starts_with("https://") {
        checks.push(Validation {
            check: "base_url".into(),
            status: ValidationStatus::Ok,
            message: format!("base_url: {}", config.base_url),
        });
    } else if config.base_url.starts_with("http://") {
        checks.push(Validation {
            check: "base_url".into(),
            status: ValidationStatus::Warning,
            message: format!("base_url: {} (plain http, token sent unencrypted)", config.base_url),
        });
    } else {
        checks.push(Validation {
            check: "base_url".into(),
            status: ValidationStatus::Error,
            message: format!(
                "base_url: {} (missing http:// or https:// prefix)",
                config.base_url
            ),
        });
    }

    // Token
    match config.bearer_token() {
        Ok(token) => {
            let placeholder = (token.contains('<') && token.contains('>'))
                || PLACEHOLDER_PATTERNS.iter().any(|p| token.contains(p));
            if placeholder {
                checks.push(Validation {
                    check: "token".into(),
                    status: ValidationStatus::Warning,
                    message: "token: looks like a placeholder".into(),
                });
            } else {
                checks.push(Validation {
                    check: "token".into(),
                    status: ValidationStatus::Ok,
                    message: format!("token: configured ({} chars)", token.len()),
                });
            }
        }
        Err(e) => checks.push(Validation {
            check: "token".into(),
            status: ValidationStatus::Error,
            message: format!("token: {e}"),
        }),
    }

    // Seed data
    if config.seed_data.exists() {
        checks.push(Validation {
            check: "seed_data".into(),
            status: ValidationStatus::Ok,
            message: format!("seed_data: {} (exists)", config.seed_data.display()),
        });
    } else {
        checks.push(Validation {
            check: "seed_data".into(),
            status: ValidationStatus::Warning,
            message: format!(
                "seed_data: {} (not found, built-in seed user will be used)",
                config.seed_data.display()
            ),
        });
    }

    if let Some(secs) = config.timeout_secs {
        checks.push(Validation {
            check: "timeout".into(),
            status: if secs == 0 {
                ValidationStatus::Warning
            } else {
                ValidationStatus::Ok
            },
            message: format!("timeout: {secs}s"),
        });
    }

    checks
}

/// Returns true if any validation has Error status.
#[must_use]
pub fn has_errors(validations: &[Validation]) -> bool {
    validations
        .iter()
        .any(|v| v.status == ValidationStatus::Error)
}

/// Format validations for the terminal, one `[STATUS] message` line each.
#[must_use]
pub fn to_terminal(validations: &[Validation]) -> String {
    validations
        .iter()
        .map(|v| format!("[{}] {}", v.status, v.message))
        .collect::<Vec<_>>()
        .join("\n")
}
