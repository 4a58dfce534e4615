//! Scenario outcomes and the suite report
//!
//! The exit code is derived from the report alone, so the CLI never decides
//! pass/fail on its own.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Final status of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// Every check passed
    Pass,
    /// One or more checks failed
    Fail,
    /// Hard stop or transport error before the checks could be drained
    Error,
}

impl OutcomeStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScenarioOutcome {
    /// Scenario name, e.g. "create-user"
    pub name: String,
    pub status: OutcomeStatus,
    /// Drained check errors, or the hard-stop message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub elapsed_secs: f64,
}

impl ScenarioOutcome {
    #[must_use]
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: OutcomeStatus::Pass,
            errors: Vec::new(),
            elapsed_secs: 0.0,
        }
    }

    #[must_use]
    pub fn fail(name: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            status: OutcomeStatus::Fail,
            errors,
            elapsed_secs: 0.0,
        }
    }

    #[must_use]
    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: OutcomeStatus::Error,
            errors: vec![message.into()],
            elapsed_secs: 0.0,
        }
    }

    #[must_use]
    pub fn with_elapsed(mut self, secs: f64) -> Self {
        self.elapsed_secs = secs;
        self
    }
}

/// Aggregated result of a suite run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SuiteReport {
    pub scenarios: Vec<ScenarioOutcome>,
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub errored: u64,
}

impl SuiteReport {
    #[must_use]
    pub fn from_outcomes(scenarios: Vec<ScenarioOutcome>) -> Self {
        let count = |status: OutcomeStatus| {
            scenarios.iter().filter(|s| s.status == status).count() as u64
        };
        let passed = count(OutcomeStatus::Pass);
        let failed = count(OutcomeStatus::Fail);
        let errored = count(OutcomeStatus::Error);
        Self {
            total: scenarios.len() as u64,
            scenarios,
            passed,
            failed,
            errored,
        }
    }

    /// PASS requires at least one scenario and no fail/error.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }

    /// 0 = all passed, 1 = any failed or errored scenario, 3 = nothing ran.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 {
            3
        } else if self.is_success() {
            0
        } else {
            1
        }
    }

    /// Human-readable terminal report.
    #[must_use]
    pub fn to_terminal(&self) -> String {
        let mut lines = Vec::new();
        for outcome in &self.scenarios {
            lines.push(format!(
                "{:<5} {} ({:.2}s)",
                outcome.status.as_str(),
                outcome.name,
                outcome.elapsed_secs
            ));
            for err in &outcome.errors {
                let mut err_lines = err.trim_end().lines();
                if let Some(first) = err_lines.next() {
                    lines.push(format!("      - {}", first.trim_end()));
                }
                for rest in err_lines {
                    lines.push(format!("        {}", rest.trim()));
                }
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "{} scenarios: {} passed, {} failed, {} errored",
            self.total, self.passed, self.failed, self.errored
        ));
        lines.join("\n")
    }
}

/// Generate JSON Schema for the `--output json` report.
#[must_use]
pub fn generate_schema() -> String {
    let schema = schemars::schema_for!(SuiteReport);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
