//! Deferred checks for end-to-end tests
//!
//! A [`Check`] records failed conditions instead of panicking on the first one,
//! so a single test can report every mismatch it found. Failures carry an
//! explicit [`Context`] of the values that were in scope at the check site.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Ordered name → rendered-value pairs captured at a check site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context(Vec<(String, String)>);

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, keeping call order.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub passed: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Context::is_empty")]
    pub context: Context,
}

impl CheckResult {
    /// Render as `"{message} \n\t {key}={value}\n... \n"`.
    #[must_use]
    pub fn render(&self) -> String {
        let locals = self
            .context
            .iter()
            .map(|(k, v)| format!("\t {k}={v}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{} \n{locals} \n", self.message)
    }
}

/// Collects failed checks until they are drained.
#[derive(Debug, Default)]
pub struct Check {
    errors: Vec<CheckResult>,
    passed: usize,
    failed: usize,
}

impl Check {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a check without context.
    pub fn check(&mut self, success: bool, message: impl Into<String>) {
        self.check_with(success, message, Context::new());
    }

    /// Record a check. Passes are only logged; failures are stored with `context`.
    pub fn check_with(&mut self, success: bool, message: impl Into<String>, context: Context) {
        let message = message.into();
        if success {
            self.passed += 1;
            info!("[PASS] {message}");
            return;
        }

        self.failed += 1;
        warn!("[FAIL] {message}");
        self.errors.push(CheckResult {
            passed: false,
            message,
            context,
        });
    }

    /// Return every stored error in recording order and clear the store.
    pub fn consume_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.errors)
            .iter()
            .map(CheckResult::render)
            .collect()
    }

    /// Drain the store and fail if anything was recorded since the last drain.
    ///
    /// # Errors
    ///
    /// Returns [`CheckFailures`] holding every drained error.
    pub fn ensure_clean(&mut self, stage: &str) -> Result<(), CheckFailures> {
        let errors = self.consume_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(CheckFailures {
                stage: stage.to_string(),
                errors,
            })
        }
    }

    /// Move `other`'s undrained failures and counters onto the end of this check.
    pub fn absorb(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.passed += other.passed;
        self.failed += other.failed;
    }

    /// Failed results not yet drained.
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.errors
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub const fn passed_count(&self) -> usize {
        self.passed
    }

    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.failed
    }
}

/// Errors drained from a [`Check`] at a named stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailures {
    pub stage: String,
    pub errors: Vec<String>,
}

impl fmt::Display for CheckFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} check(s) failed during {}:", self.errors.len(), self.stage)?;
        for err in &self.errors {
            writeln!(f, "  - {}", err.trim_end())?;
        }
        Ok(())
    }
}

impl std::error::Error for CheckFailures {}

/// Record a check, capturing the named bindings as context.
///
/// ```
/// use gorest_core::{check, Check};
///
/// let mut chk = Check::new();
/// let expected = 201;
/// let actual = 422;
/// check!(chk, actual == expected, "Expected status code 201", expected, actual);
/// assert_eq!(chk.pending(), 1);
/// ```
#[macro_export]
macro_rules! check {
    ($chk:expr, $cond:expr, $msg:expr $(,)?) => {
        $chk.check($cond, $msg)
    };
    ($chk:expr, $cond:expr, $msg:expr, $($binding:expr),+ $(,)?) => {{
        let mut context = $crate::check::Context::new();
        $(context.push(stringify!($binding), format!("{:?}", $binding));)+
        $chk.check_with($cond, $msg, context)
    }};
}
