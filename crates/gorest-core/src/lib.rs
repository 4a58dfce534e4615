//! gorest-core: Soft checks, payloads, and reporting for the GoREST end-to-end suite
//!
//! This crate has no network code. It provides the deferred-check aggregator,
//! the request payload types, configuration and seed data loading, and the
//! suite report that the CLI turns into an exit code.

pub mod check;
pub mod config;
pub mod dump;
pub mod payload;
pub mod report;
pub mod seed;
pub mod validate;

pub use check::{Check, CheckFailures, CheckResult, Context};
pub use config::{Config, ConfigError};
pub use dump::{DumpError, DumpIndex, Exchange};
pub use payload::{CommentPayload, PostPayload, UserPayload};
pub use report::{OutcomeStatus, ScenarioOutcome, SuiteReport};
pub use seed::{SeedData, SeedError};
pub use validate::{Validation, ValidationStatus};
