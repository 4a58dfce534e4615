//! gorest-client: Blocking GoREST client, fixtures and end-to-end scenarios
//!
//! ```no_run
//! use gorest_client::{GorestClient, Scenario, run_suite};
//! use gorest_core::{Config, SeedData};
//!
//! let config = Config::load_default()?.with_env();
//! let client = GorestClient::new(&config)?;
//! let report = run_suite(&client, &SeedData::default(), &Scenario::ALL);
//! println!("{}", report.to_terminal());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod client;
pub mod error;
pub mod fixtures;
mod resources;
pub mod scenarios;
pub mod telemetry;

pub use client::GorestClient;
pub use error::{ClientError, FixtureError, ScenarioError};
pub use fixtures::{CreatedComment, PostFixture, UserFixture};
pub use resources::{DELETE_CONFIRMATION, unique_email};
pub use scenarios::{Scenario, UnknownScenario, run_scenario, run_suite};
