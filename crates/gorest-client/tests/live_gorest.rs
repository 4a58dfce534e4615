//! Runs the suite against the real service.
//!
//! Needs `GOREST_BEARER_TOKEN`. Run with:
//! `cargo test -p gorest-client --test live_gorest -- --ignored`

use gorest_client::{GorestClient, Scenario, run_suite};
use gorest_core::{Config, SeedData};

#[test]
#[ignore = "hits gorest.co.in and needs GOREST_BEARER_TOKEN"]
fn live_suite_passes() {
    gorest_client::telemetry::init_for_tests();
    let config = Config::default().with_env();
    let client = GorestClient::new(&config).expect("GOREST_BEARER_TOKEN must be set");

    let report = run_suite(&client, &SeedData::default(), &Scenario::ALL);

    assert!(report.is_success(), "{}", report.to_terminal());
}
