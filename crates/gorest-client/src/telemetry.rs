use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with an env-based filter and bridge `log` records.
///
/// - Reads `RUST_LOG` for level directives (e.g., "info", "debug,reqwest=trace").
/// - Forwards `log` crate records (reqwest, hyper) to `tracing` via `LogTracer`.
/// - Writes a compact format to stderr so stdout stays free for reports.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    init_with_default("info");
}

/// Same as [`init`], with `default_directive` used when `RUST_LOG` is unset.
pub fn init_with_default(default_directive: &str) {
    let _ = LogTracer::init();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Initialize tracing for tests; output is captured by the test harness.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_test_writer().compact())
        .try_init();
}
