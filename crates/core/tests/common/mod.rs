//! Shared setup for the integration tests

use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber once per test binary; `RUST_LOG` controls it
#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
