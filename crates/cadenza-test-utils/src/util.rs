//! Utility functions shared by test suites.

/// Install a test-friendly tracing subscriber.
///
/// Output goes through the libtest capture writer. Safe to call from every test;
/// only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
