use tracing_subscriber::EnvFilter;

/// Routes library logs to the test output; `RUST_LOG=yaml_bound=trace` shows binding steps.
pub fn initialize_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
