//! Logging bootstrap for hosts embedding the engine.

/// Install a global `tracing` subscriber with a default filter.
///
/// Hosts that already install their own subscriber should skip this.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter("debug,gantry=trace")
        .init();
}
