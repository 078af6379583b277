//! Logging initialization.

/// Uses env_logger with default filter level of `info`.
/// Override with RUST_LOG, e.g. `RUST_LOG=voxel=debug,world=debug`.
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
