//! Logging setup for binaries and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialize the global logger.
///
/// `RUST_LOG` overrides the default filter. The default is `info`, or
/// `debug` when `verbose` is set. Calling this more than once is harmless.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    if builder.try_init().is_err() {
        log::trace!("logger already initialized");
    }
}

/// Logger for tests: captured by the test harness, never fails.
pub fn init_for_tests() {
    let _ = Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}
