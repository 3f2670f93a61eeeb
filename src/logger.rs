//! Logger setup for the `fxenv` binary and for test harnesses.

use log::LevelFilter;

/// Installs the global logger.
///
/// `RUST_LOG` still applies on top of the level chosen by the flags.
pub fn init(verbose: u8, quiet: bool) {
    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    log::debug!("Logger initialized with level: {:?}", level);
}

/// Routes log output through the test harness. Safe to call repeatedly.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .format_timestamp(None)
        .try_init();
}
