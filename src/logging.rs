//! Logging setup.
//!
//! `RUST_LOG` wins over the default filter, e.g. `RUST_LOG=npc_shell=debug`.

use env_logger::Env;

/// Installs the global logger. Safe to call more than once; later calls are ignored.
pub fn init(default_filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .format_target(true)
        .try_init();
}
