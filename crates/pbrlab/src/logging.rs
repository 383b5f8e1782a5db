//! Logger setup for the demo binaries.
//!
//! Everything in the crate logs through the `log` facade. [`init`] installs
//! `env_logger` with `info` as the default level; `RUST_LOG` overrides it
//! (e.g. `RUST_LOG=pbrlab=debug,wgpu_core=warn`).

use log::LevelFilter;

/// Install the logger. Calling it again is harmless.
pub fn init() {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        // GPU backends are chatty at info.
        .filter_module("wgpu_core", LevelFilter::Warn)
        .filter_module("wgpu_hal", LevelFilter::Warn)
        .filter_module("naga", LevelFilter::Warn)
        .parse_default_env()
        .format_timestamp_millis();

    if builder.try_init().is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_twice_does_not_panic() {
        super::init();
        super::init();
        log::info!("logger ready");
    }
}
