use env_logger::{Builder, Target};
use log::LevelFilter;

/// Send logs to stderr so stdout carries only the mount plan.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init(level: LevelFilter) {
    let _ = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .try_init();
}
