use log::LevelFilter;

/// Initialize the logger; `RUST_LOG` directives refine the given level.
pub fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
