/// Routes the engine's `log` output to stderr.
pub(crate) fn init_logger() {
    // parse_default_env will read the RUST_LOG environment variable and apply it on top
    // of these default filters.
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        // segment crossings are logged every few frames per robot
        .filter_module("engine_race::track", log::LevelFilter::Info)
        .parse_default_env()
        .format_indent(Some(0))
        .init();
}
