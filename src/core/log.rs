use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Level for this crate's events from the number of `-v` flags.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::OFF,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber writing to stderr, so converted amounts on
/// stdout stay clean. `RUST_LOG` overrides the dependency filter.
pub fn init_logging(verbosity: u8) {
    let level = level_for(verbosity);
    let app_filter = Targets::new()
        .with_target("cconv", level)
        .with_default(LevelFilter::WARN.min(level));
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(verbosity > 1);

    tracing_subscriber::registry()
        .with(layer.compact())
        .with(app_filter)
        .with(env_filter)
        .init();
}
