use tracing::Level;
use tracing_subscriber::prelude::*;

/// Install the global fmt subscriber. `verbose` is the `-v` count:
/// none for info, one for debug, more for trace.
pub fn init(verbose: u8) {
    let level = match verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(tracing_subscriber::filter::LevelFilter::from_level(level))
        .init();
}
