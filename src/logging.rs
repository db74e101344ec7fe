//! Tracing setup for the binary.

use tracing_subscriber::EnvFilter;

/// Filter directive for a `-v` count: warn, info, then debug and beyond.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "ballroll=warn",
        1 => "ballroll=info",
        2 => "ballroll=debug",
        _ => "ballroll=trace",
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins over
/// the verbosity flag when set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    // a second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
