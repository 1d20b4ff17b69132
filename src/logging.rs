//! Logging setup for the binary

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "snapcmp=warn",
        1 => "snapcmp=info",
        2 => "snapcmp=debug",
        _ => "snapcmp=trace",
    }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: u8) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
