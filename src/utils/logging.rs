use tracing_subscriber::EnvFilter;

/// Install the global log subscriber.
///
/// Verbose runs log at `debug` and honour `RUST_LOG`; otherwise only
/// warnings are printed so recovered fetch failures stay visible without
/// drowning the table output.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
