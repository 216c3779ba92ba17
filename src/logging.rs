// 📜 Logging - Console subscriber for the CLI

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the console subscriber. Logs go to stderr so stdout stays pure JSON.
///
/// `RUST_LOG` wins when set; otherwise the crate logs at info.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "owner_timeline=debug"
    } else {
        "owner_timeline=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
