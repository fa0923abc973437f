// --- File: crates/buslink_common/src/logging.rs ---
//! Logging initialization shared by the server and the operator scripts.

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at the default INFO level.
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific minimum log level.
///
/// `RUST_LOG` still takes precedence for other targets; the `buslink`
/// directive only sets the floor for this workspace's crates. Uses
/// `try_init` so a second call (tests) is harmless.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("buslink={}", level).parse().expect("valid directive"));

    let result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
