//! Logging setup shared by every FoodBot binary and test.
//!
//! Filtering honours `RUST_LOG`; the `foodbot` target additionally gets the
//! level passed to [`init_with_level`].

use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO.
///
/// # Examples
///
/// ```
/// use foodbot_common::logging;
///
/// logging::init();
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific level for the `foodbot` target.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("foodbot={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}
