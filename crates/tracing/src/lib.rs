//! Log output setup for strand binaries and tests.
//!
//! Library crates of the workspace only emit events through the `tracing` macros. Whoever owns
//! the process installs a subscriber: [`StrandTracer`] writes to stdout in a [`LogFormat`],
//! [`init_test_tracing`] writes to stderr and follows `RUST_LOG`.
//!
//! ```
//! use strand_tracing::{tracing::level_filters::LevelFilter, LogFormat, StrandTracer, Tracer};
//!
//! fn main() -> eyre::Result<()> {
//!     StrandTracer::new()
//!         .with_format(LogFormat::Json)
//!         .with_default_level(LevelFilter::INFO)
//!         .with_filters("engine::coordinator=debug")
//!         .init()
//! }
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

// Re-export tracing crates
pub use tracing;
pub use tracing_subscriber;

pub use formatter::LogFormat;
pub use test_tracer::TestTracer;

mod formatter;
mod layers;
mod test_tracer;

use crate::layers::Layers;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stdout subscriber.
///
/// Defaults to colored terminal output at `INFO`.
#[derive(Debug, Clone)]
pub struct StrandTracer {
    format: LogFormat,
    default_level: LevelFilter,
    /// Comma separated `EnvFilter` directives applied on top of `RUST_LOG`.
    filters: String,
    color: Option<String>,
}

impl StrandTracer {
    /// Creates a tracer with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output format.
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the level used for targets no directive mentions.
    pub const fn with_default_level(mut self, level: LevelFilter) -> Self {
        self.default_level = level;
        self
    }

    /// Adds comma separated filter directives, e.g. `engine::events=trace`.
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = filters.into();
        self
    }

    /// Sets the `--color` choice of terminal output, `None` disables colors.
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }
}

impl Default for StrandTracer {
    fn default() -> Self {
        Self {
            format: LogFormat::Terminal,
            default_level: LevelFilter::INFO,
            filters: String::new(),
            color: Some("always".to_string()),
        }
    }
}

/// A way of installing the global subscriber.
pub trait Tracer {
    /// Installs the subscriber, failing only on invalid configuration.
    fn init(self) -> eyre::Result<()>;
}

impl Tracer for StrandTracer {
    fn init(self) -> eyre::Result<()> {
        let mut layers = Layers::new();
        layers.stdout(self.format, self.default_level.into(), &self.filters, self.color)?;

        // fails if a global subscriber is already set
        let _ =
            tracing_subscriber::registry().with(layers.into_inner()).try_init().inspect_err(|e| {
                tracing::warn!(%e, "Tracing subscriber could not be initialized")
            });
        Ok(())
    }
}

/// Installs a [`TestTracer`], doing nothing if a subscriber is already installed.
pub fn init_test_tracing() {
    let _ = TestTracer::default().init();
}
