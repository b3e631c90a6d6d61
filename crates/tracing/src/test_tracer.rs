use tracing_subscriber::EnvFilter;

use crate::Tracer;

/// Subscriber for tests, writing to stderr and filtered by `RUST_LOG`.
///
/// Installing it twice is not an error.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct TestTracer;

impl Tracer for TestTracer {
    fn init(self) -> eyre::Result<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
        Ok(())
    }
}
