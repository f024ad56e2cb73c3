//! Tracing setup for tests.

use std::sync::Once;

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Layout passes log every node at `trace`; they stay quiet unless `RUST_LOG` asks for them.
const DEFAULT_DIRECTIVES: &str = "treescheme=debug,treescheme::application::layout=info";

static INIT: Once = Once::new();

/// Route tracing output through the test harness, once per test binary.
///
/// `RUST_LOG` replaces the default directives when set.
pub fn init_test_setup() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

        // Another subscriber may already be installed by the embedding test binary.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
    });
}
