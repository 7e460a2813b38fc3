//! Tracing initialization.
//!
//! Filtering follows `RUST_LOG`. Without it, this crate logs at `info`, or at
//! `debug` when running under a test harness so merge and delivery steps show up
//! in captured test output.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

static INIT: Once = Once::new();

/// Default directive applied when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "rustdoc_implementors=info";
const TEST_DIRECTIVE: &str = "rustdoc_implementors=debug";

/// Install the global subscriber. Safe to call multiple times.
pub fn init() {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let fallback = if is_test { TEST_DIRECTIVE } else { DEFAULT_DIRECTIVE };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE)
            .compact();

        let result = if is_test {
            builder.with_test_writer().try_init()
        } else {
            builder.with_writer(std::io::stderr).try_init()
        };

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
