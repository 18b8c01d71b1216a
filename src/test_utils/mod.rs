/// Recording adapter for driver-free tests
pub mod recording;

pub use recording::RecordingAdapter;

/// Test utilities for `PostgreSQL` testing
#[cfg(feature = "test-utils-postgres")]
pub mod postgres;

#[cfg(feature = "test-utils-postgres")]
pub use postgres::*;

#[cfg(feature = "test-utils-postgres")]
use std::sync::LazyLock;
#[cfg(feature = "test-utils-postgres")]
use tokio::runtime::Runtime;

/// Shared tokio runtime for test utilities to avoid creating multiple runtimes
#[cfg(feature = "test-utils-postgres")]
pub(crate) static SHARED_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Runtime::new().unwrap_or_else(|e| panic!("Failed to create tokio runtime for test utilities: {e}"))
});
