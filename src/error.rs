//! Error handling types and utilities.

/// A specialized Result type for rustdoc-implementors operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods where fragments are read from disk.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when a whole fragment cannot be decoded.
///
/// Problems inside a fragment (a bad record, a non-array implementor list, a
/// single broken assignment) never surface here; they decode to defaults.
#[derive(Debug, thiserror::Error)]
pub enum FragmentError {
    /// The fragment looked like a JSON batch but did not parse.
    #[error("Fragment is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The fragment parsed, but its top level is not a trait-to-implementors object.
    #[error("Fragment must be an object mapping traits to implementors, found {found}")]
    NotAnObject { found: &'static str },
}
