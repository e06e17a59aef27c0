//! Submodule defining the errors returned to callers.
//!
//! Malformed DDL never produces an [`Error`]: it is recorded as an
//! [`Issue`](crate::Issue) and conversion carries on. These errors cover
//! misuse of the API by the caller.

/// Caller-contract violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The provenance source path was empty.
    #[error("Provenance source path must not be empty")]
    EmptySourcePath,
    /// A provenance value contained a line break, which would corrupt the
    /// rendered comment header.
    #[error("Provenance {field} must not contain line breaks")]
    LineBreakInProvenance {
        /// Which provenance value was rejected.
        field: &'static str,
    },
}
