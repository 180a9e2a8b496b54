//! Error types for marshalling operations.

use thiserror::Error;

/// Errors that can occur while marshalling a value.
///
/// Every error is terminal for the call that produced it: no partial output
/// is returned.
#[derive(Error, Debug)]
pub enum FieldgateError {
    /// A keyed mapping used a key type other than a string.
    /// Carries the first offending key (`kind`, rendered `key`) and the
    /// mapping it came from (`type_name`, number of entries `len`).
    #[error("Unable to marshal map key {key} of type {kind}: string keys required ({type_name} with {len} entries)")]
    InvalidInputType {
        kind: &'static str,
        key: String,
        type_name: &'static str,
        len: usize,
    },

    /// A `since`/`until` tag (or a configured API version) is not a valid version.
    #[error("Malformed version {input:?}: {reason}")]
    VersionParse { input: String, reason: String },

    /// Error returned verbatim by a [`crate::Marshaller`] implementation.
    #[error(transparent)]
    Delegate(#[from] Box<dyn std::error::Error + Send + Sync>),

    /// A self-describing value failed to render through serde.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl FieldgateError {
    /// Wrap an arbitrary error coming out of a custom marshaller.
    pub fn delegate<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FieldgateError::Delegate(Box::new(err))
    }
}

/// Convenience alias used throughout fieldgate.
pub type Result<T> = std::result::Result<T, FieldgateError>;
