// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec error taxonomy.
//!
//! Every failure is surfaced to the caller; nothing is retried internally and
//! there is no partial-result mode.

use crate::id::TypeId;
use std::io;
use thiserror::Error;

/// Errors produced by registration, encoding and decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An id was re-registered with a different `(underlying_type, is_array)`.
    #[error(
        "conflicting definition for {id}: registered as (underlying {existing_underlying}, array {existing_is_array}), redefined as (underlying {underlying}, array {is_array})"
    )]
    ConflictingDefinition {
        id: TypeId,
        existing_underlying: TypeId,
        existing_is_array: bool,
        underlying: TypeId,
        is_array: bool,
    },

    /// The Unit sentinel cannot be registered as a Def.
    #[error("type id {0} is reserved")]
    ReservedTypeId(TypeId),

    /// Id not registered, or a dangling/cyclic underlying-type link.
    #[error("unknown type id {0}")]
    UnknownTypeId(TypeId),

    #[error("no encoder bound for wire shape {primitive} (def {def})")]
    MissingEncoder { def: TypeId, primitive: TypeId },

    #[error("no decoder bound for wire shape {primitive} (def {def})")]
    MissingDecoder { def: TypeId, primitive: TypeId },

    /// Fewer bytes were available than a length field promised.
    #[error("stream truncated")]
    StreamTruncated,

    /// Empty or whitespace-only named-map entry name.
    #[error("invalid map entry name {name:?}")]
    InvalidName { name: String },

    #[error("stream is not seekable")]
    StreamNotSeekable,

    #[error("stream is not writable")]
    StreamNotWritable,

    /// A retired wire variant, flagged in its header, refuses to decode.
    #[error("deprecated wire variant (flags {flags:#x}) in {def}")]
    DeprecatedVariantUnsupported { def: TypeId, flags: i32 },

    #[error("decompressed {actual} bytes, header declared {expected}")]
    DecompressionMismatch { expected: usize, actual: usize },

    #[error("decompression failed: {source}")]
    Decompression {
        #[source]
        source: io::Error,
    },

    /// The value handed to the encoder (or requested from the decoder) does not
    /// have the runtime shape selected by the Def.
    #[error("value mismatch for {def}: expected {expected}, found {found}")]
    ValueMismatch {
        def: TypeId,
        expected: String,
        found: &'static str,
    },

    #[error("invalid {what}: {len}")]
    InvalidLength { what: &'static str, len: i64 },

    #[error("payload of {len} bytes exceeds limit of {limit}")]
    LengthLimitExceeded { len: u64, limit: u64 },

    #[error("nesting exceeds {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("invalid UTF-8 string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(io::Error),
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => CodecError::StreamTruncated,
            io::ErrorKind::WriteZero => CodecError::StreamNotWritable,
            io::ErrorKind::Unsupported => CodecError::StreamNotSeekable,
            _ => CodecError::Io(err),
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_kinds_map_to_taxonomy() {
        let eof = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert!(matches!(CodecError::from(eof), CodecError::StreamTruncated));

        let zero = io::Error::new(io::ErrorKind::WriteZero, "full");
        assert!(matches!(
            CodecError::from(zero),
            CodecError::StreamNotWritable
        ));

        let seek = io::Error::new(io::ErrorKind::Unsupported, "forward only");
        assert!(matches!(
            CodecError::from(seek),
            CodecError::StreamNotSeekable
        ));

        let other = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(CodecError::from(other), CodecError::Io(_)));
    }

    #[test]
    fn test_error_display() {
        let err = CodecError::UnknownTypeId(TypeId::from_u128(1));
        assert_eq!(
            err.to_string(),
            "unknown type id 00000000-0000-0000-0000-000000000001"
        );

        let err = CodecError::DecompressionMismatch {
            expected: 10,
            actual: 7,
        };
        assert_eq!(err.to_string(), "decompressed 7 bytes, header declared 10");

        let err = CodecError::InvalidName { name: "  ".into() };
        assert_eq!(err.to_string(), "invalid map entry name \"  \"");
    }
}
