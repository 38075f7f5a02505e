// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for material resolution, stream writing and stream reading

use ifc_bgs_model::ObjectId;
use thiserror::Error;

/// Serialization result type
pub type Result<T> = std::result::Result<T, SerializeError>;

/// Errors raised while writing a BGS stream
#[derive(Error, Debug)]
pub enum SerializeError {
    /// Failure of the underlying sink
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bounds were written before any box was integrated
    #[error("Cannot write empty bounds")]
    EmptyBounds,

    /// Encoded string does not fit the 16-bit length prefix
    #[error("String of {0} encoded bytes exceeds the 65535 byte limit")]
    StringTooLong(usize),

    /// Count does not fit a signed 32-bit field
    ///
    /// `object` is `#0` for the stream-level object count.
    #[error("{field} count {count} exceeds the 32-bit limit for object {object}")]
    CountOverflow {
        object: ObjectId,
        field: &'static str,
        count: usize,
    },
}

impl SerializeError {
    /// Create a count overflow error
    pub fn count_overflow(object: ObjectId, field: &'static str, count: usize) -> Self {
        SerializeError::CountOverflow {
            object,
            field,
            count,
        }
    }
}

/// Errors raised while resolving a material label
///
/// These never reach the writer's caller: the writer falls back to the
/// declared class name.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// Referenced entity is missing from the model
    #[error("Entity {0} not found")]
    EntityNotFound(ObjectId),

    /// Referenced entity has the wrong kind
    #[error("Entity {id} is {actual}, expected {expected}")]
    UnexpectedEntity {
        id: ObjectId,
        expected: &'static str,
        actual: String,
    },

    /// Styled-item nesting deeper than the configured limit
    #[error("Styled item {id} nested deeper than {limit} levels")]
    StyleDepthExceeded { id: ObjectId, limit: usize },
}

impl ResolveError {
    /// Create an unexpected entity error
    pub fn unexpected(id: ObjectId, expected: &'static str, actual: impl Into<String>) -> Self {
        ResolveError::UnexpectedEntity {
            id,
            expected,
            actual: actual.into(),
        }
    }
}

/// Errors raised while decoding a BGS stream
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReadError {
    /// Stream does not start with the BGS magic
    #[error("Invalid magic: {0:?}")]
    InvalidMagic(String),

    /// Stream ended early or a field is malformed
    #[error("Malformed stream at byte {offset}: {message}")]
    Malformed { offset: usize, message: String },

    /// String field is not valid modified UTF-8
    #[error("Invalid string at byte {0}")]
    InvalidString(usize),

    /// Bytes left after the last record
    #[error("{0} trailing bytes after last record")]
    TrailingBytes(usize),
}

impl ReadError {
    /// Create a malformed stream error
    pub fn malformed(offset: usize, msg: impl Into<String>) -> Self {
        ReadError::Malformed {
            offset,
            message: msg.into(),
        }
    }
}
