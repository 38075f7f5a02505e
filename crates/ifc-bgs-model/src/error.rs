// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for model access

use crate::ObjectId;
use thiserror::Error;

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while building or querying a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Entity not found
    #[error("Entity {0} not found")]
    EntityNotFound(ObjectId),

    /// An entity with the same id was already added
    #[error("Duplicate entity {0}")]
    DuplicateEntity(ObjectId),

    /// A reference points to an entity of the wrong kind
    #[error("Invalid reference from {entity} to {target}: expected {expected}, got {actual}")]
    InvalidReference {
        entity: ObjectId,
        target: ObjectId,
        expected: String,
        actual: String,
    },
}

impl ModelError {
    /// Create an invalid reference error
    pub fn invalid_reference(
        entity: ObjectId,
        target: ObjectId,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ModelError::InvalidReference {
            entity,
            target,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
