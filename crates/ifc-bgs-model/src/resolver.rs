// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity resolution trait for looking up model entities

use crate::{Entity, IfcType, ModelError, ObjectId};
use std::sync::Arc;

/// Entity lookup by object id
///
/// Implementations should provide O(1) lookup by id.
///
/// # Example
///
/// ```ignore
/// use ifc_bgs_model::{EntityResolver, ObjectId};
///
/// fn print_type(resolver: &dyn EntityResolver, id: ObjectId) {
///     if let Some(entity) = resolver.get(id) {
///         println!("{} is a {}", id, entity.ifc_type());
///     }
/// }
/// ```
pub trait EntityResolver: Send + Sync {
    /// Get entity by ID
    fn get(&self, id: ObjectId) -> Option<Arc<Entity>>;

    /// Get all entities of a specific type, in insertion order
    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<Entity>>;

    /// Get all entity IDs in the model
    fn all_ids(&self) -> Vec<ObjectId>;

    /// Get total entity count
    fn entity_count(&self) -> usize {
        self.all_ids().len()
    }
}

/// Extension methods for EntityResolver
pub trait EntityResolverExt: EntityResolver {
    /// Get entity or return error
    fn get_or_err(&self, id: ObjectId) -> crate::Result<Arc<Entity>> {
        self.get(id).ok_or(ModelError::EntityNotFound(id))
    }
}

// Blanket implementation for all EntityResolver types
impl<T: EntityResolver + ?Sized> EntityResolverExt for T {}
