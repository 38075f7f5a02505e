// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core model trait
//!
//! The serializer only needs a small capability set from a model store:
//! product enumeration, entity lookup and geometry lookup.

use crate::{Entity, EntityResolver, GeometrySource};
use std::sync::Arc;

/// Read-only access to a building model
///
/// The model is thread-safe (`Send + Sync`) so it can be shared with other
/// consumers, but serialization reads it sequentially.
pub trait BuildingModel: Send + Sync {
    /// Get entity resolver for entity lookups and reference resolution
    fn resolver(&self) -> &dyn EntityResolver;

    /// Get geometry source for product geometry records
    fn geometry(&self) -> &dyn GeometrySource;

    /// All products (entities of any product subtype)
    ///
    /// The order is the store's enumeration order. It must be stable across
    /// calls on an unchanged model, since callers traverse it more than once.
    fn products(&self) -> Vec<Arc<Entity>>;
}
