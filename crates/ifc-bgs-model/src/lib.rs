// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC BGS Model - Object capabilities consumed by the binary geometry serializer
//!
//! This crate describes the small slice of an IFC model the serializer needs:
//! products with their declared class and predefined type, the material and
//! presentation-style graph hanging off them, and per-product geometry
//! records. Model stores implement the traits; the serializer only reads.
//!
//! # Architecture
//!
//! - [`BuildingModel`] - Product enumeration plus access to the other traits
//! - [`EntityResolver`] - Entity lookup by [`ObjectId`]
//! - [`GeometrySource`] - Geometry records for products
//! - [`InMemoryModel`] / [`ModelBuilder`] - A ready-made store
//!
//! # Example
//!
//! ```ignore
//! use ifc_bgs_model::{IfcType, InMemoryModel};
//!
//! let mut builder = InMemoryModel::builder();
//! let wall = builder.product(IfcType::IfcWall);
//! let brick = builder.material(Some("Brick"));
//! builder.associate_material(wall, Some(brick))?;
//! let model = builder.build();
//! ```

pub mod entity;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod resolver;
pub mod traits;
pub mod types;

// Re-export all public types
pub use entity::*;
pub use error::*;
pub use geometry::*;
pub use memory::*;
pub use resolver::*;
pub use traits::*;
pub use types::*;
