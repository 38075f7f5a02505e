// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry records attached to products

use crate::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identity matrix (column-major)
pub const IDENTITY_TRANSFORM: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

/// Triangle buffers produced by the mesher
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryData {
    /// Vertex positions as flattened [x, y, z, x, y, z, ...]
    pub vertices: Vec<f32>,
    /// Vertex normals as flattened [nx, ny, nz, nx, ny, nz, ...]
    pub normals: Vec<f32>,
}

impl GeometryData {
    /// Create geometry buffers
    pub fn new(vertices: Vec<f32>, normals: Vec<f32>) -> Self {
        Self { vertices, normals }
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Geometry record of one product
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryInfo {
    /// Minimum corner of the object bounds
    pub min_bounds: [f64; 3],
    /// Maximum corner of the object bounds
    pub max_bounds: [f64; 3],
    /// Number of triangles
    pub primitive_count: u32,
    /// Triangle buffers
    pub data: GeometryData,
    /// Optional 4x4 transformation matrix (column-major, 16 elements expected)
    pub transformation: Option<Vec<f32>>,
}

impl GeometryInfo {
    /// Create a geometry record from triangle buffers
    ///
    /// The primitive count is derived from the vertex buffer.
    pub fn new(min_bounds: [f64; 3], max_bounds: [f64; 3], data: GeometryData) -> Self {
        Self {
            min_bounds,
            max_bounds,
            primitive_count: (data.vertex_count() / 3) as u32,
            data,
            transformation: None,
        }
    }

    /// Set the transformation matrix
    pub fn with_transformation(mut self, transformation: Vec<f32>) -> Self {
        self.transformation = Some(transformation);
        self
    }

    /// Transformation if it is a well-formed 4x4 matrix
    pub fn transform_matrix(&self) -> Option<&[f32]> {
        self.transformation
            .as_deref()
            .filter(|matrix| matrix.len() == 16)
    }
}

/// Geometry lookup for products
///
/// Provides the geometry record of a product, if the mesher produced one.
pub trait GeometrySource: Send + Sync {
    /// Get the geometry record of an object
    fn get_geometry(&self, id: ObjectId) -> Option<Arc<GeometryInfo>>;

    /// Check if an object has geometry
    fn has_geometry(&self, id: ObjectId) -> bool {
        self.get_geometry(id).is_some()
    }
}
