// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex buffer transformation
//!
//! Collapses a per-instance placement into world-space vertex coordinates.

use nalgebra::{Matrix4, Vector4};
use std::borrow::Cow;

/// Apply an affine 4x4 matrix to a flat `[x, y, z, ...]` buffer
///
/// Each vertex `v` becomes `(M * [v, 1]).xyz`; `w` is dropped without
/// division. A trailing partial vertex is copied unchanged.
pub fn transform_vertices(vertices: &[f32], matrix: &Matrix4<f32>) -> Vec<f32> {
    let mut out = Vec::with_capacity(vertices.len());
    let chunks = vertices.chunks_exact(3);
    let remainder = chunks.remainder();

    for v in chunks {
        let p = matrix * Vector4::new(v[0], v[1], v[2], 1.0);
        out.extend_from_slice(&[p.x, p.y, p.z]);
    }
    out.extend_from_slice(remainder);
    out
}

/// Apply a column-major transform if it is a well-formed 4x4 matrix
///
/// Absent or malformed transforms (length other than 16) leave the buffer
/// untouched and borrowed.
pub fn apply_transform<'a>(vertices: &'a [f32], transform: Option<&[f32]>) -> Cow<'a, [f32]> {
    match transform {
        Some(matrix) if matrix.len() == 16 => {
            let matrix = Matrix4::from_column_slice(matrix);
            Cow::Owned(transform_vertices(vertices, &matrix))
        }
        _ => Cow::Borrowed(vertices),
    }
}
