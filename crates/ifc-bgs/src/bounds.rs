// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes

use crate::error::{Result, SerializeError};
use ifc_bgs_model::GeometryInfo;
use nalgebra::{Point3, Vector3};
use std::io::Write;

/// Size of a serialized box: six 4-byte floats
pub const BOUNDS_BYTES: usize = 24;

/// Axis-aligned bounding box
///
/// [`Bounds::empty`] is the accumulation origin: min is +inf and max is -inf,
/// so the first integrated box is adopted as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Box that contains nothing yet
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Box from two corners
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Object-local box of a geometry record
    pub fn from_geometry(geometry: &GeometryInfo) -> Self {
        let [min_x, min_y, min_z] = geometry.min_bounds;
        let [max_x, max_y, max_z] = geometry.max_bounds;
        Self {
            min: Point3::new(min_x as f32, min_y as f32, min_z as f32),
            max: Point3::new(max_x as f32, max_y as f32, max_z as f32),
        }
    }

    /// Check if no box has been integrated yet
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow this box to enclose `other`
    ///
    /// Non-finite coordinates propagate.
    pub fn integrate(&mut self, other: &Bounds) {
        self.min = self.min.coords.zip_map(&other.min.coords, min_nan).into();
        self.max = self.max.coords.zip_map(&other.max.coords, max_nan).into();
    }

    /// Extent along each axis
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Center point
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Corners in wire order: min.x, min.y, min.z, max.x, max.y, max.z
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Write the corners as native-order floats
    ///
    /// Fails on a box that never had anything integrated.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> Result<()> {
        if self.is_empty() {
            return Err(SerializeError::EmptyBounds);
        }
        let values = self.to_array();
        let bytes: &[u8] = bytemuck::cast_slice(&values);
        debug_assert_eq!(bytes.len(), BOUNDS_BYTES);
        out.write_all(bytes)?;
        Ok(())
    }
}

// f32::min/max would swallow NaN
fn min_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.min(b)
    }
}

fn max_nan(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else {
        a.max(b)
    }
}
