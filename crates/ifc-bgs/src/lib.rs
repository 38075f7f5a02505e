// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC BGS - Binary Geometry Stream Serializer
//!
//! Serializes the products of a building model into one compact binary
//! stream for renderers. The crate reads models through the traits of
//! `ifc-bgs-model`, so any store implementing them can be serialized.
//!
//! ## Overview
//!
//! - **Bounds**: Aggregate axis-aligned bounds over all objects
//! - **Material Labels**: Priority-ordered walk over material associations
//!   and surface styles
//! - **Transforms**: Optional baking of placement matrices into vertices
//! - **Writer**: Versioned header plus aligned, length-prefixed records
//! - **Reader**: Decoder for the same format
//!
//! ## Stream Layout
//!
//! ```text
//! magic          u16 BE length + "BGS"
//! version        u8
//! bounds         6 x f32 native (min xyz, max xyz)
//! object count   i32 BE
//! per object:
//!   material     u16 BE length + modified UTF-8
//!   type name    u16 BE length + modified UTF-8
//!   object id    i64 BE
//!   padding      0-3 zero bytes, aligning the stream offset to 4
//!   bounds       6 x f32 native
//!   vertex count i32 BE (three per triangle)
//!   vertices     i32 BE float count + f32 native
//!   normals      i32 BE float count + f32 native
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_bgs::{read_stream, BinaryGeometryWriter, SerializerOptions};
//!
//! let mut writer = BinaryGeometryWriter::new(SerializerOptions::default());
//! let mut out = Vec::new();
//! writer.write(&model, &mut out)?;
//!
//! let stream = read_stream(&out)?;
//! println!("{} objects", stream.objects.len());
//! ```

pub mod bounds;
pub mod error;
pub mod index;
pub mod material;
pub mod options;
pub mod reader;
pub mod stream;
pub mod transform;
pub mod writer;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3};

// Re-export main types
pub use bounds::{Bounds, BOUNDS_BYTES};
pub use error::{ReadError, ResolveError, Result, SerializeError};
pub use index::MaterialIndex;
pub use material::{normalize_name, MaterialResolver, NULL_NAME};
pub use options::{NameNormalization, SerializerOptions, FORMAT_VERSION, TRANSFORM_VERSION};
pub use reader::{read_stream, BgsObject, BgsStream};
pub use stream::CountingWriter;
pub use transform::{apply_transform, transform_vertices};
pub use writer::{BinaryGeometryWriter, Mode, PassStats, MAGIC};
