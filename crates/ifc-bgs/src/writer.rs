// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary geometry stream writer
//!
//! A pass walks the model's products twice in the same order: once to
//! aggregate bounds and count objects, once to emit records.

use crate::bounds::Bounds;
use crate::error::{Result, SerializeError};
use crate::index::MaterialIndex;
use crate::material::MaterialResolver;
use crate::options::SerializerOptions;
use crate::stream::CountingWriter;
use crate::transform::apply_transform;
use ifc_bgs_model::{BuildingModel, GeometryInfo, ObjectId, Product};
use log::{debug, error};
use serde::Serialize;
use std::borrow::Cow;
use std::io::{self, Write};

/// Stream magic, written as a length-prefixed string
pub const MAGIC: &str = "BGS";

/// Record fields before the bounds are padded to this alignment
pub const RECORD_ALIGNMENT: usize = 4;

/// Writer state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Next `write` performs a pass
    #[default]
    Body,
    /// Pass done; `write` is a no-op until `reset`
    Finished,
}

/// Diagnostics of the last pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    /// Records written
    pub object_count: usize,
    /// Bytes handed to the sink
    pub bytes_written: usize,
    /// Vertex buffer bytes written
    pub vertex_bytes: usize,
    /// Vertex buffer bytes that went through a transform
    pub transformed_vertex_bytes: usize,
    /// Objects labelled by class name because resolution failed
    pub material_fallbacks: usize,
}

impl PassStats {
    /// Share of vertex bytes that were transformed, in percent
    pub fn transformed_percent(&self) -> f64 {
        if self.vertex_bytes == 0 {
            return 0.0;
        }
        self.transformed_vertex_bytes as f64 * 100.0 / self.vertex_bytes as f64
    }
}

/// Serializes a building model into a BGS stream
///
/// # Example
///
/// ```ignore
/// use ifc_bgs::{BinaryGeometryWriter, SerializerOptions};
///
/// let mut writer = BinaryGeometryWriter::new(SerializerOptions::default());
/// let mut out = Vec::new();
/// assert!(writer.write(&model, &mut out)?);
/// assert!(!writer.write(&model, &mut out)?);
/// ```
#[derive(Debug, Default)]
pub struct BinaryGeometryWriter {
    options: SerializerOptions,
    mode: Mode,
    index: MaterialIndex,
    stats: PassStats,
}

impl BinaryGeometryWriter {
    /// Create a writer in [`Mode::Body`]
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            mode: Mode::Body,
            index: MaterialIndex::new(),
            stats: PassStats::default(),
        }
    }

    /// Write the whole stream
    ///
    /// Returns `Ok(true)` if a pass ran and `Ok(false)` if the writer was
    /// already finished. Errors other than I/O end the pass early and are
    /// logged; bytes already written stay in the sink.
    pub fn write<W: Write>(&mut self, model: &dyn BuildingModel, out: &mut W) -> io::Result<bool> {
        if self.mode == Mode::Finished {
            return Ok(false);
        }

        self.index.clear();
        self.stats = PassStats::default();

        let mut stream = CountingWriter::new(out);
        let result = self.write_pass(model, &mut stream);
        self.stats.bytes_written = stream.bytes_written();
        self.mode = Mode::Finished;

        match result {
            Ok(()) => {
                debug!(
                    "Wrote {} objects, {} bytes, {:.1}% of vertex bytes transformed, {} material fallbacks",
                    self.stats.object_count,
                    self.stats.bytes_written,
                    self.stats.transformed_percent(),
                    self.stats.material_fallbacks
                );
                Ok(true)
            }
            Err(SerializeError::Io(e)) => Err(e),
            Err(e) => {
                error!("Binary geometry serialization failed: {}", e);
                stream.flush()?;
                Ok(true)
            }
        }
    }

    /// Return to [`Mode::Body`] so the next `write` runs a new pass
    pub fn reset(&mut self) {
        self.mode = Mode::Body;
    }

    /// Index of the last pass
    pub fn material_index(&self) -> &MaterialIndex {
        &self.index
    }

    /// Statistics of the last pass
    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    fn write_pass<W: Write>(
        &mut self,
        model: &dyn BuildingModel,
        out: &mut CountingWriter<W>,
    ) -> Result<()> {
        out.write_utf(MAGIC)?;
        out.write_u8(self.options.format_version)?;

        let entities = model.products();
        let geometry = model.geometry();

        // Both traversals use this list so the count matches the records
        let objects: Vec<_> = entities
            .iter()
            .filter_map(|entity| {
                let product = entity.as_product()?;
                let info = geometry.get_geometry(entity.id)?;
                Some((entity.id, product, info))
            })
            .collect();

        let mut bounds = Bounds::empty();
        for (_, _, info) in &objects {
            bounds.integrate(&Bounds::from_geometry(info));
        }

        bounds.write_to(out)?;
        out.write_i32(count_field(objects.len(), ObjectId(0), "object")?)?;

        let resolver = MaterialResolver::new(model.resolver(), &self.options);
        for (id, product, info) in &objects {
            self.write_object(out, &resolver, *id, product, info)?;
        }

        out.flush()?;
        Ok(())
    }

    fn write_object<W: Write>(
        &mut self,
        out: &mut CountingWriter<W>,
        resolver: &MaterialResolver<'_>,
        id: ObjectId,
        product: &Product,
        info: &GeometryInfo,
    ) -> Result<()> {
        let type_name = product.ifc_type.name();
        let label = match resolver.resolve(product) {
            Ok(label) => {
                self.index.record(type_name, &label, id);
                label
            }
            Err(e) => {
                debug!("Material resolution failed for {}: {}, using {}", id, e, type_name);
                self.stats.material_fallbacks += 1;
                type_name.to_string()
            }
        };

        out.write_utf(&label)?;
        out.write_utf(product.effective_type().name())?;
        out.write_i64(id.into())?;

        out.pad_to(RECORD_ALIGNMENT)?;
        out.write_f32s(&Bounds::from_geometry(info).to_array())?;

        let vertex_count = info.primitive_count as usize * 3;
        out.write_i32(count_field(vertex_count, id, "vertex")?)?;

        let raw = info.data.vertices.as_slice();
        let vertices = if self.options.bakes_transforms() {
            apply_transform(raw, info.transform_matrix())
        } else {
            Cow::Borrowed(raw)
        };
        let vertex_bytes = std::mem::size_of_val(&*vertices);
        self.stats.vertex_bytes += vertex_bytes;
        if matches!(vertices, Cow::Owned(_)) {
            self.stats.transformed_vertex_bytes += vertex_bytes;
        }

        out.write_i32(count_field(vertices.len(), id, "vertex float")?)?;
        out.write_f32s(&vertices)?;

        let normals = &info.data.normals;
        out.write_i32(count_field(normals.len(), id, "normal float")?)?;
        out.write_f32s(normals)?;

        self.stats.object_count += 1;
        Ok(())
    }
}

fn count_field(count: usize, object: ObjectId, field: &'static str) -> Result<i32> {
    i32::try_from(count).map_err(|_| SerializeError::count_overflow(object, field, count))
}
