// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BGS stream decoder using nom combinators
//!
//! Reads back what [`BinaryGeometryWriter`](crate::BinaryGeometryWriter)
//! produces. Record padding depends on the absolute byte offset, so the
//! decoder tracks its position in the whole buffer.

use crate::bounds::Bounds;
use crate::error::ReadError;
use crate::stream::decode_modified_utf8;
use crate::writer::{MAGIC, RECORD_ALIGNMENT};
use ifc_bgs_model::ObjectId;
use nalgebra::Point3;
use nom::{
    bytes::complete::take,
    error::{Error, ErrorKind},
    number::complete::{be_i32, be_i64, be_u16, be_u8},
    IResult,
};

type PResult<'a, T> = IResult<&'a [u8], T>;

/// Decoded stream
#[derive(Clone, Debug, PartialEq)]
pub struct BgsStream {
    /// Header version byte
    pub version: u8,
    /// Aggregate bounds of all objects
    pub bounds: Bounds,
    /// Records in stream order
    pub objects: Vec<BgsObject>,
}

/// One decoded object record
#[derive(Clone, Debug, PartialEq)]
pub struct BgsObject {
    pub material: String,
    pub type_name: String,
    pub id: ObjectId,
    /// Byte offset of the bounds field (after padding)
    pub bounds_offset: usize,
    pub bounds: Bounds,
    /// Triangle corner count (three per triangle)
    pub vertex_count: usize,
    pub vertices: Vec<f32>,
    pub normals: Vec<f32>,
}

/// Decode a complete BGS stream
pub fn read_stream(data: &[u8]) -> Result<BgsStream, ReadError> {
    let mut reader = StreamReader { data, input: data };

    let magic = reader.string("magic")?;
    if magic != MAGIC {
        return Err(ReadError::InvalidMagic(magic));
    }
    let version = reader.run("version", |i| be_u8(i))?;
    let bounds = reader.run("bounds", bounds)?;
    let count = reader.count("object count")?;

    let mut objects = Vec::new();
    for _ in 0..count {
        objects.push(reader.object()?);
    }

    if !reader.input.is_empty() {
        return Err(ReadError::TrailingBytes(reader.input.len()));
    }

    Ok(BgsStream {
        version,
        bounds,
        objects,
    })
}

// ============================================================================
// Parsing Primitives
// ============================================================================

/// Length-prefixed string bytes
fn utf(input: &[u8]) -> PResult<'_, &[u8]> {
    let (input, len) = be_u16(input)?;
    take(len as usize)(input)
}

/// `n` native-order floats
fn floats(input: &[u8], n: usize) -> PResult<'_, Vec<f32>> {
    let Some(len) = n.checked_mul(4) else {
        return Err(nom::Err::Error(Error::new(input, ErrorKind::TooLarge)));
    };
    let (input, bytes) = take(len)(input)?;
    let values = bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    Ok((input, values))
}

fn bounds(input: &[u8]) -> PResult<'_, Bounds> {
    let (input, v) = floats(input, 6)?;
    let min = Point3::new(v[0], v[1], v[2]);
    let max = Point3::new(v[3], v[4], v[5]);
    Ok((input, Bounds::new(min, max)))
}

// ============================================================================
// Stream Reader
// ============================================================================

struct StreamReader<'a> {
    data: &'a [u8],
    input: &'a [u8],
}

impl<'a> StreamReader<'a> {
    fn offset(&self) -> usize {
        self.data.len() - self.input.len()
    }

    /// Run a parser at the current position, mapping failures to the offset
    fn run<T, F>(&mut self, what: &str, parser: F) -> Result<T, ReadError>
    where
        F: FnOnce(&'a [u8]) -> PResult<'a, T>,
    {
        match parser(self.input) {
            Ok((rest, value)) => {
                self.input = rest;
                Ok(value)
            }
            Err(_) => Err(ReadError::malformed(
                self.offset(),
                format!("truncated or invalid {}", what),
            )),
        }
    }

    fn string(&mut self, what: &str) -> Result<String, ReadError> {
        let offset = self.offset();
        let bytes = self.run(what, utf)?;
        decode_modified_utf8(bytes).ok_or(ReadError::InvalidString(offset))
    }

    fn count(&mut self, what: &str) -> Result<usize, ReadError> {
        let offset = self.offset();
        let n = self.run(what, |i| be_i32(i))?;
        usize::try_from(n).map_err(|_| ReadError::malformed(offset, format!("negative {}", what)))
    }

    fn object(&mut self) -> Result<BgsObject, ReadError> {
        let material = self.string("material label")?;
        let type_name = self.string("type name")?;
        let id = self.run("object id", |i| be_i64(i))?;

        let padding = (RECORD_ALIGNMENT - self.offset() % RECORD_ALIGNMENT) % RECORD_ALIGNMENT;
        self.run("padding", |i| take(padding)(i))?;

        let bounds_offset = self.offset();
        let bounds = self.run("object bounds", bounds)?;
        let vertex_count = self.count("vertex count")?;

        let n = self.count("vertex float count")?;
        let vertices = self.run("vertices", |i| floats(i, n))?;
        let n = self.count("normal float count")?;
        let normals = self.run("normals", |i| floats(i, n))?;

        Ok(BgsObject {
            material,
            type_name,
            id: ObjectId(id as u64),
            bounds_offset,
            bounds,
            vertex_count,
            vertices,
            normals,
        })
    }
}
