// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end checks of the written stream, decoded with the reader

use approx::assert_relative_eq;
use ifc_bgs::{
    read_stream, BinaryGeometryWriter, Mode, Point3, SerializerOptions, BOUNDS_BYTES,
};
use ifc_bgs_model::{
    BuildingModel, Entity, EntityKind, EntityResolver, GeometryData, GeometryInfo,
    GeometrySource, IfcType, InMemoryModel, ModelBuilder, ObjectId, IDENTITY_TRANSFORM,
};
use std::sync::Arc;

/// One triangle in the XY plane with +Z normals
fn triangle(min: [f64; 3], max: [f64; 3]) -> GeometryInfo {
    let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let normals = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    GeometryInfo::new(min, max, GeometryData::new(vertices, normals))
}

fn write(model: &InMemoryModel, options: SerializerOptions) -> Vec<u8> {
    let mut writer = BinaryGeometryWriter::new(options);
    let mut out = Vec::new();
    assert!(writer.write(model, &mut out).unwrap());
    out
}

/// Two walls plus one product without geometry
fn two_walls() -> (InMemoryModel, ObjectId, ObjectId) {
    let mut builder = ModelBuilder::new();
    let a = builder.product(IfcType::IfcWall);
    builder
        .set_geometry(a, triangle([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]))
        .unwrap();
    builder.product(IfcType::IfcSpace);
    let b = builder.product(IfcType::IfcColumn);
    builder
        .set_geometry(b, triangle([-1.0, 2.0, 0.0], [0.0, 3.0, 1.0]))
        .unwrap();
    (builder.build(), a, b)
}

#[test]
fn test_header_and_aggregate_bounds() {
    let (model, _, _) = two_walls();
    let data = write(&model, SerializerOptions::default());

    assert_eq!(&data[..6], &[0, 3, b'B', b'G', b'S', 3]);

    let stream = read_stream(&data).unwrap();
    assert_eq!(stream.version, 3);
    assert_eq!(stream.bounds.min, Point3::new(-1.0, 0.0, 0.0));
    assert_eq!(stream.bounds.max, Point3::new(1.0, 3.0, 1.0));
}

#[test]
fn test_object_count_matches_records() {
    let (model, a, b) = two_walls();
    let data = write(&model, SerializerOptions::default());
    let count = i32::from_be_bytes([data[30], data[31], data[32], data[33]]);
    assert_eq!(count, 2);

    let stream = read_stream(&data).unwrap();
    let ids: Vec<_> = stream.objects.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![a, b]);
}

/// Store whose product listing also yields a site carrying geometry
struct SiteWithGeometry {
    inner: InMemoryModel,
    site: Arc<Entity>,
    site_geometry: Arc<GeometryInfo>,
}

impl GeometrySource for SiteWithGeometry {
    fn get_geometry(&self, id: ObjectId) -> Option<Arc<GeometryInfo>> {
        if id == self.site.id {
            return Some(self.site_geometry.clone());
        }
        self.inner.get_geometry(id)
    }
}

impl BuildingModel for SiteWithGeometry {
    fn resolver(&self) -> &dyn EntityResolver {
        &self.inner
    }

    fn geometry(&self) -> &dyn GeometrySource {
        self
    }

    fn products(&self) -> Vec<Arc<Entity>> {
        let mut products = self.inner.products();
        products.push(self.site.clone());
        products
    }
}

#[test]
fn test_non_products_with_geometry_not_counted() {
    let (inner, a, b) = two_walls();
    let model = SiteWithGeometry {
        inner,
        site: Arc::new(Entity::new(
            ObjectId(1_000),
            EntityKind::Other(IfcType::IfcSite),
        )),
        site_geometry: Arc::new(triangle([-50.0; 3], [50.0; 3])),
    };

    let mut writer = BinaryGeometryWriter::default();
    let mut data = Vec::new();
    assert!(writer.write(&model, &mut data).unwrap());

    let count = i32::from_be_bytes([data[30], data[31], data[32], data[33]]);
    assert_eq!(count, 2);
    assert_eq!(writer.stats().object_count, 2);

    let stream = read_stream(&data).unwrap();
    let ids: Vec<_> = stream.objects.iter().map(|o| o.id).collect();
    assert_eq!(ids, vec![a, b]);
    // The site's box does not widen the aggregate bounds
    assert_eq!(stream.bounds.min, Point3::new(-1.0, 0.0, 0.0));
    assert_eq!(stream.bounds.max, Point3::new(1.0, 3.0, 1.0));
}

#[test]
fn test_records() {
    let (model, _, _) = two_walls();
    let stream = read_stream(&write(&model, SerializerOptions::default())).unwrap();

    let wall = &stream.objects[0];
    assert_eq!(wall.material, "IfcWall");
    assert_eq!(wall.type_name, "IfcWall");
    assert_eq!(wall.vertex_count, 3);
    assert_eq!(wall.vertices, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    assert_eq!(wall.normals.len(), 9);
    assert_eq!(wall.bounds.max, Point3::new(1.0, 1.0, 1.0));

    let column = &stream.objects[1];
    assert_eq!(column.type_name, "IfcColumn");
    assert_eq!(column.bounds.min, Point3::new(-1.0, 2.0, 0.0));
}

#[test]
fn test_bounds_fields_are_aligned() {
    let mut builder = ModelBuilder::new();
    // Names of varying length shift the offset before each padding
    let products: Vec<_> = [
        IfcType::IfcWall,
        IfcType::IfcSlab,
        IfcType::IfcBuildingElementProxy,
        IfcType::IfcDoor,
        IfcType::IfcStairFlight,
    ]
    .into_iter()
    .map(|ifc_type| {
        let product = builder.product(ifc_type);
        builder
            .set_geometry(product, triangle([0.0; 3], [1.0; 3]))
            .unwrap();
        product
    })
    .collect();
    let material = builder.material(Some("Stahlbeton C30/37"));
    builder.associate_material(products[0], Some(material)).unwrap();
    let model = builder.build();

    let data = write(&model, SerializerOptions::default());
    let stream = read_stream(&data).unwrap();
    assert_eq!(stream.objects.len(), 5);
    for object in &stream.objects {
        assert_eq!(object.bounds_offset % 4, 0);
        assert!(object.bounds_offset + BOUNDS_BYTES <= data.len());
    }
}

#[test]
fn test_reset_gives_identical_output() {
    let (model, _, _) = two_walls();
    let mut writer = BinaryGeometryWriter::default();

    let mut first = Vec::new();
    assert!(writer.write(&model, &mut first).unwrap());
    let index = writer.material_index().clone();

    let mut second = Vec::new();
    assert!(!writer.write(&model, &mut second).unwrap());
    assert!(second.is_empty());

    writer.reset();
    assert_eq!(writer.mode(), Mode::Body);
    assert!(writer.write(&model, &mut second).unwrap());
    assert_eq!(first, second);
    assert_eq!(writer.material_index(), &index);
}

#[test]
fn test_transform_baked_from_version_4() {
    let mut builder = ModelBuilder::new();
    let wall = builder.product(IfcType::IfcWall);
    let mut matrix = IDENTITY_TRANSFORM.to_vec();
    matrix[12] = 10.0;
    matrix[13] = -2.0;
    matrix[14] = 0.5;
    builder
        .set_geometry(
            wall,
            triangle([0.0; 3], [1.0; 3]).with_transformation(matrix),
        )
        .unwrap();
    let model = builder.build();

    let raw = read_stream(&write(&model, SerializerOptions::default())).unwrap();
    assert_eq!(raw.version, 3);
    assert_eq!(raw.objects[0].vertices[..3], [0.0f32; 3]);

    let baked = read_stream(&write(
        &model,
        SerializerOptions::new().with_format_version(4),
    ))
    .unwrap();
    assert_eq!(baked.version, 4);
    let expected = [10.0f32, -2.0, 0.5, 11.0, -2.0, 0.5, 10.0, -1.0, 0.5];
    for (actual, expected) in baked.objects[0].vertices.iter().zip(expected) {
        assert_relative_eq!(*actual, expected, epsilon = 1e-6);
    }
    // Normals and bounds stay as stored
    assert_eq!(baked.objects[0].normals, raw.objects[0].normals);
    assert_eq!(baked.objects[0].bounds, raw.objects[0].bounds);
}

#[test]
fn test_malformed_transform_ignored() {
    let mut builder = ModelBuilder::new();
    let wall = builder.product(IfcType::IfcWall);
    builder
        .set_geometry(
            wall,
            triangle([0.0; 3], [1.0; 3]).with_transformation(vec![2.0; 12]),
        )
        .unwrap();
    let model = builder.build();

    let stream = read_stream(&write(
        &model,
        SerializerOptions::new().with_format_version(4),
    ))
    .unwrap();
    assert_eq!(
        stream.objects[0].vertices,
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
    );
}

#[test]
fn test_model_without_geometry_writes_header_only() {
    let mut builder = ModelBuilder::new();
    builder.product(IfcType::IfcSpace);
    let model = builder.build();

    let mut writer = BinaryGeometryWriter::default();
    let mut out = Vec::new();
    assert!(writer.write(&model, &mut out).unwrap());
    assert_eq!(writer.mode(), Mode::Finished);
    assert_eq!(out.len(), 6);
    assert!(read_stream(&out).is_err());
}
