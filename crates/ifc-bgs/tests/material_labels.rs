// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material labels and the material index as seen through a full pass

use ifc_bgs::{read_stream, BgsStream, BinaryGeometryWriter, NameNormalization, SerializerOptions};
use ifc_bgs_model::{
    GeometryData, GeometryInfo, IfcType, InMemoryModel, ModelBuilder, ObjectId, PredefinedType,
};

fn unit_geometry() -> GeometryInfo {
    GeometryInfo::new(
        [0.0; 3],
        [1.0; 3],
        GeometryData::new(vec![0.0; 9], vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]),
    )
}

fn product_with_geometry(builder: &mut ModelBuilder, ifc_type: IfcType) -> ObjectId {
    let product = builder.product(ifc_type);
    builder.set_geometry(product, unit_geometry()).unwrap();
    product
}

fn serialize(model: &InMemoryModel, options: SerializerOptions) -> (BinaryGeometryWriter, BgsStream) {
    let mut writer = BinaryGeometryWriter::new(options);
    let mut out = Vec::new();
    writer.write(model, &mut out).unwrap();
    let stream = read_stream(&out).unwrap();
    (writer, stream)
}

#[test]
fn test_roof_slab_written_as_roof() {
    let mut builder = ModelBuilder::new();
    let slab = product_with_geometry(&mut builder, IfcType::IfcSlab);
    builder.set_predefined_type(slab, PredefinedType::Roof).unwrap();
    let floor = product_with_geometry(&mut builder, IfcType::IfcSlab);
    builder
        .set_predefined_type(floor, PredefinedType::Floor)
        .unwrap();
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());

    assert_eq!(stream.objects[0].material, "IfcRoof");
    assert_eq!(stream.objects[0].type_name, "IfcRoof");
    assert_eq!(stream.objects[1].material, "IfcSlab");
    assert_eq!(stream.objects[1].type_name, "IfcSlab");

    // The index is keyed by the declared class
    let index = writer.material_index();
    assert!(index.contains("IfcSlab", "IfcRoof", slab));
    assert!(index.contains("IfcSlab", "IfcSlab", floor));
    assert!(index.objects("IfcRoof", "IfcRoof").is_none());
}

#[test]
fn test_material_and_layer_labels() {
    let mut builder = ModelBuilder::new();
    let wall = product_with_geometry(&mut builder, IfcType::IfcWall);
    let brick = builder.material(Some("Brick, red"));
    builder.associate_material(wall, Some(brick)).unwrap();

    let slab = product_with_geometry(&mut builder, IfcType::IfcSlab);
    let screed = builder.material(Some("Screed"));
    let concrete = builder.material(Some("Concrete C25/30"));
    let usage = builder.layer_set_usage(&[Some(screed), Some(concrete)]);
    builder.associate_material(slab, Some(usage)).unwrap();
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());
    assert_eq!(stream.objects[0].material, "Brick_red");
    assert_eq!(stream.objects[1].material, "ConcreteC25_30");

    let index = writer.material_index();
    assert!(index.contains("IfcWall", "Brick_red", wall));
    assert!(index.contains("IfcSlab", "ConcreteC25_30", slab));
    assert_eq!(
        index.to_json().unwrap(),
        format!(
            r#"{{"IfcSlab":{{"ConcreteC25_30":[{}]}},"IfcWall":{{"Brick_red":[{}]}}}}"#,
            slab.0, wall.0
        )
    );
}

#[test]
fn test_surface_style_overrides_material() {
    let mut builder = ModelBuilder::new();
    let wall = product_with_geometry(&mut builder, IfcType::IfcWall);
    let brick = builder.material(Some("Brick"));
    builder.associate_material(wall, Some(brick)).unwrap();

    let item = builder.item(IfcType::IfcExtrudedAreaSolid);
    builder.representation(wall, &[item]).unwrap();
    let style = builder.surface_style(Some("Red brick"));
    let assignment = builder.style_assignment(&[style]);
    builder.styled_item(Some(item), &[assignment]).unwrap();
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());
    let label = style.0.to_string();
    assert_eq!(stream.objects[0].material, label);
    assert!(writer.material_index().contains("IfcWall", &label, wall));
}

#[test]
fn test_asterisk_normalization_modes() {
    let mut builder = ModelBuilder::new();
    let plate = product_with_geometry(&mut builder, IfcType::IfcPlate);
    let glass = builder.material(Some("Glass*2*3"));
    builder.associate_material(plate, Some(glass)).unwrap();
    let model = builder.build();

    let (_, strict) = serialize(&model, SerializerOptions::default());
    assert_eq!(strict.objects[0].material, "Glass_2_3");

    let (_, legacy) = serialize(&model, SerializerOptions::legacy());
    assert_eq!(legacy.objects[0].material, "Glass_2*3");

    let (_, explicit) = serialize(
        &model,
        SerializerOptions::new().with_name_normalization(NameNormalization::Legacy),
    );
    assert_eq!(explicit.objects[0].material, legacy.objects[0].material);
}

#[test]
fn test_resolution_failure_uses_declared_class() {
    let mut builder = ModelBuilder::new();
    let slab = product_with_geometry(&mut builder, IfcType::IfcSlab);
    builder.set_predefined_type(slab, PredefinedType::Roof).unwrap();
    builder
        .associate_material(slab, Some(ObjectId(9_999)))
        .unwrap();
    let wall = product_with_geometry(&mut builder, IfcType::IfcWall);
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());

    // Fallback is the declared class; the type field keeps the override
    assert_eq!(stream.objects[0].material, "IfcSlab");
    assert_eq!(stream.objects[0].type_name, "IfcRoof");
    assert_eq!(stream.objects[1].material, "IfcWall");

    assert_eq!(writer.stats().material_fallbacks, 1);
    assert_eq!(writer.stats().object_count, 2);
    assert!(!writer.material_index().contains("IfcSlab", "IfcSlab", slab));
    assert!(writer.material_index().contains("IfcWall", "IfcWall", wall));
}

#[test]
fn test_style_cycle_does_not_abort_pass() {
    let mut builder = ModelBuilder::new();
    let beam = product_with_geometry(&mut builder, IfcType::IfcBeam);
    let style = builder.surface_style(None);
    let assignment = builder.style_assignment(&[style]);
    let outer = builder.styled_item(None, &[assignment]).unwrap();
    let inner = builder.styled_item(Some(outer), &[]).unwrap();
    builder.add_styled_by(inner, outer).unwrap();
    builder.representation(beam, &[outer]).unwrap();
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());
    assert_eq!(stream.objects[0].material, style.0.to_string());
    assert_eq!(writer.stats().material_fallbacks, 0);
}

#[test]
fn test_non_ascii_labels_survive() {
    let mut builder = ModelBuilder::new();
    let wall = product_with_geometry(&mut builder, IfcType::IfcWall);
    let material = builder.material(Some("Ziegel Ü\u{0}"));
    builder.associate_material(wall, Some(material)).unwrap();
    let model = builder.build();

    let (_, stream) = serialize(&model, SerializerOptions::default());
    assert_eq!(stream.objects[0].material, "ZiegelÜ\u{0}");
}

#[test]
fn test_blank_material_name_written_empty() {
    let mut builder = ModelBuilder::new();
    let wall = product_with_geometry(&mut builder, IfcType::IfcWall);
    let material = builder.material(Some("  "));
    builder.associate_material(wall, Some(material)).unwrap();
    let model = builder.build();

    let (writer, stream) = serialize(&model, SerializerOptions::default());
    assert_eq!(stream.objects[0].material, "");
    assert!(writer.material_index().contains("IfcWall", "", wall));
}
