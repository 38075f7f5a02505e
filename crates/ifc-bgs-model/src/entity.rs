// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity graph for products, materials and presentation styles
//!
//! Entities reference each other by [`ObjectId`] and are looked up through an
//! [`EntityResolver`](crate::EntityResolver). Inverse relations such as
//! `HasAssociations` and `StyledByItem` are stored explicitly on the entity
//! that owns them, so back-reference cycles are representable.

use crate::{IfcType, ObjectId, PredefinedType};
use serde::{Deserialize, Serialize};

/// Product: a building element that may carry geometry
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Declared IFC class
    pub ifc_type: IfcType,
    /// Name attribute
    pub name: Option<String>,
    /// Predefined-type refinement
    pub predefined_type: Option<PredefinedType>,
    /// Inverse `HasAssociations` (relationship entities, in model order)
    pub has_associations: Vec<ObjectId>,
    /// `Representation` (a product definition shape)
    pub representation: Option<ObjectId>,
}

impl Product {
    /// Create a product of the given class
    pub fn new(ifc_type: IfcType) -> Self {
        Self {
            ifc_type,
            ..Default::default()
        }
    }

    /// Class used for grouping, with predefined-type overrides applied
    pub fn effective_type(&self) -> IfcType {
        crate::type_override(&self.ifc_type, self.predefined_type.as_ref())
            .unwrap_or_else(|| self.ifc_type.clone())
    }
}

/// IfcMaterial
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: Option<String>,
}

/// IfcMaterialLayer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayer {
    pub material: Option<ObjectId>,
    pub thickness: f64,
}

/// IfcMaterialLayerSet
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayerSet {
    pub layers: Vec<ObjectId>,
    pub name: Option<String>,
}

/// IfcMaterialLayerSetUsage
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialLayerSetUsage {
    pub for_layer_set: Option<ObjectId>,
}

/// IfcProductDefinitionShape
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRepresentation {
    pub representations: Vec<ObjectId>,
}

/// IfcShapeRepresentation
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Representation {
    pub items: Vec<ObjectId>,
}

/// Geometric representation item (extrusion, brep, mapped item, ...)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RepresentationItem {
    pub ifc_type: IfcType,
    /// Inverse `StyledByItem`
    pub styled_by_item: Vec<ObjectId>,
}

/// IfcStyledItem
///
/// A styled item is itself a representation item and can in turn be styled.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StyledItem {
    /// Item being styled
    pub item: Option<ObjectId>,
    /// Presentation style assignments
    pub styles: Vec<ObjectId>,
    /// Inverse `StyledByItem`
    pub styled_by_item: Vec<ObjectId>,
}

/// IfcPresentationStyleAssignment
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationStyleAssignment {
    /// Style selections (surface styles, curve styles, ...)
    pub styles: Vec<ObjectId>,
}

/// IfcSurfaceStyle
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceStyle {
    pub name: Option<String>,
}

/// Typed entity payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Product(Product),
    RelAssociatesMaterial { relating_material: Option<ObjectId> },
    /// Any association other than a material association
    RelAssociates(IfcType),
    Material(Material),
    MaterialLayer(MaterialLayer),
    MaterialLayerSet(MaterialLayerSet),
    MaterialLayerSetUsage(MaterialLayerSetUsage),
    ProductRepresentation(ProductRepresentation),
    Representation(Representation),
    RepresentationItem(RepresentationItem),
    StyledItem(StyledItem),
    PresentationStyleAssignment(PresentationStyleAssignment),
    SurfaceStyle(SurfaceStyle),
    /// Entity the serializer does not interpret
    Other(IfcType),
}

/// Entity stored in a model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Object ID
    pub id: ObjectId,
    /// Typed payload
    pub kind: EntityKind,
}

impl Entity {
    /// Create an entity
    pub fn new(id: ObjectId, kind: EntityKind) -> Self {
        Self { id, kind }
    }

    /// IFC class of this entity
    pub fn ifc_type(&self) -> IfcType {
        match &self.kind {
            EntityKind::Product(p) => p.ifc_type.clone(),
            EntityKind::RelAssociatesMaterial { .. } => IfcType::IfcRelAssociatesMaterial,
            EntityKind::RelAssociates(t) => t.clone(),
            EntityKind::Material(_) => IfcType::IfcMaterial,
            EntityKind::MaterialLayer(_) => IfcType::IfcMaterialLayer,
            EntityKind::MaterialLayerSet(_) => IfcType::IfcMaterialLayerSet,
            EntityKind::MaterialLayerSetUsage(_) => IfcType::IfcMaterialLayerSetUsage,
            EntityKind::ProductRepresentation(_) => IfcType::IfcProductDefinitionShape,
            EntityKind::Representation(_) => IfcType::IfcShapeRepresentation,
            EntityKind::RepresentationItem(item) => item.ifc_type.clone(),
            EntityKind::StyledItem(_) => IfcType::IfcStyledItem,
            EntityKind::PresentationStyleAssignment(_) => IfcType::IfcPresentationStyleAssignment,
            EntityKind::SurfaceStyle(_) => IfcType::IfcSurfaceStyle,
            EntityKind::Other(t) => t.clone(),
        }
    }

    /// Try to get as product
    pub fn as_product(&self) -> Option<&Product> {
        match &self.kind {
            EntityKind::Product(p) => Some(p),
            _ => None,
        }
    }

    /// Try to get as styled item
    pub fn as_styled_item(&self) -> Option<&StyledItem> {
        match &self.kind {
            EntityKind::StyledItem(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this entity is a surface style
    pub fn is_surface_style(&self) -> bool {
        matches!(self.kind, EntityKind::SurfaceStyle(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_type() {
        let mut slab = Product::new(IfcType::IfcSlab);
        assert_eq!(slab.effective_type(), IfcType::IfcSlab);

        slab.predefined_type = Some(PredefinedType::Roof);
        assert_eq!(slab.effective_type(), IfcType::IfcRoof);
        // Declared class is untouched
        assert_eq!(slab.ifc_type, IfcType::IfcSlab);
    }

    #[test]
    fn test_entity_ifc_type() {
        let entity = Entity::new(
            ObjectId(7),
            EntityKind::RelAssociatesMaterial {
                relating_material: None,
            },
        );
        assert_eq!(entity.ifc_type(), IfcType::IfcRelAssociatesMaterial);
        assert!(entity.as_product().is_none());

        let style = Entity::new(ObjectId(8), EntityKind::SurfaceStyle(SurfaceStyle::default()));
        assert!(style.is_surface_style());
    }
}
