// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory model store
//!
//! [`ModelBuilder`] assembles an entity graph and wires the inverse relations
//! (`HasAssociations`, `StyledByItem`) the way a model store exposes them.
//! [`InMemoryModel`] is the immutable result implementing [`BuildingModel`].

use crate::{
    BuildingModel, Entity, EntityKind, EntityResolver, GeometryInfo, GeometrySource, IfcType,
    Material, MaterialLayer, MaterialLayerSet, MaterialLayerSetUsage, ModelError, ObjectId,
    PredefinedType, PresentationStyleAssignment, Product, ProductRepresentation, Representation,
    RepresentationItem, Result, StyledItem, SurfaceStyle,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Immutable in-memory model
#[derive(Debug, Default)]
pub struct InMemoryModel {
    /// Entity ID -> entity
    entities: FxHashMap<ObjectId, Arc<Entity>>,
    /// Insertion order
    order: Vec<ObjectId>,
    /// Type -> entity IDs index
    type_index: FxHashMap<IfcType, Vec<ObjectId>>,
    /// Product ID -> geometry record
    geometry: FxHashMap<ObjectId, Arc<GeometryInfo>>,
}

impl InMemoryModel {
    /// Start building a model
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }
}

impl EntityResolver for InMemoryModel {
    fn get(&self, id: ObjectId) -> Option<Arc<Entity>> {
        self.entities.get(&id).cloned()
    }

    fn entities_by_type(&self, ifc_type: &IfcType) -> Vec<Arc<Entity>> {
        self.type_index
            .get(ifc_type)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }

    fn all_ids(&self) -> Vec<ObjectId> {
        self.order.clone()
    }

    fn entity_count(&self) -> usize {
        self.order.len()
    }
}

impl GeometrySource for InMemoryModel {
    fn get_geometry(&self, id: ObjectId) -> Option<Arc<GeometryInfo>> {
        self.geometry.get(&id).cloned()
    }
}

impl BuildingModel for InMemoryModel {
    fn resolver(&self) -> &dyn EntityResolver {
        self
    }

    fn geometry(&self) -> &dyn GeometrySource {
        self
    }

    fn products(&self) -> Vec<Arc<Entity>> {
        self.order
            .iter()
            .filter_map(|id| self.entities.get(id))
            .filter(|entity| entity.as_product().is_some())
            .cloned()
            .collect()
    }
}

/// Builder for [`InMemoryModel`]
///
/// Ids are allocated sequentially starting at 1 unless given explicitly.
#[derive(Debug)]
pub struct ModelBuilder {
    entities: FxHashMap<ObjectId, Entity>,
    order: Vec<ObjectId>,
    geometry: FxHashMap<ObjectId, Arc<GeometryInfo>>,
    next_id: u64,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            entities: FxHashMap::default(),
            order: Vec::new(),
            geometry: FxHashMap::default(),
            next_id: 1,
        }
    }

    /// Add an entity with the next free id
    pub fn add(&mut self, kind: EntityKind) -> ObjectId {
        while self.entities.contains_key(&ObjectId(self.next_id)) {
            self.next_id += 1;
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.insert(id, kind);
        id
    }

    /// Add an entity with an explicit id
    pub fn add_with_id(&mut self, id: ObjectId, kind: EntityKind) -> Result<ObjectId> {
        if self.entities.contains_key(&id) {
            return Err(ModelError::DuplicateEntity(id));
        }
        self.insert(id, kind);
        Ok(id)
    }

    fn insert(&mut self, id: ObjectId, kind: EntityKind) {
        self.entities.insert(id, Entity::new(id, kind));
        self.order.push(id);
    }

    fn get_mut(&mut self, id: ObjectId) -> Result<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(ModelError::EntityNotFound(id))
    }

    fn product_mut(&mut self, id: ObjectId) -> Result<&mut Product> {
        let entity = self.get_mut(id)?;
        let actual = entity.ifc_type();
        match &mut entity.kind {
            EntityKind::Product(product) => Ok(product),
            _ => Err(ModelError::invalid_reference(id, id, "product", actual.name())),
        }
    }

    // ========================================================================
    // Products
    // ========================================================================

    /// Add a product of the given class
    pub fn product(&mut self, ifc_type: IfcType) -> ObjectId {
        self.add(EntityKind::Product(Product::new(ifc_type)))
    }

    /// Set the predefined type of a product
    pub fn set_predefined_type(
        &mut self,
        product: ObjectId,
        predefined: PredefinedType,
    ) -> Result<()> {
        self.product_mut(product)?.predefined_type = Some(predefined);
        Ok(())
    }

    /// Attach a geometry record to a product
    pub fn set_geometry(&mut self, product: ObjectId, geometry: GeometryInfo) -> Result<()> {
        self.product_mut(product)?;
        self.geometry.insert(product, Arc::new(geometry));
        Ok(())
    }

    // ========================================================================
    // Materials
    // ========================================================================

    /// Add an IfcMaterial
    pub fn material(&mut self, name: Option<&str>) -> ObjectId {
        self.add(EntityKind::Material(Material {
            name: name.map(str::to_string),
        }))
    }

    /// Add a layer set usage with one layer per entry
    ///
    /// `None` entries become layers without a material.
    pub fn layer_set_usage(&mut self, layer_materials: &[Option<ObjectId>]) -> ObjectId {
        let layers = layer_materials
            .iter()
            .map(|material| {
                self.add(EntityKind::MaterialLayer(MaterialLayer {
                    material: *material,
                    thickness: 0.0,
                }))
            })
            .collect();
        let layer_set = self.add(EntityKind::MaterialLayerSet(MaterialLayerSet {
            layers,
            name: None,
        }));
        self.add(EntityKind::MaterialLayerSetUsage(MaterialLayerSetUsage {
            for_layer_set: Some(layer_set),
        }))
    }

    /// Associate a material select with a product via IfcRelAssociatesMaterial
    pub fn associate_material(
        &mut self,
        product: ObjectId,
        relating_material: Option<ObjectId>,
    ) -> Result<ObjectId> {
        self.product_mut(product)?;
        let rel = self.add(EntityKind::RelAssociatesMaterial { relating_material });
        self.product_mut(product)?.has_associations.push(rel);
        Ok(rel)
    }

    /// Associate a non-material relationship (classification, document, ...)
    pub fn associate_other(&mut self, product: ObjectId, ifc_type: IfcType) -> Result<ObjectId> {
        self.product_mut(product)?;
        let rel = self.add(EntityKind::RelAssociates(ifc_type));
        self.product_mut(product)?.has_associations.push(rel);
        Ok(rel)
    }

    // ========================================================================
    // Representation and presentation
    // ========================================================================

    /// Add a geometric representation item
    pub fn item(&mut self, ifc_type: IfcType) -> ObjectId {
        self.add(EntityKind::RepresentationItem(RepresentationItem {
            ifc_type,
            styled_by_item: Vec::new(),
        }))
    }

    /// Add a shape representation holding `items` to a product
    ///
    /// Creates the product definition shape on first use.
    pub fn representation(&mut self, product: ObjectId, items: &[ObjectId]) -> Result<ObjectId> {
        let shape = match self.product_mut(product)?.representation {
            Some(shape) => shape,
            None => {
                let shape = self.add(EntityKind::ProductRepresentation(
                    ProductRepresentation::default(),
                ));
                self.product_mut(product)?.representation = Some(shape);
                shape
            }
        };
        let representation = self.add(EntityKind::Representation(Representation {
            items: items.to_vec(),
        }));
        match &mut self.get_mut(shape)?.kind {
            EntityKind::ProductRepresentation(pr) => pr.representations.push(representation),
            other => {
                let actual = format!("{:?}", other);
                return Err(ModelError::invalid_reference(
                    product,
                    shape,
                    "product definition shape",
                    actual,
                ));
            }
        }
        Ok(representation)
    }

    /// Add an IfcSurfaceStyle
    pub fn surface_style(&mut self, name: Option<&str>) -> ObjectId {
        self.add(EntityKind::SurfaceStyle(SurfaceStyle {
            name: name.map(str::to_string),
        }))
    }

    /// Add an IfcPresentationStyleAssignment
    pub fn style_assignment(&mut self, styles: &[ObjectId]) -> ObjectId {
        self.add(EntityKind::PresentationStyleAssignment(
            PresentationStyleAssignment {
                styles: styles.to_vec(),
            },
        ))
    }

    /// Add an IfcStyledItem
    ///
    /// When `item` is given, the styled item is appended to that item's
    /// inverse `StyledByItem` list. The target may itself be a styled item.
    pub fn styled_item(&mut self, item: Option<ObjectId>, styles: &[ObjectId]) -> Result<ObjectId> {
        if let Some(target) = item {
            self.get_mut(target)?;
        }
        let styled = self.add(EntityKind::StyledItem(StyledItem {
            item,
            styles: styles.to_vec(),
            styled_by_item: Vec::new(),
        }));
        if let Some(target) = item {
            self.add_styled_by(target, styled)?;
        }
        Ok(styled)
    }

    /// Append `styled` to the inverse `StyledByItem` list of `target`
    ///
    /// Exposed so that graphs with back-reference cycles can be built.
    pub fn add_styled_by(&mut self, target: ObjectId, styled: ObjectId) -> Result<()> {
        let entity = self.get_mut(target)?;
        let actual = entity.ifc_type();
        match &mut entity.kind {
            EntityKind::RepresentationItem(item) => item.styled_by_item.push(styled),
            EntityKind::StyledItem(item) => item.styled_by_item.push(styled),
            _ => {
                return Err(ModelError::invalid_reference(
                    styled,
                    target,
                    "representation item",
                    actual.name(),
                ))
            }
        }
        Ok(())
    }

    /// Finish the model
    pub fn build(self) -> InMemoryModel {
        let mut type_index: FxHashMap<IfcType, Vec<ObjectId>> = FxHashMap::default();
        let mut entities = FxHashMap::default();
        entities.reserve(self.entities.len());

        for (id, entity) in self.entities {
            entities.insert(id, Arc::new(entity));
        }
        for id in &self.order {
            if let Some(entity) = entities.get(id) {
                type_index.entry(entity.ifc_type()).or_default().push(*id);
            }
        }

        InMemoryModel {
            entities,
            order: self.order,
            type_index,
            geometry: self.geometry,
        }
    }
}
