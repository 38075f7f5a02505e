// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material label resolution
//!
//! A product's label is derived, in order, from:
//!
//! 1. its class (with predefined-type overrides, e.g. roof slabs),
//! 2. the material of its last `IfcRelAssociatesMaterial` (plain material or
//!    the last layer of a layer set usage),
//! 3. surface styles attached to its representation items.
//!
//! The styling step always runs and overrides a material found in step 2,
//! so products that carry both end up labelled by their surface style id.

use crate::error::ResolveError;
use crate::options::{NameNormalization, SerializerOptions};
use ifc_bgs_model::{Entity, EntityKind, EntityResolver, ObjectId, Product, StyledItem};
use log::warn;
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Qualified name of a material without a name
pub const NULL_NAME: &str = "Null";

type Result<T> = std::result::Result<T, ResolveError>;

/// Turn a material name into a qualified name
///
/// Spaces are removed; `,`, `/` and `*` become `_`. With
/// [`NameNormalization::Legacy`] only the first `*` is replaced.
///
/// # Example
///
/// ```
/// use ifc_bgs::{normalize_name, NameNormalization};
///
/// assert_eq!(normalize_name(Some("Brick, red"), NameNormalization::Strict), "Brick_red");
/// assert_eq!(normalize_name(None, NameNormalization::Strict), "Null");
/// ```
pub fn normalize_name(name: Option<&str>, normalization: NameNormalization) -> String {
    let Some(name) = name else {
        return NULL_NAME.to_string();
    };

    let mut qualified: String = name
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| match c {
            ',' | '/' => '_',
            _ => c,
        })
        .collect();

    match normalization {
        NameNormalization::Strict => qualified = qualified.replace('*', "_"),
        NameNormalization::Legacy => {
            if let Some(pos) = qualified.find('*') {
                qualified.replace_range(pos..pos + 1, "_");
            }
        }
    }
    qualified
}

/// Resolves material labels against an entity graph
///
/// Resolution is pure: recording the result in a
/// [`MaterialIndex`](crate::MaterialIndex) is up to the caller.
pub struct MaterialResolver<'a> {
    resolver: &'a dyn EntityResolver,
    normalization: NameNormalization,
    max_style_depth: usize,
}

impl<'a> MaterialResolver<'a> {
    /// Create a resolver over `resolver` with the given options
    pub fn new(resolver: &'a dyn EntityResolver, options: &SerializerOptions) -> Self {
        Self {
            resolver,
            normalization: options.name_normalization,
            max_style_depth: options.max_style_depth,
        }
    }

    /// Resolve the material label of a product
    pub fn resolve(&self, product: &Product) -> Result<String> {
        let mut label = product.effective_type().name().to_string();

        // Last material association wins, even when it relates nothing
        let mut relating_material = None;
        for rel_id in &product.has_associations {
            let rel = self.fetch(*rel_id)?;
            if let EntityKind::RelAssociatesMaterial {
                relating_material: material,
            } = &rel.kind
            {
                relating_material = *material;
            }
        }

        if let Some(material_id) = relating_material {
            if let Some(name) = self.material_label(material_id)? {
                label = name;
            }
        }

        if let Some(shape_id) = product.representation {
            label = self.style_label(label, shape_id)?;
        }
        Ok(label)
    }

    fn fetch(&self, id: ObjectId) -> Result<Arc<Entity>> {
        self.resolver
            .get(id)
            .ok_or(ResolveError::EntityNotFound(id))
    }

    fn normalize(&self, name: Option<&str>) -> String {
        normalize_name(name, self.normalization)
    }

    /// Normalized name from a material select, if it yields one
    fn material_label(&self, material_id: ObjectId) -> Result<Option<String>> {
        let select = self.fetch(material_id)?;
        match &select.kind {
            EntityKind::MaterialLayerSetUsage(usage) => {
                let Some(set_id) = usage.for_layer_set else {
                    return Ok(None);
                };
                let set = self.fetch(set_id)?;
                let EntityKind::MaterialLayerSet(layer_set) = &set.kind else {
                    return Err(unexpected(&set, "IfcMaterialLayerSet"));
                };

                let mut label = None;
                for layer_id in &layer_set.layers {
                    let layer = self.fetch(*layer_id)?;
                    let EntityKind::MaterialLayer(layer) = &layer.kind else {
                        return Err(unexpected(&layer, "IfcMaterialLayer"));
                    };
                    if let Some(id) = layer.material {
                        label = Some(self.material_name(id)?);
                    }
                }
                Ok(label)
            }
            EntityKind::Material(material) => Ok(Some(self.normalize(material.name.as_deref()))),
            // Material lists and other selects carry no single name
            _ => Ok(None),
        }
    }

    fn material_name(&self, id: ObjectId) -> Result<String> {
        let entity = self.fetch(id)?;
        match &entity.kind {
            EntityKind::Material(material) => Ok(self.normalize(material.name.as_deref())),
            _ => Err(unexpected(&entity, "IfcMaterial")),
        }
    }

    /// Walk representation items and apply their surface styles
    fn style_label(&self, mut label: String, shape_id: ObjectId) -> Result<String> {
        let shape = self.fetch(shape_id)?;
        let EntityKind::ProductRepresentation(shape) = &shape.kind else {
            return Err(unexpected(&shape, "IfcProductRepresentation"));
        };

        let mut ancestors = FxHashSet::default();
        for rep_id in &shape.representations {
            let rep = self.fetch(*rep_id)?;
            let EntityKind::Representation(rep) = &rep.kind else {
                return Err(unexpected(&rep, "IfcRepresentation"));
            };

            for item_id in &rep.items {
                let item = self.fetch(*item_id)?;
                match &item.kind {
                    EntityKind::StyledItem(styled) => {
                        label = self.process_styled_item(label, item.id, styled, &mut ancestors, 0)?;
                    }
                    EntityKind::RepresentationItem(plain) => {
                        for styled_id in &plain.styled_by_item {
                            let styled = self.fetch(*styled_id)?;
                            let Some(styled_item) = styled.as_styled_item() else {
                                return Err(unexpected(&styled, "IfcStyledItem"));
                            };
                            label = self.process_styled_item(
                                label,
                                styled.id,
                                styled_item,
                                &mut ancestors,
                                0,
                            )?;
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(label)
    }

    /// Apply the surface styles of one styled item
    ///
    /// Items styling this one are visited first, but only their errors
    /// matter: labels found below this level are discarded.
    fn process_styled_item(
        &self,
        mut label: String,
        id: ObjectId,
        item: &StyledItem,
        ancestors: &mut FxHashSet<ObjectId>,
        depth: usize,
    ) -> Result<String> {
        if depth > self.max_style_depth {
            return Err(ResolveError::StyleDepthExceeded {
                id,
                limit: self.max_style_depth,
            });
        }

        ancestors.insert(id);
        for nested_id in &item.styled_by_item {
            if ancestors.contains(nested_id) {
                warn!("Styled item cycle through {} at {}, skipping", nested_id, id);
                continue;
            }
            let nested = self.fetch(*nested_id)?;
            let Some(nested_item) = nested.as_styled_item() else {
                return Err(unexpected(&nested, "IfcStyledItem"));
            };
            self.process_styled_item(label.clone(), nested.id, nested_item, ancestors, depth + 1)?;
        }
        ancestors.remove(&id);

        for assignment_id in &item.styles {
            let assignment = self.fetch(*assignment_id)?;
            let EntityKind::PresentationStyleAssignment(assignment) = &assignment.kind else {
                return Err(unexpected(&assignment, "IfcPresentationStyleAssignment"));
            };
            for style_id in &assignment.styles {
                if self.fetch(*style_id)?.is_surface_style() {
                    label = style_id.0.to_string();
                }
            }
        }
        Ok(label)
    }
}

fn unexpected(entity: &Entity, expected: &'static str) -> ResolveError {
    ResolveError::unexpected(entity.id, expected, entity.ifc_type().name())
}
