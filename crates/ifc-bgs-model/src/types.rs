// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for building-model objects
//!
//! Identifiers, IFC class names and predefined-type refinements shared by the
//! entity graph and the serializer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe object identifier
///
/// Wraps the stable 64-bit object id assigned by the model store.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        ObjectId(id)
    }
}

impl From<ObjectId> for u64 {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

impl From<ObjectId> for i64 {
    /// Reinterprets the id bits; the wire format stores ids as signed 64-bit.
    fn from(id: ObjectId) -> Self {
        id.0 as i64
    }
}

/// IFC class enumeration
///
/// Covers the product classes that typically carry geometry plus the
/// material and presentation classes walked during material resolution.
/// Unknown classes keep their original name.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum IfcType {
    // ========================================================================
    // Building Elements
    // ========================================================================
    IfcWall,
    IfcWallStandardCase,
    IfcCurtainWall,
    IfcSlab,
    IfcRoof,
    IfcBeam,
    IfcColumn,
    IfcDoor,
    IfcWindow,
    IfcStair,
    IfcStairFlight,
    IfcRamp,
    IfcRampFlight,
    IfcRailing,
    IfcCovering,
    IfcPlate,
    IfcMember,
    IfcFooting,
    IfcPile,
    IfcBuildingElementProxy,
    IfcFurnishingElement,
    IfcFlowTerminal,
    IfcFlowSegment,
    IfcFlowFitting,
    IfcOpeningElement,
    IfcSpace,
    IfcSite,

    // ========================================================================
    // Relationships
    // ========================================================================
    IfcRelAssociatesMaterial,
    IfcRelAssociatesClassification,
    IfcRelAssociatesDocument,

    // ========================================================================
    // Materials
    // ========================================================================
    IfcMaterial,
    IfcMaterialLayer,
    IfcMaterialLayerSet,
    IfcMaterialLayerSetUsage,
    IfcMaterialList,

    // ========================================================================
    // Representation and Presentation
    // ========================================================================
    IfcProductDefinitionShape,
    IfcShapeRepresentation,
    IfcExtrudedAreaSolid,
    IfcFacetedBrep,
    IfcMappedItem,
    IfcStyledItem,
    IfcPresentationStyleAssignment,
    IfcSurfaceStyle,
    IfcCurveStyle,

    /// Unknown type - stores the original type name string
    Unknown(String),
}

impl FromStr for IfcType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl IfcType {
    /// Parse a class name into an IfcType (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "IFCWALL" => IfcType::IfcWall,
            "IFCWALLSTANDARDCASE" => IfcType::IfcWallStandardCase,
            "IFCCURTAINWALL" => IfcType::IfcCurtainWall,
            "IFCSLAB" => IfcType::IfcSlab,
            "IFCROOF" => IfcType::IfcRoof,
            "IFCBEAM" => IfcType::IfcBeam,
            "IFCCOLUMN" => IfcType::IfcColumn,
            "IFCDOOR" => IfcType::IfcDoor,
            "IFCWINDOW" => IfcType::IfcWindow,
            "IFCSTAIR" => IfcType::IfcStair,
            "IFCSTAIRFLIGHT" => IfcType::IfcStairFlight,
            "IFCRAMP" => IfcType::IfcRamp,
            "IFCRAMPFLIGHT" => IfcType::IfcRampFlight,
            "IFCRAILING" => IfcType::IfcRailing,
            "IFCCOVERING" => IfcType::IfcCovering,
            "IFCPLATE" => IfcType::IfcPlate,
            "IFCMEMBER" => IfcType::IfcMember,
            "IFCFOOTING" => IfcType::IfcFooting,
            "IFCPILE" => IfcType::IfcPile,
            "IFCBUILDINGELEMENTPROXY" => IfcType::IfcBuildingElementProxy,
            "IFCFURNISHINGELEMENT" => IfcType::IfcFurnishingElement,
            "IFCFLOWTERMINAL" => IfcType::IfcFlowTerminal,
            "IFCFLOWSEGMENT" => IfcType::IfcFlowSegment,
            "IFCFLOWFITTING" => IfcType::IfcFlowFitting,
            "IFCOPENINGELEMENT" => IfcType::IfcOpeningElement,
            "IFCSPACE" => IfcType::IfcSpace,
            "IFCSITE" => IfcType::IfcSite,

            "IFCRELASSOCIATESMATERIAL" => IfcType::IfcRelAssociatesMaterial,
            "IFCRELASSOCIATESCLASSIFICATION" => IfcType::IfcRelAssociatesClassification,
            "IFCRELASSOCIATESDOCUMENT" => IfcType::IfcRelAssociatesDocument,

            "IFCMATERIAL" => IfcType::IfcMaterial,
            "IFCMATERIALLAYER" => IfcType::IfcMaterialLayer,
            "IFCMATERIALLAYERSET" => IfcType::IfcMaterialLayerSet,
            "IFCMATERIALLAYERSETUSAGE" => IfcType::IfcMaterialLayerSetUsage,
            "IFCMATERIALLIST" => IfcType::IfcMaterialList,

            "IFCPRODUCTDEFINITIONSHAPE" => IfcType::IfcProductDefinitionShape,
            "IFCSHAPEREPRESENTATION" => IfcType::IfcShapeRepresentation,
            "IFCEXTRUDEDAREASOLID" => IfcType::IfcExtrudedAreaSolid,
            "IFCFACETEDBREP" => IfcType::IfcFacetedBrep,
            "IFCMAPPEDITEM" => IfcType::IfcMappedItem,
            "IFCSTYLEDITEM" => IfcType::IfcStyledItem,
            "IFCPRESENTATIONSTYLEASSIGNMENT" => IfcType::IfcPresentationStyleAssignment,
            "IFCSURFACESTYLE" => IfcType::IfcSurfaceStyle,
            "IFCCURVESTYLE" => IfcType::IfcCurveStyle,

            _ => IfcType::Unknown(s.to_string()),
        }
    }

    /// Class name in schema case (e.g. `"IfcSlab"`)
    ///
    /// This is the form written to the binary stream and used as the key of
    /// the material index.
    pub fn name(&self) -> &str {
        match self {
            IfcType::IfcWall => "IfcWall",
            IfcType::IfcWallStandardCase => "IfcWallStandardCase",
            IfcType::IfcCurtainWall => "IfcCurtainWall",
            IfcType::IfcSlab => "IfcSlab",
            IfcType::IfcRoof => "IfcRoof",
            IfcType::IfcBeam => "IfcBeam",
            IfcType::IfcColumn => "IfcColumn",
            IfcType::IfcDoor => "IfcDoor",
            IfcType::IfcWindow => "IfcWindow",
            IfcType::IfcStair => "IfcStair",
            IfcType::IfcStairFlight => "IfcStairFlight",
            IfcType::IfcRamp => "IfcRamp",
            IfcType::IfcRampFlight => "IfcRampFlight",
            IfcType::IfcRailing => "IfcRailing",
            IfcType::IfcCovering => "IfcCovering",
            IfcType::IfcPlate => "IfcPlate",
            IfcType::IfcMember => "IfcMember",
            IfcType::IfcFooting => "IfcFooting",
            IfcType::IfcPile => "IfcPile",
            IfcType::IfcBuildingElementProxy => "IfcBuildingElementProxy",
            IfcType::IfcFurnishingElement => "IfcFurnishingElement",
            IfcType::IfcFlowTerminal => "IfcFlowTerminal",
            IfcType::IfcFlowSegment => "IfcFlowSegment",
            IfcType::IfcFlowFitting => "IfcFlowFitting",
            IfcType::IfcOpeningElement => "IfcOpeningElement",
            IfcType::IfcSpace => "IfcSpace",
            IfcType::IfcSite => "IfcSite",
            IfcType::IfcRelAssociatesMaterial => "IfcRelAssociatesMaterial",
            IfcType::IfcRelAssociatesClassification => "IfcRelAssociatesClassification",
            IfcType::IfcRelAssociatesDocument => "IfcRelAssociatesDocument",
            IfcType::IfcMaterial => "IfcMaterial",
            IfcType::IfcMaterialLayer => "IfcMaterialLayer",
            IfcType::IfcMaterialLayerSet => "IfcMaterialLayerSet",
            IfcType::IfcMaterialLayerSetUsage => "IfcMaterialLayerSetUsage",
            IfcType::IfcMaterialList => "IfcMaterialList",
            IfcType::IfcProductDefinitionShape => "IfcProductDefinitionShape",
            IfcType::IfcShapeRepresentation => "IfcShapeRepresentation",
            IfcType::IfcExtrudedAreaSolid => "IfcExtrudedAreaSolid",
            IfcType::IfcFacetedBrep => "IfcFacetedBrep",
            IfcType::IfcMappedItem => "IfcMappedItem",
            IfcType::IfcStyledItem => "IfcStyledItem",
            IfcType::IfcPresentationStyleAssignment => "IfcPresentationStyleAssignment",
            IfcType::IfcSurfaceStyle => "IfcSurfaceStyle",
            IfcType::IfcCurveStyle => "IfcCurveStyle",
            IfcType::Unknown(s) => s,
        }
    }

    /// Check if this type is a product class that can carry geometry
    pub fn is_product(&self) -> bool {
        matches!(
            self,
            IfcType::IfcWall
                | IfcType::IfcWallStandardCase
                | IfcType::IfcCurtainWall
                | IfcType::IfcSlab
                | IfcType::IfcRoof
                | IfcType::IfcBeam
                | IfcType::IfcColumn
                | IfcType::IfcDoor
                | IfcType::IfcWindow
                | IfcType::IfcStair
                | IfcType::IfcStairFlight
                | IfcType::IfcRamp
                | IfcType::IfcRampFlight
                | IfcType::IfcRailing
                | IfcType::IfcCovering
                | IfcType::IfcPlate
                | IfcType::IfcMember
                | IfcType::IfcFooting
                | IfcType::IfcPile
                | IfcType::IfcBuildingElementProxy
                | IfcType::IfcFurnishingElement
                | IfcType::IfcFlowTerminal
                | IfcType::IfcFlowSegment
                | IfcType::IfcFlowFitting
                | IfcType::IfcOpeningElement
                | IfcType::IfcSpace
                | IfcType::IfcSite
        )
    }
}

impl Default for IfcType {
    fn default() -> Self {
        IfcType::Unknown(String::new())
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Predefined-type refinement of a product (`.ROOF.`, `.FLOOR.`, ...)
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PredefinedType {
    Floor,
    Roof,
    Landing,
    BaseSlab,
    UserDefined,
    NotDefined,
    /// Any other enumeration literal, upper-cased without dots
    Other(String),
}

impl PredefinedType {
    /// Parse an enumeration literal, with or without the STEP dots
    pub fn parse(s: &str) -> Self {
        let literal = s.trim().trim_matches('.').to_uppercase();
        match literal.as_str() {
            "FLOOR" => PredefinedType::Floor,
            "ROOF" => PredefinedType::Roof,
            "LANDING" => PredefinedType::Landing,
            "BASESLAB" => PredefinedType::BaseSlab,
            "USERDEFINED" => PredefinedType::UserDefined,
            "NOTDEFINED" => PredefinedType::NotDefined,
            _ => PredefinedType::Other(literal),
        }
    }
}

impl FromStr for PredefinedType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Effective class for a declared class and predefined type
///
/// Some renderers group objects by a class that IFC expresses as a
/// predefined type of another class. Returns `None` when no override applies.
pub fn type_override(ifc_type: &IfcType, predefined: Option<&PredefinedType>) -> Option<IfcType> {
    match (ifc_type, predefined?) {
        (IfcType::IfcSlab, PredefinedType::Roof) => Some(IfcType::IfcRoof),
        _ => None,
    }
}
