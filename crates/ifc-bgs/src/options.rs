// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializer configuration

use serde::{Deserialize, Serialize};

/// Format version written by default
pub const FORMAT_VERSION: u8 = 3;

/// First format version that bakes transforms into vertex buffers
pub const TRANSFORM_VERSION: u8 = 4;

/// How material names are turned into qualified names
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NameNormalization {
    /// Every `*` becomes `_`
    #[default]
    Strict,
    /// Only the first `*` becomes `_`, matching streams produced by older
    /// serializers
    Legacy,
}

/// Serializer options
///
/// # Example
///
/// ```ignore
/// use ifc_bgs::SerializerOptions;
///
/// let options = SerializerOptions::new().with_max_style_depth(16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerOptions {
    /// Version byte written to the header
    pub format_version: u8,
    /// Material name normalization
    pub name_normalization: NameNormalization,
    /// Maximum nesting of styled items followed during material resolution
    pub max_style_depth: usize,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SerializerOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            name_normalization: NameNormalization::Strict,
            max_style_depth: 64,
        }
    }

    /// Options reproducing legacy label output byte for byte
    pub fn legacy() -> Self {
        Self::new().with_name_normalization(NameNormalization::Legacy)
    }

    /// Set the format version
    pub fn with_format_version(mut self, version: u8) -> Self {
        self.format_version = version;
        self
    }

    /// Set the name normalization
    pub fn with_name_normalization(mut self, normalization: NameNormalization) -> Self {
        self.name_normalization = normalization;
        self
    }

    /// Set the maximum styled-item depth
    pub fn with_max_style_depth(mut self, depth: usize) -> Self {
        self.max_style_depth = depth;
        self
    }

    /// Whether vertex buffers are transformed to world coordinates
    pub fn bakes_transforms(&self) -> bool {
        self.format_version >= TRANSFORM_VERSION
    }
}
