//! Partial biome records produced for every leaf reached while compiling.

use std::fmt;

use crate::axis::Color;

/// Sequential identifier of a leaf biome within one compiled tree.
///
/// Ids are handed out in creation order starting at `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BiomeId(pub u16);

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Id, name and preview color of one biome, independent of any material data.
#[derive(Clone, Debug, PartialEq)]
pub struct PartialBiome {
    pub id: BiomeId,
    pub name: String,
    pub preview_color: Color,
}
