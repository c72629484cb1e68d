//! Classification axes and preview colors shared by the catalog and the tree.

use std::fmt;

/// One environmental dimension a biome switch can branch on.
///
/// The discriminant is the ordinal used to index every per-axis table
/// ([`SwitchCellParams`](crate::SwitchCellParams), [`SwitchValues`](crate::SwitchValues),
/// [`CoverageReport`](crate::CoverageReport)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// Water presence. Boolean-valued.
    Water = 0,
    /// Terrain height.
    Height = 1,
    /// Surface temperature.
    Temperature = 2,
    /// Surface wetness.
    Wetness = 3,
}

impl Axis {
    /// Number of axes.
    pub const COUNT: usize = 4;

    /// All axes in ordinal order.
    pub const ALL: [Axis; Axis::COUNT] = [
        Axis::Water,
        Axis::Height,
        Axis::Temperature,
        Axis::Wetness,
    ];

    /// Ordinal of this axis.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Axis for an ordinal, or `None` past [`Axis::COUNT`].
    pub fn from_index(index: usize) -> Option<Axis> {
        Self::ALL.get(index).copied()
    }

    /// `true` for axes sampled as a flag rather than a real value.
    pub fn is_boolean(self) -> bool {
        matches!(self, Axis::Water)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::Water => "Water",
            Axis::Height => "Height",
            Axis::Temperature => "Temperature",
            Axis::Wetness => "Wetness",
        };
        f.write_str(name)
    }
}

/// Linear RGBA preview color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Preview color of terrestrial branches.
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Preview color of aquatic branches.
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    /// Default color of a range branch.
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ordinals_match_all() {
        for (i, axis) in Axis::ALL.iter().enumerate() {
            assert_eq!(axis.index(), i);
            assert_eq!(Axis::from_index(i), Some(*axis));
        }
        assert_eq!(Axis::from_index(Axis::COUNT), None);
    }

    #[test]
    fn test_only_water_is_boolean() {
        assert!(Axis::Water.is_boolean());
        assert!(!Axis::Height.is_boolean());
        assert!(!Axis::Temperature.is_boolean());
        assert!(!Axis::Wetness.is_boolean());
    }

    #[test]
    fn test_default_color_is_opaque_black() {
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::BLACK.a, 1.0);
    }
}
