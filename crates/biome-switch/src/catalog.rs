//! Range catalog: authoring-time multi-axis ranges and the checks used to
//! validate them (overlap, gap width, weight, point match).
//!
//! The catalog is independent of [`SwitchTree`](crate::SwitchTree). Its point
//! match is inclusive on both ends while the tree matches `(min, max]`.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::axis::{Axis, Color};

/// `true` if the closed intervals `[a_min, a_max]` and `[b_min, b_max]` intersect.
pub fn overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min <= b_max && b_min <= a_max
}

/// Signed distance between two intervals.
///
/// Positive: width of the empty space between disjoint intervals.
/// Zero: the intervals touch. Negative: length of the shared part.
pub fn gap_width(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> f32 {
    a_min.max(b_min) - a_max.min(b_max)
}

/// One authored constraint on one axis. Disabled params always match.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchCellParam {
    pub enabled: bool,
    pub min: f32,
    pub max: f32,
}

impl SwitchCellParam {
    /// "Don't care" constraint.
    pub const DISABLED: SwitchCellParam = SwitchCellParam {
        enabled: false,
        min: 0.0,
        max: 0.0,
    };

    /// Enabled constraint over `[min, max]`.
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            enabled: true,
            min,
            max,
        }
    }

    /// Enabled constraint for a boolean axis: `[1, 1]` when set, `[0, 0]` otherwise.
    pub fn flag(value: bool) -> Self {
        let v = if value { 1.0 } else { 0.0 };
        Self::new(v, v)
    }

    /// Inclusive containment test; disabled params contain everything.
    pub fn contains(&self, value: f32) -> bool {
        !self.enabled || (value >= self.min && value <= self.max)
    }
}

impl Default for SwitchCellParam {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// One [`SwitchCellParam`] per [`Axis`], indexed by axis ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwitchCellParams {
    params: [SwitchCellParam; Axis::COUNT],
}

impl SwitchCellParams {
    /// All axes disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for one axis.
    pub fn with(mut self, axis: Axis, param: SwitchCellParam) -> Self {
        self[axis] = param;
        self
    }

    /// Number of entries, always [`Axis::COUNT`].
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Always `false`; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates `(axis, param)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, &SwitchCellParam)> {
        Axis::ALL.into_iter().zip(self.params.iter())
    }

    /// `true` iff every axis enabled on both sides has intersecting intervals.
    ///
    /// An axis enabled on only one side never prevents an overlap.
    pub fn overlaps(&self, other: &SwitchCellParams) -> bool {
        self.params.iter().zip(other.params.iter()).all(|(a, b)| {
            !(a.enabled && b.enabled) || overlap(a.min, a.max, b.min, b.max)
        })
    }

    /// `true` iff every enabled axis contains the matching value of `values`.
    pub fn matches(&self, values: &SwitchValues) -> bool {
        self.iter().all(|(axis, p)| p.contains(values[axis]))
    }
}

impl Index<Axis> for SwitchCellParams {
    type Output = SwitchCellParam;

    fn index(&self, axis: Axis) -> &SwitchCellParam {
        &self.params[axis.index()]
    }
}

impl IndexMut<Axis> for SwitchCellParams {
    fn index_mut(&mut self, axis: Axis) -> &mut SwitchCellParam {
        &mut self.params[axis.index()]
    }
}

/// Raw ordinal access. Panics past [`Axis::COUNT`].
impl Index<usize> for SwitchCellParams {
    type Output = SwitchCellParam;

    fn index(&self, index: usize) -> &SwitchCellParam {
        &self.params[index]
    }
}

impl IndexMut<usize> for SwitchCellParams {
    fn index_mut(&mut self, index: usize) -> &mut SwitchCellParam {
        &mut self.params[index]
    }
}

/// A sampled point: one value per axis. Water is stored as `0.0` / `1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SwitchValues {
    values: [f32; Axis::COUNT],
}

impl SwitchValues {
    /// Point to test; `water` is stored as `1.0` or `0.0`.
    pub fn new(water: bool, height: f32, temperature: f32, wetness: f32) -> Self {
        Self {
            values: [if water { 1.0 } else { 0.0 }, height, temperature, wetness],
        }
    }

    /// Boolean reading of an axis (non-zero is `true`).
    pub fn flag(&self, axis: Axis) -> bool {
        self[axis] != 0.0
    }
}

impl Index<Axis> for SwitchValues {
    type Output = f32;

    fn index(&self, axis: Axis) -> &f32 {
        &self.values[axis.index()]
    }
}

impl Index<usize> for SwitchValues {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.values[index]
    }
}

/// Global `(low, high)` span of every axis, used to scale [`SwitchCell::weight`].
pub type AxisSpans = [(f32, f32); Axis::COUNT];

/// A named multi-axis range authored in the switch graph editor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SwitchCell {
    pub name: String,
    pub weight: f32,
    pub color: Color,
    pub id: u16,
    pub params: SwitchCellParams,
    /// Authoring-time neighbours, as indices into the owning [`SwitchCatalog`].
    pub links: Vec<usize>,
}

impl SwitchCell {
    /// Cell with default weight and color and no links.
    pub fn new(name: impl Into<String>, params: SwitchCellParams) -> Self {
        Self {
            name: name.into(),
            params,
            ..Self::default()
        }
    }

    /// See [`SwitchCellParams::overlaps`].
    pub fn overlaps(&self, other: &SwitchCellParams) -> bool {
        self.params.overlaps(other)
    }

    /// Ranking heuristic between competing cells.
    ///
    /// Enabled axes with a non-zero span add `max - min / magnitude`, where
    /// magnitude is the length of the span vector; every other axis adds `1`.
    /// The expression is kept as authored, without grouping `max - min`.
    pub fn weight(&self, spans: &AxisSpans) -> f32 {
        self.params
            .iter()
            .map(|(axis, p)| {
                let (low, high) = spans[axis.index()];
                let magnitude = low.hypot(high);
                if p.enabled && magnitude != 0.0 {
                    p.max - p.min / magnitude
                } else {
                    1.0
                }
            })
            .sum()
    }

    /// Sum of [`gap_width`] over the axes enabled on `self`.
    pub fn gap_width(&self, other: &SwitchCell) -> f32 {
        self.params
            .iter()
            .filter(|(_, p)| p.enabled)
            .map(|(axis, a)| {
                let b = &other.params[axis];
                gap_width(a.min, a.max, b.min, b.max)
            })
            .sum()
    }

    /// Inclusive point test over the enabled axes.
    pub fn matches(&self, values: &SwitchValues) -> bool {
        self.params.matches(values)
    }
}

impl fmt::Display for SwitchCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =", self.name)?;
        for (axis, p) in self.params.iter().filter(|(_, p)| p.enabled) {
            write!(f, " {axis}: {}->{}", p.min, p.max)?;
        }
        Ok(())
    }
}

/// Errors raised while filling a [`SwitchCatalog`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Every `u16` cell id is already taken.
    #[error("catalog is full ({capacity} cells)")]
    Full { capacity: usize },
}

/// Owning list of [`SwitchCell`]s with whole-catalog validation helpers.
#[derive(Clone, Debug, Default)]
pub struct SwitchCatalog {
    cells: Vec<SwitchCell>,
}

impl SwitchCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell, stamping its `id` with its position. Returns that index.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Full`] once all `u16` ids are in use.
    pub fn push(&mut self, mut cell: SwitchCell) -> Result<usize, CatalogError> {
        let index = self.cells.len();
        let Ok(id) = u16::try_from(index) else {
            return Err(CatalogError::Full { capacity: index });
        };
        cell.id = id;
        self.cells.push(cell);
        Ok(index)
    }

    /// Records an undirected authoring edge between two cells.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn link(&mut self, a: usize, b: usize) {
        assert!(b < self.cells.len(), "link target {b} out of range");
        if !self.cells[a].links.contains(&b) {
            self.cells[a].links.push(b);
        }
        if !self.cells[b].links.contains(&a) {
            self.cells[b].links.push(a);
        }
    }

    /// Cell at `index`.
    pub fn get(&self, index: usize) -> Option<&SwitchCell> {
        self.cells.get(index)
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> &[SwitchCell] {
        &self.cells
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if no cell was pushed.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Union of every enabled interval, per axis. Axes never enabled span `(0, 0)`.
    pub fn axis_spans(&self) -> AxisSpans {
        let mut spans = [(0.0, 0.0); Axis::COUNT];
        for axis in Axis::ALL {
            let mut enabled = self
                .cells
                .iter()
                .map(|c| c.params[axis])
                .filter(|p| p.enabled);
            if let Some(first) = enabled.next() {
                spans[axis.index()] = enabled.fold((first.min, first.max), |(lo, hi), p| {
                    (lo.min(p.min), hi.max(p.max))
                });
            }
        }
        spans
    }

    /// Every pair `(i, j)`, `i < j`, whose ranges compete for the same points.
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.cells.iter().enumerate() {
            for (j, b) in self.cells.iter().enumerate().skip(i + 1) {
                if a.overlaps(&b.params) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// First cell whose ranges contain the point.
    pub fn find_match(&self, values: &SwitchValues) -> Option<&SwitchCell> {
        self.cells.iter().find(|c| c.matches(values))
    }
}
