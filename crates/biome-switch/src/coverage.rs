//! Per-axis coverage totals accumulated while compiling a switch tree.
//!
//! A fully tiled axis sums to `1.0`. Less means a gap between authored
//! ranges, more means ranges overlap.

use std::ops::Index;

use crate::axis::Axis;

/// Coverage fraction per [`Axis`], indexed by axis ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoverageReport {
    totals: [f32; Axis::COUNT],
}

impl CoverageReport {
    /// Seeds every axis with `0`.
    pub fn reset(&mut self) {
        self.totals = [0.0; Axis::COUNT];
    }

    /// Adds `amount` to the total for `axis`.
    pub fn add(&mut self, axis: Axis, amount: f32) {
        self.totals[axis.index()] += amount;
    }

    /// Current total for `axis`.
    pub fn get(&self, axis: Axis) -> f32 {
        self.totals[axis.index()]
    }

    /// `(axis, total)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f32)> + '_ {
        Axis::ALL.into_iter().map(|axis| (axis, self.get(axis)))
    }

    /// Axes that were switched on but do not sum to `1.0` within `tolerance`.
    ///
    /// Axes with a zero total are not used by the tree and are skipped.
    pub fn gaps(&self, tolerance: f32) -> Vec<(Axis, f32)> {
        self.iter()
            .filter(|&(_, total)| total != 0.0)
            .filter(|&(_, total)| (total - 1.0).abs() > tolerance)
            .collect()
    }
}

impl Index<Axis> for CoverageReport {
    type Output = f32;

    fn index(&self, axis: Axis) -> &f32 {
        &self.totals[axis.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_zeroes_every_axis() {
        let mut report = CoverageReport::default();
        report.add(Axis::Height, 0.7);
        report.reset();
        assert!(report.iter().all(|(_, total)| total == 0.0));
    }

    #[test]
    fn test_gaps_reports_partial_and_overlapping_axes() {
        let mut report = CoverageReport::default();
        report.add(Axis::Water, 0.5);
        report.add(Axis::Water, 0.5);
        report.add(Axis::Height, 0.6);
        report.add(Axis::Temperature, 1.25);

        let gaps = report.gaps(1e-4);
        assert_eq!(gaps, vec![(Axis::Height, 0.6), (Axis::Temperature, 1.25)]);
        assert_eq!(report[Axis::Water], 1.0);
    }
}
