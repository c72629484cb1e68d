//! Errors for caller contract violations during classification.

/// Returned by [`SwitchTree::fill_biome_map`](crate::SwitchTree::fill_biome_map)
/// when the inputs break its preconditions. Nothing is written in that case.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClassifyError {
    /// The tree has never been built.
    #[error("switch tree has not been built")]
    NotBuilt,

    /// A per-cell sample array does not hold one value per grid cell.
    #[error("{field} holds {actual} samples, expected {expected}")]
    SampleLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}
