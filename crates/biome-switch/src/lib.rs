//! Biome switch trees: compile an authored switch graph into a decision tree
//! and classify terrain grids with it.
//!
//! The range catalog in [`catalog`] validates authored ranges on its own,
//! independently of any compiled tree.

mod axis;
mod biome;
mod classify;
mod coverage;
mod diagnostics;
mod error;
mod tree;

pub mod catalog;
pub mod graph;

pub use axis::{Axis, Color};
pub use biome::{BiomeId, PartialBiome};
pub use catalog::{
    AxisSpans, CatalogError, SwitchCatalog, SwitchCell, SwitchCellParam, SwitchCellParams,
    SwitchValues,
};
pub use classify::{
    BiomeData, BiomeMap2D, BiomeMap3D, DEFAULT_MAX_UNMATCHED_WARNINGS, FillOptions, FillStats,
    HeightField, Terrain, VolumeTerrain,
};
pub use coverage::CoverageReport;
pub use diagnostics::WarningLimiter;
pub use error::ClassifyError;
pub use graph::{BiomeLeaf, BiomeSwitch, GraphError, GraphNode, NodeId, SwitchGraph, SwitchRange};
pub use tree::{DEFAULT_COVERAGE_TOLERANCE, SwitchTree};
