//! Per-cell classification of a terrain grid against a compiled [`SwitchTree`].
//!
//! Cells are visited row-major (outer `x`, inner `y`), flat index
//! `x * size + y`, so the output is deterministic.

use tracing::{debug, warn};

use crate::biome::BiomeId;
use crate::catalog::SwitchValues;
use crate::diagnostics::WarningLimiter;
use crate::error::ClassifyError;
use crate::tree::SwitchTree;

/// Default cap on unmatched-cell warnings per classification pass.
pub const DEFAULT_MAX_UNMATCHED_WARNINGS: usize = 300;

/// Square height-field terrain: one height per cell.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    pub size: usize,
    /// World distance between neighbouring samples.
    pub step: f32,
    pub heights: Vec<f32>,
}

/// Volumetric terrain. Only its dimensions are read; heights classify as `0`.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeTerrain {
    pub size: usize,
    pub step: f32,
}

/// Terrain a biome map is laid over.
#[derive(Clone, Debug, PartialEq)]
pub enum Terrain {
    HeightField(HeightField),
    Volume(VolumeTerrain),
}

impl Terrain {
    /// Samples per grid side.
    pub fn size(&self) -> usize {
        match self {
            Terrain::HeightField(field) => field.size,
            Terrain::Volume(volume) => volume.size,
        }
    }

    /// World distance between neighbouring samples.
    pub fn step(&self) -> f32 {
        match self {
            Terrain::HeightField(field) => field.step,
            Terrain::Volume(volume) => volume.step,
        }
    }

    fn height(&self, index: usize) -> f32 {
        match self {
            Terrain::HeightField(field) => field.heights[index],
            Terrain::Volume(_) => 0.0,
        }
    }
}

/// Dense `size x size` grid of biome ids. `None` marks an unassigned cell.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeMap2D {
    size: usize,
    step: f32,
    ids: Vec<Option<BiomeId>>,
}

impl BiomeMap2D {
    /// Every cell unassigned.
    pub fn new(size: usize, step: f32) -> Self {
        Self {
            size,
            step,
            ids: vec![None; size * size],
        }
    }

    /// Cells per grid side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// World distance between neighbouring cells.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Id assigned to cell `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<BiomeId> {
        self.ids[self.index(x, y)]
    }

    /// Id as a signed integer, `-1` for unassigned cells.
    pub fn raw_id(&self, x: usize, y: usize) -> i32 {
        self.get(x, y).map_or(-1, |id| i32::from(id.0))
    }

    /// Assigns or clears cell `(x, y)`. Panics outside the grid like [`BiomeMap2D::get`].
    pub fn set(&mut self, x: usize, y: usize, id: Option<BiomeId>) {
        let index = self.index(x, y);
        self.ids[index] = id;
    }

    /// Cells in row-major order.
    pub fn ids(&self) -> &[Option<BiomeId>] {
        &self.ids
    }

    fn index(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.size && y < self.size,
            "cell ({x}, {y}) outside {0}x{0} grid",
            self.size
        );
        x * self.size + y
    }
}

/// Volumetric biome map. Created for volumetric inputs but never filled yet.
///
/// Cell storage is not allocated up front, so even very large cubes cost
/// nothing until something is written.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeMap3D {
    size: usize,
    step: f32,
    ids: Vec<Option<BiomeId>>,
}

impl BiomeMap3D {
    /// Every cell unassigned.
    pub fn new(size: usize, step: f32) -> Self {
        Self {
            size,
            step,
            ids: Vec::new(),
        }
    }

    /// Cells per cube side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// World distance between neighbouring cells.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Total cell count, `None` if `size³` does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        self.size.checked_mul(self.size)?.checked_mul(self.size)
    }

    /// Id assigned to cell `(x, y, z)`.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside the cube.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<BiomeId> {
        assert!(
            x < self.size && y < self.size && z < self.size,
            "cell ({x}, {y}, {z}) outside {0}x{0}x{0} cube",
            self.size
        );
        let index = x
            .checked_mul(self.size)?
            .checked_add(y)?
            .checked_mul(self.size)?
            .checked_add(z)?;
        self.ids.get(index).copied().flatten()
    }
}

/// Terrain samples going in, biome ids coming out.
///
/// Every optional 2D sample array must hold `size * size` values laid out
/// like [`BiomeMap2D`]. Missing temperature and wetness read as `0`; missing
/// water height reads as dry.
#[derive(Clone, Debug, Default)]
pub struct BiomeData {
    pub terrain: Option<Terrain>,
    pub water_height: Option<Vec<f32>>,
    /// Water is never present, whatever `water_height` says.
    pub is_waterless: bool,
    pub temperature: Option<Vec<f32>>,
    pub wetness: Option<Vec<f32>>,

    pub air_3d: Option<Vec<f32>>,
    pub wind_3d: Option<Vec<f32>>,
    pub wetness_3d: Option<Vec<f32>>,
    pub temperature_3d: Option<Vec<f32>>,

    /// Output grid, replaced on every 2D pass.
    pub biome_ids: Option<BiomeMap2D>,
    /// Output volume, replaced on every volumetric pass.
    pub biome_ids_3d: Option<BiomeMap3D>,
    /// Distinct ids written by the last pass, in first-seen order.
    pub ids: Vec<BiomeId>,
}

impl BiomeData {
    /// Input over a height field with no other samples.
    pub fn from_heights(size: usize, step: f32, heights: Vec<f32>) -> Self {
        Self {
            terrain: Some(Terrain::HeightField(HeightField {
                size,
                step,
                heights,
            })),
            ..Self::default()
        }
    }

    /// Water depth per cell; positive means under water.
    pub fn with_water_height(mut self, water_height: Vec<f32>) -> Self {
        self.water_height = Some(water_height);
        self
    }

    /// Temperature per cell.
    pub fn with_temperature(mut self, temperature: Vec<f32>) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Wetness per cell.
    pub fn with_wetness(mut self, wetness: Vec<f32>) -> Self {
        self.wetness = Some(wetness);
        self
    }

    /// `true` when any volumetric sample set is present.
    pub fn is_3d_biomes(&self) -> bool {
        self.air_3d.is_some()
            || self.wind_3d.is_some()
            || self.wetness_3d.is_some()
            || self.temperature_3d.is_some()
    }

    fn check_lengths(&self, cells: usize) -> Result<(), ClassifyError> {
        let heights = match &self.terrain {
            Some(Terrain::HeightField(field)) => Some(&field.heights),
            _ => None,
        };
        let water = if self.is_waterless { None } else { self.water_height.as_ref() };
        let fields = [
            ("heights", heights),
            ("water_height", water),
            ("temperature", self.temperature.as_ref()),
            ("wetness", self.wetness.as_ref()),
        ];
        for (field, samples) in fields {
            if let Some(samples) = samples
                && samples.len() != cells
            {
                return Err(ClassifyError::SampleLength {
                    field,
                    expected: cells,
                    actual: samples.len(),
                });
            }
        }
        Ok(())
    }
}

/// Knobs for one classification pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillOptions {
    /// Number of nearest biomes to blend. Only `1` is supported.
    pub blend_count: usize,
    pub max_unmatched_warnings: usize,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            blend_count: 1,
            max_unmatched_warnings: DEFAULT_MAX_UNMATCHED_WARNINGS,
        }
    }
}

/// Outcome counters of one classification pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FillStats {
    pub assigned: usize,
    pub unassigned: usize,
    pub warnings_emitted: usize,
    pub warnings_suppressed: usize,
}

impl SwitchTree {
    /// Classifies every cell of `data` and stores the results back into it.
    ///
    /// Cells no branch accepts stay unassigned and produce a rate-limited
    /// warning. Without terrain nothing is written. Volumetric inputs only
    /// get an empty [`BiomeMap3D`].
    ///
    /// # Errors
    ///
    /// [`ClassifyError::NotBuilt`] before the first build, and
    /// [`ClassifyError::SampleLength`] when a sample array does not match
    /// the grid.
    pub fn fill_biome_map(
        &self,
        options: &FillOptions,
        data: &mut BiomeData,
    ) -> Result<FillStats, ClassifyError> {
        if !self.is_built() {
            return Err(ClassifyError::NotBuilt);
        }
        if options.blend_count > 1 {
            debug!(
                blend_count = options.blend_count,
                "biome blending is not supported, writing nearest biome only"
            );
        }

        let Some(terrain) = data.terrain.as_ref() else {
            debug!("no terrain to classify");
            return Ok(FillStats::default());
        };
        let size = terrain.size();
        data.check_lengths(size * size)?;

        if data.is_3d_biomes() {
            data.biome_ids_3d = Some(BiomeMap3D::new(size, terrain.step()));
            debug!(
                size,
                "volumetric biome maps are not implemented, map left empty"
            );
            return Ok(FillStats::default());
        }

        let mut map = BiomeMap2D::new(size, terrain.step());
        let mut limiter = WarningLimiter::new(options.max_unmatched_warnings);
        let mut stats = FillStats::default();
        data.ids.clear();

        for x in 0..size {
            for y in 0..size {
                let index = x * size + y;
                let water = !data.is_waterless
                    && data.water_height.as_ref().is_some_and(|w| w[index] > 0.0);
                let temperature = data.temperature.as_ref().map_or(0.0, |t| t[index]);
                let wetness = data.wetness.as_ref().map_or(0.0, |w| w[index]);
                let height = terrain.height(index);

                match self.classify(&SwitchValues::new(water, height, temperature, wetness)) {
                    Some(id) => {
                        map.set(x, y, Some(id));
                        if !data.ids.contains(&id) {
                            data.ids.push(id);
                        }
                        stats.assigned += 1;
                    }
                    None => {
                        stats.unassigned += 1;
                        if limiter.allow() {
                            warn!(
                                x,
                                y,
                                "can't choose biome with water: {water}, temp: {temperature}, \
                                 wet: {wetness}, height: {height}"
                            );
                        }
                    }
                }
            }
        }

        limiter.finish("unmatched biome cells");
        stats.warnings_emitted = limiter.emitted();
        stats.warnings_suppressed = limiter.suppressed();
        data.biome_ids = Some(map);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use crate::graph::{GraphNode, SwitchGraph, SwitchRange};

    fn plains_ocean() -> (SwitchTree, BiomeId, BiomeId) {
        let mut graph = SwitchGraph::new();
        let switch = graph.add_node(GraphNode::water_switch());
        let plains = graph.add_node(GraphNode::leaf());
        let ocean = graph.add_node(GraphNode::leaf());
        graph.connect(switch, 0, plains).unwrap();
        graph.connect(switch, 1, ocean).unwrap();

        let mut tree = SwitchTree::new();
        tree.build(&mut graph, switch);
        let plains_id = graph.leaf_biome(plains).unwrap().id;
        let ocean_id = graph.leaf_biome(ocean).unwrap().id;
        (tree, plains_id, ocean_id)
    }

    fn fill(tree: &SwitchTree, data: &mut BiomeData) -> FillStats {
        tree.fill_biome_map(&FillOptions::default(), data).unwrap()
    }

    fn lowland_highland() -> SwitchTree {
        let mut graph = SwitchGraph::new();
        let switch = graph.add_node(GraphNode::range_switch(
            Axis::Height,
            vec![
                SwitchRange::new("Lowland", 0.0, 50.0, 0.0, 100.0),
                SwitchRange::new("Highland", 50.0, 100.0, 0.0, 100.0),
            ],
        ));
        let low = graph.add_node(GraphNode::leaf());
        let high = graph.add_node(GraphNode::leaf());
        graph.connect(switch, 0, low).unwrap();
        graph.connect(switch, 1, high).unwrap();

        let mut tree = SwitchTree::new();
        tree.build(&mut graph, switch);
        tree
    }

    #[test]
    fn test_plains_ocean_grid() {
        let (tree, plains, ocean) = plains_ocean();
        // Grid index is x * size + y: water=[[false, true], [false, true]].
        let mut data = BiomeData::from_heights(2, 1.0, vec![1.0; 4])
            .with_water_height(vec![0.0, 2.0, 0.0, 2.0]);

        let stats = fill(&tree, &mut data);

        let map = data.biome_ids.as_ref().unwrap();
        assert_eq!(map.get(0, 0), Some(plains));
        assert_eq!(map.get(0, 1), Some(ocean));
        assert_eq!(map.get(1, 0), Some(plains));
        assert_eq!(map.get(1, 1), Some(ocean));
        assert_eq!(data.ids, vec![plains, ocean]);
        assert_eq!(stats.assigned, 4);
        assert_eq!(stats.unassigned, 0);
    }

    #[test]
    fn test_height_grid_boundaries() {
        let tree = lowland_highland();
        let low = tree.biome_by_name("Lowland").unwrap().id;
        let high = tree.biome_by_name("Highland").unwrap().id;
        let mut data = BiomeData::from_heights(2, 1.0, vec![10.0, 50.0, 50.01, 100.0]);

        fill(&tree, &mut data);

        let map = data.biome_ids.as_ref().unwrap();
        assert_eq!(map.ids(), &[Some(low), Some(low), Some(high), Some(high)]);
    }

    #[test]
    fn test_unmatched_cell_is_left_unassigned() {
        let tree = lowland_highland();
        let mut data = BiomeData::from_heights(2, 1.0, vec![10.0, 0.0, 60.0, 70.0]);

        let stats = fill(&tree, &mut data);

        let map = data.biome_ids.as_ref().unwrap();
        assert_eq!(map.get(0, 1), None);
        assert_eq!(map.raw_id(0, 1), -1);
        assert_eq!(stats.unassigned, 1);
        assert_eq!(stats.warnings_emitted, 1);
        assert_eq!(stats.warnings_suppressed, 0);
    }

    #[test]
    fn test_unmatched_warnings_are_capped() {
        let tree = lowland_highland();
        let mut data = BiomeData::from_heights(3, 1.0, vec![-5.0; 9]);
        let options = FillOptions {
            max_unmatched_warnings: 4,
            ..FillOptions::default()
        };

        let stats = tree.fill_biome_map(&options, &mut data).unwrap();
        assert_eq!(stats.unassigned, 9);
        assert_eq!(stats.warnings_emitted, 4);
        assert_eq!(stats.warnings_suppressed, 5);
        assert!(data.ids.is_empty());
    }

    #[test]
    fn test_waterless_ignores_water_height() {
        let (tree, plains, _) = plains_ocean();
        let mut data = BiomeData::from_heights(1, 1.0, vec![0.0]).with_water_height(vec![3.0]);
        data.is_waterless = true;

        fill(&tree, &mut data);
        assert_eq!(data.biome_ids.unwrap().get(0, 0), Some(plains));
    }

    #[test]
    fn test_missing_samples_default_to_zero() {
        let mut graph = SwitchGraph::new();
        let switch = graph.add_node(GraphNode::range_switch(
            Axis::Temperature,
            vec![SwitchRange::new("mild", -1.0, 0.0, -1.0, 1.0)],
        ));
        let leaf = graph.add_node(GraphNode::leaf());
        graph.connect(switch, 0, leaf).unwrap();
        let mut tree = SwitchTree::new();
        tree.build(&mut graph, switch);

        let mut data = BiomeData::from_heights(2, 1.0, vec![0.0; 4]);
        let stats = fill(&tree, &mut data);
        assert_eq!(stats.assigned, 4);
    }

    #[test]
    fn test_ids_are_reset_between_passes() {
        let (tree, plains, ocean) = plains_ocean();
        let mut data = BiomeData::from_heights(1, 1.0, vec![0.0]).with_water_height(vec![1.0]);
        fill(&tree, &mut data);
        assert_eq!(data.ids, vec![ocean]);

        data.water_height = Some(vec![0.0]);
        fill(&tree, &mut data);
        assert_eq!(data.ids, vec![plains]);
    }

    #[test]
    fn test_unbuilt_tree_is_rejected() {
        let tree = SwitchTree::new();
        let mut data = BiomeData::from_heights(1, 1.0, vec![0.0]);
        assert_eq!(
            tree.fill_biome_map(&FillOptions::default(), &mut data),
            Err(ClassifyError::NotBuilt)
        );
        assert!(data.biome_ids.is_none());
    }

    #[test]
    fn test_sample_length_mismatch_is_rejected() {
        let (tree, _, _) = plains_ocean();
        let mut data = BiomeData::from_heights(2, 1.0, vec![0.0; 4]).with_temperature(vec![0.0; 3]);
        assert_eq!(
            tree.fill_biome_map(&FillOptions::default(), &mut data),
            Err(ClassifyError::SampleLength {
                field: "temperature",
                expected: 4,
                actual: 3,
            })
        );
    }

    #[test]
    fn test_no_terrain_writes_nothing() {
        let (tree, _, _) = plains_ocean();
        let mut data = BiomeData::default();
        let stats = fill(&tree, &mut data);
        assert_eq!(stats, FillStats::default());
        assert!(data.biome_ids.is_none());
    }

    #[test]
    fn test_volumetric_samples_take_stub_path() {
        let (tree, _, _) = plains_ocean();
        let mut data = BiomeData::from_heights(2, 0.5, vec![0.0; 4]);
        data.wind_3d = Some(Vec::new());

        let stats = fill(&tree, &mut data);
        assert_eq!(stats, FillStats::default());
        assert!(data.biome_ids.is_none());
        let volume = data.biome_ids_3d.unwrap();
        assert_eq!(volume.size(), 2);
        assert_eq!(volume.get(1, 1, 1), None);
    }

    #[test]
    fn test_volume_map_does_not_allocate_cells() {
        let volume = BiomeMap3D::new(2048, 1.0);
        assert_eq!(volume.cell_count(), Some(2048 * 2048 * 2048));
        assert_eq!(volume.get(2047, 2047, 2047), None);

        let huge = BiomeMap3D::new(usize::MAX / 2, 1.0);
        assert_eq!(huge.cell_count(), None);
        assert_eq!(huge.get(7, 7, 7), None);
    }

    #[test]
    fn test_volume_terrain_classifies_at_zero_height() {
        let (tree, plains, _) = plains_ocean();
        let mut data = BiomeData {
            terrain: Some(Terrain::Volume(VolumeTerrain { size: 2, step: 1.0 })),
            ..BiomeData::default()
        };
        let stats = fill(&tree, &mut data);
        assert_eq!(stats.assigned, 4);
        assert_eq!(data.ids, vec![plains]);
    }
}
