//! Sample switch graph, matching range catalog, and a noise-driven terrain.

use biome_config::DemoConfig;
use biome_switch::{
    Axis, BiomeData, CatalogError, Color, GraphError, GraphNode, NodeId, SwitchCatalog, SwitchCell,
    SwitchCellParam, SwitchCellParams, SwitchGraph, SwitchRange,
};
use noise::{NoiseFn, Simplex};

/// Octaves summed for every terrain field.
const OCTAVES: u32 = 5;

/// Lowland / highland / peak split points as fractions of the max height.
const LOWLAND_TOP: f32 = 0.4;
const HIGHLAND_TOP: f32 = 0.8;

/// Builds the sample graph and returns it with its entry node.
///
/// ```text
/// entry -> water ─ terrestrial -> height ─ Lowland  -> wetness ─ Desert | Plains | Swamp
///                │                       ├ Highland -> temperature ─ Taiga | Forest
///                │                       └ Peaks    -> leaf
///                └ aquatic -> leaf
/// ```
pub fn sample_graph(max_height: f32) -> Result<(SwitchGraph, NodeId), GraphError> {
    let mut graph = SwitchGraph::new();
    let entry = graph.add_node(GraphNode::pass_through());
    let water = graph.add_node(GraphNode::water_switch());
    graph.connect(entry, 0, water)?;

    let low_top = LOWLAND_TOP * max_height;
    let high_top = HIGHLAND_TOP * max_height;
    let height = graph.add_node(GraphNode::range_switch(
        Axis::Height,
        vec![
            SwitchRange::new("Lowland", 0.0, low_top, 0.0, max_height),
            SwitchRange::new("Highland", low_top, high_top, 0.0, max_height),
            SwitchRange::new("Peaks", high_top, max_height, 0.0, max_height)
                .with_color(Color::WHITE),
        ],
    ));
    let ocean = graph.add_node(GraphNode::leaf());
    graph.connect(water, 0, height)?;
    graph.connect(water, 1, ocean)?;

    let wetness = graph.add_node(GraphNode::range_switch(
        Axis::Wetness,
        vec![
            SwitchRange::new("Desert", 0.0, 0.3, 0.0, 1.0).with_color(Color::rgb(0.86, 0.8, 0.55)),
            SwitchRange::new("Plains", 0.3, 0.7, 0.0, 1.0).with_color(Color::rgb(0.5, 0.7, 0.35)),
            SwitchRange::new("Swamp", 0.7, 1.0, 0.0, 1.0).with_color(Color::rgb(0.25, 0.35, 0.2)),
        ],
    ));
    let temperature = graph.add_node(GraphNode::range_switch(
        Axis::Temperature,
        vec![
            SwitchRange::new("Taiga", -1.0, 0.0, -1.0, 1.0).with_color(Color::rgb(0.3, 0.4, 0.25)),
            SwitchRange::new("Forest", 0.0, 1.0, -1.0, 1.0).with_color(Color::rgb(0.15, 0.45, 0.2)),
        ],
    ));
    let peaks = graph.add_node(GraphNode::leaf());
    graph.connect(height, 0, wetness)?;
    graph.connect(height, 1, temperature)?;
    graph.connect(height, 2, peaks)?;

    for output in 0..3 {
        let leaf = graph.add_node(GraphNode::leaf());
        graph.connect(wetness, output, leaf)?;
    }
    for output in 0..2 {
        let leaf = graph.add_node(GraphNode::leaf());
        graph.connect(temperature, output, leaf)?;
    }

    Ok((graph, entry))
}

/// The leaf biomes of [`sample_graph`] as standalone catalog cells.
pub fn sample_catalog(max_height: f32) -> Result<SwitchCatalog, CatalogError> {
    let dry = SwitchCellParams::new().with(Axis::Water, SwitchCellParam::flag(false));
    let lowland = dry.with(
        Axis::Height,
        SwitchCellParam::new(0.0, LOWLAND_TOP * max_height),
    );
    let highland = dry.with(
        Axis::Height,
        SwitchCellParam::new(LOWLAND_TOP * max_height, HIGHLAND_TOP * max_height),
    );
    let peaks = dry.with(
        Axis::Height,
        SwitchCellParam::new(HIGHLAND_TOP * max_height, max_height),
    );
    let wet = |min, max| lowland.with(Axis::Wetness, SwitchCellParam::new(min, max));
    let warm = |min, max| highland.with(Axis::Temperature, SwitchCellParam::new(min, max));

    let cells = [
        ("Desert", wet(0.0, 0.3)),
        ("Plains", wet(0.3, 0.7)),
        ("Swamp", wet(0.7, 1.0)),
        ("Taiga", warm(-1.0, 0.0)),
        ("Forest", warm(0.0, 1.0)),
        ("Peaks", peaks),
        ("aquatic", SwitchCellParams::new().with(Axis::Water, SwitchCellParam::flag(true))),
    ];

    let mut catalog = SwitchCatalog::new();
    let mut previous: Option<usize> = None;
    for (name, params) in cells {
        let index = catalog.push(SwitchCell::new(name, params))?;
        // Siblings under the same switch are linked, as in the editor.
        if let Some(prev) = previous
            && catalog.get(prev).map(|c| c.params[Axis::Height]) == Some(params[Axis::Height])
        {
            catalog.link(prev, index);
        }
        previous = Some(index);
    }
    Ok(catalog)
}

/// Folds a 64-bit seed into the 32 bits `Simplex` takes, keeping both halves.
fn noise_seed(seed: u64) -> u32 {
    (seed ^ (seed >> 32)) as u32
}

/// Fractal simplex noise normalized to `[-1, 1]`.
fn fbm(noise: &Simplex, x: f64, y: f64, frequency: f64) -> f64 {
    let mut total = 0.0;
    let mut norm = 0.0;
    let mut amplitude = 1.0;
    let mut freq = frequency;
    for _ in 0..OCTAVES {
        total += noise.get([x * freq, y * freq]) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        freq *= 2.0;
    }
    total / norm
}

/// Height, water, temperature and wetness samples for a `grid_size` square.
pub fn synthetic_terrain(demo: &DemoConfig) -> BiomeData {
    let size = demo.grid_size as usize;
    let height_noise = Simplex::new(noise_seed(demo.seed));
    let temperature_noise = Simplex::new(noise_seed(demo.seed.wrapping_add(0x5EED)));
    let wetness_noise = Simplex::new(noise_seed(demo.seed.wrapping_add(0xD1CE)));

    let cells = size * size;
    let mut heights = Vec::with_capacity(cells);
    let mut water_height = Vec::with_capacity(cells);
    let mut temperature = Vec::with_capacity(cells);
    let mut wetness = Vec::with_capacity(cells);

    for x in 0..size {
        for y in 0..size {
            let wx = x as f64 * demo.cell_step as f64;
            let wy = y as f64 * demo.cell_step as f64;

            let h = ((fbm(&height_noise, wx, wy, 0.02) + 1.0) * 0.5) as f32 * demo.max_height;
            heights.push(h);
            water_height.push(demo.water_level - h);
            temperature.push(fbm(&temperature_noise, wx, wy, 0.01) as f32);
            wetness.push(((fbm(&wetness_noise, wx, wy, 0.015) + 1.0) * 0.5) as f32);
        }
    }

    BiomeData::from_heights(size, demo.cell_step, heights)
        .with_water_height(water_height)
        .with_temperature(temperature)
        .with_wetness(wetness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use biome_switch::{FillOptions, SwitchTree};

    #[test]
    fn test_sample_graph_tiles_every_axis() {
        let (mut graph, entry) = sample_graph(100.0).unwrap();
        let mut tree = SwitchTree::new();
        tree.build(&mut graph, entry);

        assert_eq!(tree.biome_count(), 7);
        assert!(tree.coverage().gaps(1e-4).is_empty());
        assert_eq!(tree.biome_by_name("Desert").map(|b| b.id.0), Some(0));
        assert_eq!(tree.biome_by_name("aquatic").map(|b| b.id.0), Some(6));
    }

    #[test]
    fn test_sample_catalog_links_and_overlaps() {
        let catalog = sample_catalog(100.0).unwrap();
        assert_eq!(catalog.len(), 7);
        // Desert/Plains/Swamp share a height band and are chained together.
        assert_eq!(catalog.get(1).map(|c| c.links.clone()), Some(vec![0, 2]));
        // Inclusive bounds make neighbouring bands touch.
        let pairs = catalog.overlapping_pairs();
        assert!(pairs.contains(&(0, 1)));
        assert!(!pairs.iter().any(|&(a, b)| a == 6 || b == 6));
    }

    #[test]
    fn test_synthetic_terrain_classifies() {
        let demo = DemoConfig {
            grid_size: 16,
            ..DemoConfig::default()
        };
        let mut data = synthetic_terrain(&demo);
        assert_eq!(data.water_height.as_ref().map(Vec::len), Some(256));

        let (mut graph, entry) = sample_graph(demo.max_height).unwrap();
        let mut tree = SwitchTree::new();
        tree.build(&mut graph, entry);

        let stats = tree
            .fill_biome_map(&FillOptions::default(), &mut data)
            .unwrap();
        assert_eq!(stats.assigned + stats.unassigned, 256);
        assert!(!data.ids.is_empty());
    }

    #[test]
    fn test_synthetic_terrain_is_deterministic() {
        let demo = DemoConfig {
            grid_size: 8,
            seed: 99,
            ..DemoConfig::default()
        };
        let a = synthetic_terrain(&demo);
        let b = synthetic_terrain(&demo);
        assert_eq!(a.terrain, b.terrain);
        assert_eq!(a.wetness, b.wetness);
    }

    #[test]
    fn test_seed_high_bits_change_terrain() {
        assert_ne!(noise_seed(7), noise_seed(7 | (1 << 40)));

        let low = DemoConfig {
            grid_size: 8,
            seed: 7,
            ..DemoConfig::default()
        };
        let high = DemoConfig {
            seed: 7 | (1 << 40),
            ..low.clone()
        };
        let a = synthetic_terrain(&low);
        let b = synthetic_terrain(&high);
        assert_ne!(a.terrain, b.terrain);
    }
}
