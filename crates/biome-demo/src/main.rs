mod sample_world;

use biome_config::{CliArgs, Config};
use biome_switch::{BiomeData, FillOptions, SwitchTree, SwitchValues};
use clap::Parser;
use tracing::{error, info, warn};

/// Compiles the sample graph. `None` if the graph could not be wired.
fn demonstrate_tree_compilation(config: &Config) -> Option<SwitchTree> {
    info!("Starting switch tree compilation demonstration");

    let (mut graph, entry) = match sample_world::sample_graph(config.demo.max_height) {
        Ok(graph) => graph,
        Err(e) => {
            error!("Failed to wire sample graph: {e}");
            return None;
        }
    };
    info!("Sample graph has {} nodes", graph.len());

    let mut tree = SwitchTree::new().with_coverage_tolerance(config.compile.coverage_tolerance);
    tree.build(&mut graph, entry);

    info!("Compiled {} biomes", tree.biome_count());
    for biome in tree.biomes() {
        info!("  {} {}", biome.id, biome.name);
    }
    for (axis, total) in tree.coverage().iter() {
        info!("  coverage {axis}: {total:.3}");
    }
    if config.compile.dump_tree {
        info!("Switch tree:\n{}", tree.dump());
    }

    // Spot checks on both sides of the lowland/highland boundary.
    let boundary = 0.4 * config.demo.max_height;
    for (label, values) in [
        ("boundary", SwitchValues::new(false, boundary, 0.5, 0.5)),
        ("above boundary", SwitchValues::new(false, boundary + 0.01, 0.5, 0.5)),
        ("under water", SwitchValues::new(true, boundary, 0.5, 0.5)),
    ] {
        let name = tree
            .classify(&values)
            .and_then(|id| tree.biome_by_id(id))
            .map_or("<none>", |b| b.name.as_str());
        info!("  {label}: {name}");
    }

    info!("Switch tree compilation demonstration completed successfully");
    Some(tree)
}

/// Classifies a noise terrain and reports how many cells each biome got.
fn demonstrate_grid_classification(tree: &SwitchTree, config: &Config) {
    info!("Starting grid classification demonstration");

    let mut data: BiomeData = sample_world::synthetic_terrain(&config.demo);
    let options = FillOptions {
        blend_count: config.classify.blend_count as usize,
        max_unmatched_warnings: config.classify.unmatched_warning_limit as usize,
    };

    let stats = match tree.fill_biome_map(&options, &mut data) {
        Ok(stats) => stats,
        Err(e) => {
            error!("Classification failed: {e}");
            return;
        }
    };

    let size = config.demo.grid_size;
    info!(
        "Classified {size}x{size} grid: {} assigned, {} unassigned",
        stats.assigned, stats.unassigned
    );
    if stats.warnings_suppressed > 0 {
        warn!(
            "{} unmatched-cell warnings suppressed",
            stats.warnings_suppressed
        );
    }

    let mut counts = vec![0usize; tree.biome_count()];
    if let Some(map) = &data.biome_ids {
        for id in map.ids().iter().flatten() {
            if let Some(count) = counts.get_mut(id.0 as usize) {
                *count += 1;
            }
        }
    }
    for biome in tree.biomes() {
        let count = counts.get(biome.id.0 as usize).copied().unwrap_or(0);
        info!("  {:<10} {count:>6} cells", biome.name);
    }
    info!("Distinct biomes present: {}", data.ids.len());

    info!("Grid classification demonstration completed successfully");
}

/// Runs the catalog checks over the sample biomes as authored cells.
fn demonstrate_catalog_validation(config: &Config) {
    info!("Starting range catalog demonstration");

    let catalog = match sample_world::sample_catalog(config.demo.max_height) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to build sample catalog: {e}");
            return;
        }
    };
    let spans = catalog.axis_spans();
    for cell in catalog.cells() {
        info!(
            "  {cell} (weight {:.3}, links {:?})",
            cell.weight(&spans),
            cell.links
        );
    }

    let pairs = catalog.overlapping_pairs();
    info!("{} overlapping pairs", pairs.len());
    for (a, b) in pairs {
        if let (Some(a), Some(b)) = (catalog.get(a), catalog.get(b)) {
            info!("  {} / {} gap {:.3}", a.name, b.name, a.gap_width(b));
        }
    }

    let corner = SwitchValues::new(false, 0.4 * config.demo.max_height, 0.0, 0.3);
    match catalog.find_match(&corner) {
        Some(cell) => info!("Inclusive lookup at the shared corner picks {}", cell.name),
        None => info!("Inclusive lookup at the shared corner found nothing"),
    }

    info!("Range catalog demonstration completed successfully");
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("biome-switch")
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    biome_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Some(tree) = demonstrate_tree_compilation(&config) {
        demonstrate_grid_classification(&tree, &config);
    }

    demonstrate_catalog_validation(&config);
}
