//! Switch tree compiler.
//!
//! Walks a [`SwitchGraph`] depth-first from a root node and produces a strict
//! tree of decision nodes. Every switch output contributes one child per
//! attached node, in authoring order, which is also the order the classifier
//! tries them in. Leaves become [`PartialBiome`]s with sequential ids.

use std::fmt::{self, Write as _};
use std::time::Instant;

use hashbrown::{HashMap, HashSet};
use tracing::{debug, trace, warn};

use crate::axis::{Axis, Color};
use crate::biome::{BiomeId, PartialBiome};
use crate::catalog::SwitchValues;
use crate::coverage::CoverageReport;
use crate::graph::{BiomeSwitch, GraphNode, NodeId, SwitchGraph};

/// Default allowed deviation of a coverage total from `1.0` before warning.
pub const DEFAULT_COVERAGE_TOLERANCE: f32 = 1e-4;

/// Test a decision node applies to the sampled values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum SwitchTest {
    /// Root, or a node that was never bound to a switch output.
    Unset,
    Bool { axis: Axis, value: bool },
    /// Matches `(min, max]`.
    Range { axis: Axis, min: f32, max: f32 },
}

#[derive(Clone, Debug)]
pub(crate) struct DecisionNode {
    pub(crate) test: SwitchTest,
    pub(crate) biome: Option<BiomeId>,
    pub(crate) children: Vec<DecisionNode>,
    pub(crate) preview_color: Color,
    pub(crate) biome_name: String,
}

impl DecisionNode {
    fn unset() -> Self {
        Self {
            test: SwitchTest::Unset,
            biome: None,
            children: Vec::new(),
            preview_color: Color::BLACK,
            biome_name: String::new(),
        }
    }

    fn branch(test: SwitchTest, name: &str, color: Color) -> Self {
        Self {
            test,
            preview_color: color,
            biome_name: name.to_owned(),
            ..Self::unset()
        }
    }

    pub(crate) fn matches(&self, values: &SwitchValues) -> bool {
        match self.test {
            SwitchTest::Unset => false,
            SwitchTest::Bool { axis, value } => values.flag(axis) == value,
            SwitchTest::Range { axis, min, max } => {
                let v = values[axis];
                v > min && v <= max
            }
        }
    }
}

impl fmt::Display for DecisionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.test {
            SwitchTest::Unset => f.write_str("non-initialized switch"),
            SwitchTest::Bool { axis, value } => {
                write!(f, "[{axis}]: {value} ({})", self.biome_name)
            }
            SwitchTest::Range { axis, min, max } => {
                write!(f, "[{axis}]: {min} -> {max} ({})", self.biome_name)
            }
        }
    }
}

/// Compiled decision tree plus the biome lookup tables built alongside it.
///
/// A new [`SwitchTree::build`] replaces everything wholesale; between builds
/// the tree is read-only.
#[derive(Clone, Debug)]
pub struct SwitchTree {
    pub(crate) root: DecisionNode,
    built: bool,
    biome_per_id: HashMap<BiomeId, PartialBiome>,
    biome_per_name: HashMap<String, BiomeId>,
    coverage: CoverageReport,
    coverage_tolerance: f32,
}

impl Default for SwitchTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SwitchTree {
    /// Empty, unbuilt tree.
    pub fn new() -> Self {
        Self {
            root: DecisionNode::unset(),
            built: false,
            biome_per_id: HashMap::new(),
            biome_per_name: HashMap::new(),
            coverage: CoverageReport::default(),
            coverage_tolerance: DEFAULT_COVERAGE_TOLERANCE,
        }
    }

    /// Sets how far a coverage total may stray from `1.0` before `build` warns.
    pub fn with_coverage_tolerance(mut self, tolerance: f32) -> Self {
        self.coverage_tolerance = tolerance;
        self
    }

    /// Compiles the graph reachable from `root`.
    ///
    /// Authoring defects (unnamed leaves, disconnected outputs, cycles,
    /// dangling ids) are logged and the affected branch is left out; the
    /// build itself always completes. Assigned biomes are also written back
    /// into the graph's leaf nodes.
    pub fn build(&mut self, graph: &mut SwitchGraph, root: NodeId) {
        let start = Instant::now();

        let mut builder = TreeBuilder::new(graph);
        let mut root_node = DecisionNode::unset();
        builder.visit(root, &mut root_node, 0);

        let TreeBuilder {
            biome_per_id,
            biome_per_name,
            coverage,
            ..
        } = builder;
        self.root = root_node;
        self.biome_per_id = biome_per_id;
        self.biome_per_name = biome_per_name;
        self.coverage = coverage;
        self.built = true;

        for (axis, total) in self.coverage.gaps(self.coverage_tolerance) {
            warn!(
                %axis,
                total,
                "switch ranges on {axis} cover {total} of the axis instead of 1"
            );
        }
        debug!(
            biomes = self.biome_per_id.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "built switch tree"
        );
        trace!("switch tree:\n{}", self.dump());
    }

    /// `true` once `build` has run.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of biomes created by the last build.
    pub fn biome_count(&self) -> usize {
        self.biome_per_id.len()
    }

    /// Biome with the given id, if the last build created it.
    pub fn biome_by_id(&self, id: BiomeId) -> Option<&PartialBiome> {
        self.biome_per_id.get(&id)
    }

    /// Biome registered under `name`. Duplicate names resolve to the latest id.
    pub fn biome_by_name(&self, name: &str) -> Option<&PartialBiome> {
        self.biome_per_name
            .get(name)
            .and_then(|id| self.biome_per_id.get(id))
    }

    /// All biomes ordered by id.
    pub fn biomes(&self) -> Vec<&PartialBiome> {
        let mut biomes: Vec<_> = self.biome_per_id.values().collect();
        biomes.sort_by_key(|b| b.id);
        biomes
    }

    /// Per-axis coverage totals accumulated by the last build.
    pub fn coverage(&self) -> &CoverageReport {
        &self.coverage
    }

    /// Descends from the root taking the first matching child at each level.
    ///
    /// Returns `None` when some level has no matching child before a biome
    /// is reached.
    pub fn classify(&self, values: &SwitchValues) -> Option<BiomeId> {
        let mut current = &self.root;
        loop {
            if let Some(id) = current.biome {
                return Some(id);
            }
            current = current.children.iter().find(|child| child.matches(values))?;
        }
    }

    /// Indented text rendering of the tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(&self.root, 0, &mut out);
        out
    }
}

fn dump_node(node: &DecisionNode, depth: usize, out: &mut String) {
    let _ = write!(out, "{:indent$}{node}", "", indent = depth * 2);
    if let Some(id) = node.biome {
        let _ = write!(out, " => {id}");
    }
    out.push('\n');
    for child in &node.children {
        dump_node(child, depth + 1, out);
    }
}

/// Compile-scoped state. Lives for one `build` call only.
struct TreeBuilder<'g> {
    graph: &'g mut SwitchGraph,
    /// Next id to hand out. Wider than `BiomeId` so `u16::MAX` itself stays usable.
    next_id: u32,
    biome_per_id: HashMap<BiomeId, PartialBiome>,
    biome_per_name: HashMap<String, BiomeId>,
    coverage: CoverageReport,
    /// Graph nodes on the current DFS path.
    path: HashSet<NodeId>,
}

enum Step {
    Branch(Vec<(DecisionNode, NodeId)>),
    Leaf,
    Forward(Vec<NodeId>),
}

impl<'g> TreeBuilder<'g> {
    fn new(graph: &'g mut SwitchGraph) -> Self {
        let mut coverage = CoverageReport::default();
        coverage.reset();
        Self {
            graph,
            next_id: 0,
            biome_per_id: HashMap::new(),
            biome_per_name: HashMap::new(),
            coverage,
            path: HashSet::new(),
        }
    }

    fn visit(&mut self, id: NodeId, cursor: &mut DecisionNode, depth: usize) {
        if !self.path.insert(id) {
            warn!(
                node = id.0,
                depth,
                "switch graph loops back to node {}, branch dropped",
                id.0
            );
            return;
        }
        self.visit_node(id, cursor, depth);
        self.path.remove(&id);
    }

    fn visit_node(&mut self, id: NodeId, cursor: &mut DecisionNode, depth: usize) {
        let step = match self.graph.node(id) {
            None => {
                warn!(
                    node = id.0,
                    depth,
                    "switch graph references missing node {}",
                    id.0
                );
                return;
            }
            Some(GraphNode::Switch(switch)) => {
                Step::Branch(expand_switch(id, switch, &mut self.coverage))
            }
            Some(GraphNode::Leaf(_)) => Step::Leaf,
            Some(GraphNode::PassThrough(forward)) => Step::Forward(forward.clone()),
        };

        match step {
            Step::Branch(branches) => {
                let base = cursor.children.len();
                let (children, targets): (Vec<_>, Vec<_>) = branches.into_iter().unzip();
                cursor.children.extend(children);
                for (offset, target) in targets.into_iter().enumerate() {
                    self.visit(target, &mut cursor.children[base + offset], depth + 1);
                }
            }
            Step::Leaf => self.bind_leaf(id, cursor, depth),
            Step::Forward(next) => {
                for target in next {
                    self.visit(target, cursor, depth + 1);
                }
            }
        }
    }

    fn bind_leaf(&mut self, id: NodeId, cursor: &mut DecisionNode, depth: usize) {
        if cursor.biome_name.is_empty() {
            warn!(
                node = id.0,
                depth,
                "biome leaf {} has no named switch branch above it, leaf dropped",
                id.0
            );
            return;
        }
        let Ok(raw_id) = u16::try_from(self.next_id) else {
            warn!(node = id.0, "biome id space exhausted, leaf dropped");
            return;
        };

        let biome = PartialBiome {
            id: BiomeId(raw_id),
            name: cursor.biome_name.clone(),
            preview_color: cursor.preview_color,
        };
        self.next_id += 1;
        cursor.biome = Some(biome.id);

        if let Some(GraphNode::Leaf(leaf)) = self.graph.node_mut(id) {
            leaf.biome = Some(biome.clone());
        }
        if let Some(previous) = self.biome_per_name.insert(biome.name.clone(), biome.id) {
            warn!(
                name = %biome.name,
                "biome name used twice ({previous} and {}), name lookup resolves to the latter",
                biome.id
            );
        }
        self.biome_per_id.insert(biome.id, biome);
    }
}

/// One child per attached node of every connected output, with coverage bookkeeping.
fn expand_switch(
    id: NodeId,
    switch: &BiomeSwitch,
    coverage: &mut CoverageReport,
) -> Vec<(DecisionNode, NodeId)> {
    let mut branches = Vec::new();
    match switch {
        BiomeSwitch::Water { terrestrial, aquatic } => {
            let outputs = [
                (false, "terrestrial", Color::BLACK, terrestrial),
                (true, "aquatic", Color::BLUE, aquatic),
            ];
            for (value, name, color, attached) in outputs {
                if attached.is_empty() {
                    debug!(
                        node = id.0,
                        "nothing attached to {name} output of water switch"
                    );
                    continue;
                }
                let test = SwitchTest::Bool {
                    axis: Axis::Water,
                    value,
                };
                branches.extend(
                    attached
                        .iter()
                        .map(|&target| (DecisionNode::branch(test, name, color), target)),
                );
                coverage.add(Axis::Water, 0.5);
            }
        }
        BiomeSwitch::Range { axis, ranges } => {
            for (output, range) in ranges.iter().enumerate() {
                if range.output.is_empty() {
                    debug!(
                        node = id.0,
                        output,
                        "nothing attached to {axis} switch output"
                    );
                    continue;
                }
                let test = SwitchTest::Range {
                    axis: *axis,
                    min: range.min,
                    max: range.max,
                };
                branches.extend(range.output.iter().map(|&target| {
                    (DecisionNode::branch(test, &range.name, range.color), target)
                }));

                let span = range.absolute_max - range.absolute_min;
                if span > 0.0 {
                    coverage.add(*axis, (range.max - range.min) / span);
                } else {
                    warn!(
                        node = id.0,
                        output,
                        "{axis} switch range '{}' has an empty absolute span",
                        range.name
                    );
                }
            }
        }
    }
    branches
}
