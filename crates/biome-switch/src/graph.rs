//! Node graph handed over by the switch graph editor.
//!
//! Nodes live in an arena and reference each other by [`NodeId`]. Every node
//! plays exactly one role: a switch on one axis, a biome leaf, or a
//! pass-through that forwards to other nodes without taking part in the
//! decision.

use crate::axis::{Axis, Color};
use crate::biome::PartialBiome;

/// Index of a node inside its [`SwitchGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Errors raised while wiring a graph.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    /// The id does not belong to this graph.
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    /// The switch has no output with this index.
    #[error("node {node:?} has no output {output}")]
    NoSuchOutput { node: NodeId, output: usize },

    /// Leaves are terminal.
    #[error("leaf node {0:?} has no outputs")]
    LeafOutput(NodeId),
}

/// One authored sub-range of a continuous switch.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchRange {
    pub name: String,
    pub min: f32,
    pub max: f32,
    /// Lower bound of the whole axis, used for coverage.
    pub absolute_min: f32,
    /// Upper bound of the whole axis, used for coverage.
    pub absolute_max: f32,
    pub color: Color,
    /// Nodes attached to this sub-range's output. Empty when disconnected.
    pub output: Vec<NodeId>,
}

impl SwitchRange {
    /// Unconnected sub-range with the default white preview color.
    pub fn new(
        name: impl Into<String>,
        min: f32,
        max: f32,
        absolute_min: f32,
        absolute_max: f32,
    ) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            absolute_min,
            absolute_max,
            color: Color::WHITE,
            output: Vec::new(),
        }
    }

    /// Overrides the preview color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// Payload of a switch node.
#[derive(Clone, Debug, PartialEq)]
pub enum BiomeSwitch {
    /// Boolean split on [`Axis::Water`]. Output `0` is terrestrial, `1` aquatic.
    Water {
        terrestrial: Vec<NodeId>,
        aquatic: Vec<NodeId>,
    },
    /// Ordered sub-ranges over a continuous axis. Output `i` is `ranges[i]`.
    Range { axis: Axis, ranges: Vec<SwitchRange> },
}

impl BiomeSwitch {
    /// Axis this switch branches on.
    pub fn axis(&self) -> Axis {
        match self {
            BiomeSwitch::Water { .. } => Axis::Water,
            BiomeSwitch::Range { axis, .. } => *axis,
        }
    }

    fn output_mut(&mut self, output: usize) -> Option<&mut Vec<NodeId>> {
        match self {
            BiomeSwitch::Water { terrestrial, .. } if output == 0 => Some(terrestrial),
            BiomeSwitch::Water { aquatic, .. } if output == 1 => Some(aquatic),
            BiomeSwitch::Water { .. } => None,
            BiomeSwitch::Range { ranges, .. } => ranges.get_mut(output).map(|r| &mut r.output),
        }
    }
}

/// Terminal node. The compiler writes the assigned biome back into `biome`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BiomeLeaf {
    pub biome: Option<PartialBiome>,
}

/// A node of the switch graph.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphNode {
    Switch(BiomeSwitch),
    Leaf(BiomeLeaf),
    PassThrough(Vec<NodeId>),
}

impl GraphNode {
    /// Water switch with both outputs disconnected.
    pub fn water_switch() -> Self {
        GraphNode::Switch(BiomeSwitch::Water {
            terrestrial: Vec::new(),
            aquatic: Vec::new(),
        })
    }

    /// Continuous switch over `axis`.
    pub fn range_switch(axis: Axis, ranges: Vec<SwitchRange>) -> Self {
        GraphNode::Switch(BiomeSwitch::Range { axis, ranges })
    }

    /// Leaf with no biome assigned yet.
    pub fn leaf() -> Self {
        GraphNode::Leaf(BiomeLeaf::default())
    }

    /// Pass-through with nothing attached.
    pub fn pass_through() -> Self {
        GraphNode::PassThrough(Vec::new())
    }
}

/// Arena of graph nodes.
#[derive(Clone, Debug, Default)]
pub struct SwitchGraph {
    nodes: Vec<GraphNode>,
}

impl SwitchGraph {
    /// Empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its id. Ids are dense and start at `0`.
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Node with the given id.
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Mutable access to the node with the given id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut GraphNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attaches `to` to output `output` of `from`.
    ///
    /// Pass-through nodes have a single forwarding list and ignore `output`.
    ///
    /// # Errors
    ///
    /// Fails if either node is unknown, the output index does not exist, or
    /// `from` is a leaf.
    pub fn connect(&mut self, from: NodeId, output: usize, to: NodeId) -> Result<(), GraphError> {
        if self.node(to).is_none() {
            return Err(GraphError::UnknownNode(to));
        }
        let outputs = match self.node_mut(from) {
            None => return Err(GraphError::UnknownNode(from)),
            Some(GraphNode::Leaf(_)) => return Err(GraphError::LeafOutput(from)),
            Some(GraphNode::PassThrough(forward)) => forward,
            Some(GraphNode::Switch(switch)) => switch
                .output_mut(output)
                .ok_or(GraphError::NoSuchOutput { node: from, output })?,
        };
        outputs.push(to);
        Ok(())
    }

    /// Leaf biome written by the last compile, if any.
    pub fn leaf_biome(&self, id: NodeId) -> Option<&PartialBiome> {
        match self.node(id) {
            Some(GraphNode::Leaf(leaf)) => leaf.biome.as_ref(),
            _ => None,
        }
    }
}
