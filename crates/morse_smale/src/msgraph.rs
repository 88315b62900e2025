//! Morse–Smale graph construction: critical cells as nodes, connected by an
//! edge whenever a V-path runs from one to the other with no other critical
//! cell along the way. Distinct V-paths between the same pair of critical
//! cells become distinct parallel edges, since [`petgraph::graph::UnGraph`]
//! allows them natively.

use std::collections::HashMap;
use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};

use crate::cell::{self, CellId, GridShape};
use crate::gradient::Gradient;

/// Node payload for a critical cell in the Morse–Smale graph.
#[derive(Clone, Copy, Debug)]
pub struct NodeData {
    pub cell: CellId,
    pub morse_index: u8,
    pub x: f64,
    pub y: f64,
}

/// The Morse–Smale graph: a multigraph over critical cells.
pub struct MsGraph {
    pub graph: UnGraph<NodeData, ()>,
    pub(crate) node_of: HashMap<CellId, NodeIndex>,
}

impl MsGraph {
    pub fn node_index(&self, cell: CellId) -> Option<NodeIndex> {
        self.node_of.get(&cell).copied()
    }

    /// Saddle's two min-valued neighbours (Morse index 0).
    pub fn min_neighbors(&self, saddle: CellId) -> Vec<CellId> {
        self.neighbors_with_index(saddle, 0)
    }

    /// Saddle's two max-valued neighbours (Morse index 2).
    pub fn max_neighbors(&self, saddle: CellId) -> Vec<CellId> {
        self.neighbors_with_index(saddle, 2)
    }

    fn neighbors_with_index(&self, cell: CellId, morse_index: u8) -> Vec<CellId> {
        let Some(node) = self.node_index(cell) else {
            return Vec::new();
        };
        self.graph
            .neighbors(node)
            .filter(|&n| self.graph[n].morse_index == morse_index)
            .map(|n| self.graph[n].cell)
            .collect()
    }
}

/// Builds the Morse–Smale graph from a gradient: nodes are critical cells
/// (with Morse index and position attributes), edges connect a saddle to
/// each extremum reachable by following gradient arrows away from one of
/// the saddle's facets.
pub fn build(shape: GridShape, gradient: &Gradient, critical: &[CellId]) -> MsGraph {
    let mut graph = UnGraph::<NodeData, ()>::with_capacity(critical.len(), critical.len() * 2);
    let mut node_of = HashMap::with_capacity(critical.len());

    for &c in critical {
        let morse_index = cell::dim(shape, c);
        let pos = cell::coords(shape, c);
        let node = graph.add_node(NodeData {
            cell: c,
            morse_index,
            x: pos.x,
            y: pos.y,
        });
        node_of.insert(c, node);
    }

    for &cidx in critical {
        let dimension = cell::dim(shape, cidx);
        if dimension == 0 {
            continue;
        }
        let mut queue: VecDeque<CellId> = VecDeque::new();
        for &face in cell::facets(shape, cidx).as_slice() {
            if gradient.is_critical(face) {
                graph.add_edge(node_of[&cidx], node_of[&face], ());
            } else if let Some(partner) = gradient.arrow(face) {
                // an outgoing arrow: the pair points from the lower cell to the
                // higher one, so `partner > face` means this facet is where the
                // V-path leaves `cidx` towards a lower critical cell.
                if partner.0 > face.0 {
                    queue.push_front(face);
                }
            }
        }
        while let Some(a) = queue.pop_back() {
            let b = gradient.arrow(a).expect("queued cell must be paired");
            for &face in cell::facets(shape, b).as_slice() {
                if face == a {
                    continue;
                }
                if gradient.is_critical(face) {
                    graph.add_edge(node_of[&cidx], node_of[&face], ());
                } else if let Some(partner) = gradient.arrow(face) {
                    if partner.0 > face.0 {
                        queue.push_front(face);
                    }
                }
            }
        }
    }

    MsGraph { graph, node_of }
}
