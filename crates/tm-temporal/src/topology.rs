//! Temporal topology: nodes and edges connected in a complex.
//!
//! Topological primitives carry only connectivity. A node may be realized by
//! an [`Instant`] and an edge by a [`Period`]; every time-related question
//! about them is answered through that realization. The complex owns its
//! primitives and hands out [`NodeId`]/[`EdgeId`] indices.

use serde::{Deserialize, Serialize};

use crate::error::TemporalError;
use crate::primitive::{Instant, Period, TemporalPrimitive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub realization: Option<Instant>,
    /// Edges ending at this node.
    pub previous_edges: Vec<EdgeId>,
    /// Edges starting at this node.
    pub next_edges: Vec<EdgeId>,
}

impl Node {
    pub fn new(realization: Option<Instant>) -> Self {
        Self {
            realization,
            previous_edges: Vec::new(),
            next_edges: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: NodeId,
    pub end: NodeId,
    pub realization: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopologicalPrimitive {
    Node(Node),
    Edge(Edge),
}

impl TopologicalPrimitive {
    /// The geometric primitive realizing this node or edge, if any.
    pub fn realization(&self) -> Option<TemporalPrimitive> {
        match self {
            TopologicalPrimitive::Node(node) => node.realization.clone().map(Into::into),
            TopologicalPrimitive::Edge(edge) => edge.realization.clone().map(Into::into),
        }
    }
}

/// A set of connected nodes and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologicalComplex {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl TopologicalComplex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, realization: Option<Instant>) -> NodeId {
        self.nodes.push(Node::new(realization));
        NodeId(self.nodes.len() - 1)
    }

    /// Connect `start` to `end`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::InvalidArgument`] if either node is not in
    /// this complex, or if the edge's realization does not begin at the
    /// start node's instant and end at the end node's instant (checked only
    /// where both sides are realized).
    pub fn add_edge(
        &mut self,
        start: NodeId,
        end: NodeId,
        realization: Option<Period>,
    ) -> Result<EdgeId, TemporalError> {
        let start_node = self.node(start).ok_or_else(|| unknown_node(start))?;
        let end_node = self.node(end).ok_or_else(|| unknown_node(end))?;

        if let Some(period) = &realization {
            check_realized_at(start_node, period.beginning(), "begin")?;
            check_realized_at(end_node, period.ending(), "end")?;
        }

        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            start,
            end,
            realization,
        });
        self.nodes[start.0].next_edges.push(id);
        self.nodes[end.0].previous_edges.push(id);
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Edges starting at `node`.
    pub fn edges_from(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.node(node)
            .into_iter()
            .flat_map(|n| n.next_edges.iter())
            .filter_map(move |id| self.edge(*id))
    }

    pub fn realize_node(&self, id: NodeId) -> Option<TemporalPrimitive> {
        self.node(id)?.realization.clone().map(Into::into)
    }

    pub fn realize_edge(&self, id: EdgeId) -> Option<TemporalPrimitive> {
        self.edge(id)?.realization.clone().map(Into::into)
    }
}

fn unknown_node(id: NodeId) -> TemporalError {
    TemporalError::InvalidArgument(format!("node {} is not in this complex", id.0))
}

fn check_realized_at(node: &Node, boundary: &Instant, which: &str) -> Result<(), TemporalError> {
    let Some(node_instant) = &node.realization else {
        return Ok(());
    };
    if node_instant.date().is_some() && node_instant.date() == boundary.date() {
        Ok(())
    } else {
        Err(TemporalError::InvalidArgument(format!(
            "edge realization does not {which} at its node's instant"
        )))
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{relative_position, Relation};
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_add_edge_links_nodes() {
        let mut complex = TopologicalComplex::new();
        let a = complex.add_node(Some(Instant::at(day(1))));
        let b = complex.add_node(Some(Instant::at(day(5))));
        let e = complex
            .add_edge(a, b, Some(Period::between(day(1), day(5)).unwrap()))
            .unwrap();

        assert_eq!(complex.node(a).unwrap().next_edges, vec![e]);
        assert_eq!(complex.node(b).unwrap().previous_edges, vec![e]);
        assert_eq!(complex.edges_from(a).count(), 1);
        assert_eq!(complex.edges_from(b).count(), 0);
    }

    #[test]
    fn test_add_edge_unknown_node() {
        let mut complex = TopologicalComplex::new();
        let a = complex.add_node(None);
        let err = complex.add_edge(a, NodeId(7), None).unwrap_err();
        assert!(err.to_string().contains("node 7"), "got: {err}");
    }

    #[test]
    fn test_add_edge_realization_must_match_nodes() {
        let mut complex = TopologicalComplex::new();
        let a = complex.add_node(Some(Instant::at(day(1))));
        let b = complex.add_node(Some(Instant::at(day(5))));
        let err = complex
            .add_edge(a, b, Some(Period::between(day(2), day(5)).unwrap()))
            .unwrap_err();
        assert!(err.to_string().contains("does not begin"), "got: {err}");
        assert_eq!(complex.edges().count(), 0);
    }

    #[test]
    fn test_unrealized_nodes_accept_any_realization() {
        let mut complex = TopologicalComplex::new();
        let a = complex.add_node(None);
        let b = complex.add_node(None);
        assert!(complex
            .add_edge(a, b, Some(Period::between(day(2), day(3)).unwrap()))
            .is_ok());
    }

    #[test]
    fn test_realization_delegates_to_period() {
        let mut complex = TopologicalComplex::new();
        let a = complex.add_node(None);
        let b = complex.add_node(None);
        let c = complex.add_node(None);
        let first = complex
            .add_edge(a, b, Some(Period::between(day(1), day(3)).unwrap()))
            .unwrap();
        let second = complex
            .add_edge(b, c, Some(Period::between(day(3), day(6)).unwrap()))
            .unwrap();

        let x = complex.realize_edge(first).unwrap();
        let y = complex.realize_edge(second).unwrap();
        assert_eq!(relative_position(&x, &y), Some(Relation::Meets));
        assert!(complex.realize_node(a).is_none());
    }

    #[test]
    fn test_topological_primitive_realization() {
        let node = TopologicalPrimitive::Node(Node::new(Some(Instant::at(day(1)))));
        assert_eq!(
            node.realization(),
            Some(TemporalPrimitive::Instant(Instant::at(day(1))))
        );
    }
}
