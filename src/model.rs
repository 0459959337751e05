use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::connection::HandlePair;
use crate::error::EditorError;
use crate::ir::{Edge, EdgePatch, EdgeSpec, Node, NodePatch, NodeSpec, Point};

/// Immutable capture of the whole graph, as stored in the edit history.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Canonical nodes and edges of one editor session.
///
/// Insertion order is preserved; the layout engine uses it to order nodes
/// inside a region.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from already-typed parts, enforcing every invariant.
    pub fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Self, EditorError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for node in &nodes {
            if node.id.is_empty() {
                return Err(EditorError::EmptyId("node"));
            }
            if !seen.insert(node.id.as_str()) {
                return Err(EditorError::DuplicateNode(node.id.clone()));
            }
        }
        let mut edge_ids: HashSet<&str> = HashSet::new();
        for edge in &edges {
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(EditorError::DuplicateEdge(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !seen.contains(endpoint.as_str()) {
                    return Err(EditorError::UnknownNode(endpoint.clone()));
                }
            }
            if edge.source == edge.target {
                return Err(EditorError::SelfLoop(edge.source.clone()));
            }
        }
        let mut nodes = nodes;
        for node in &mut nodes {
            node.region = node.category.region();
        }
        Ok(Self { nodes, edges })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn edges_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Replaces the whole graph with a history entry.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.nodes = snapshot.nodes.clone();
        self.edges = snapshot.edges.clone();
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> Result<Snapshot, EditorError> {
        let id = match spec.id {
            Some(id) if id.trim().is_empty() => return Err(EditorError::EmptyId("node")),
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };
        if self.contains_node(&id) {
            return Err(EditorError::DuplicateNode(id));
        }
        debug!(node = %id, "adding process");
        self.nodes.push(Node {
            region: spec.category.region(),
            id,
            label: spec.label,
            category: spec.category,
            change: spec.change,
            is_target: spec.is_target,
            is_moderator: spec.is_moderator,
            position: Point::default(),
        });
        Ok(self.snapshot())
    }

    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> Result<Snapshot, EditorError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        if let Some(label) = patch.label {
            node.label = label;
        }
        if let Some(category) = patch.category {
            node.region = category.region();
            node.category = category;
        }
        if let Some(change) = patch.change {
            node.change = change;
        }
        if let Some(is_target) = patch.is_target {
            node.is_target = is_target;
        }
        if let Some(is_moderator) = patch.is_moderator {
            node.is_moderator = is_moderator;
        }
        debug!(node = %id, "updated process");
        Ok(self.snapshot())
    }

    /// Removes a node and, in the same mutation, every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Snapshot, EditorError> {
        let idx = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        self.nodes.remove(idx);
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        debug!(
            node = %id,
            cascaded_edges = before - self.edges.len(),
            "removed process"
        );
        Ok(self.snapshot())
    }

    pub fn add_edge(&mut self, spec: EdgeSpec) -> Result<Snapshot, EditorError> {
        for endpoint in [&spec.source, &spec.target] {
            if !self.contains_node(endpoint) {
                return Err(EditorError::UnknownNode(endpoint.clone()));
            }
        }
        if spec.source == spec.target {
            return Err(EditorError::SelfLoop(spec.source));
        }
        let id = match spec.id {
            Some(id) if id.trim().is_empty() => return Err(EditorError::EmptyId("edge")),
            Some(id) if self.edge(&id).is_some() => return Err(EditorError::DuplicateEdge(id)),
            Some(id) => id,
            None => self.next_edge_id(&spec.source, &spec.target),
        };
        debug!(edge = %id, source = %spec.source, target = %spec.target, "adding relation");
        let mut edge = Edge {
            id,
            source: spec.source,
            target: spec.target,
            relation: spec.relation,
            weight: spec.weight,
            polarity: spec.polarity,
            bidirectional: spec.bidirectional,
            reverse_weight: spec.reverse_weight,
            reverse_polarity: spec.reverse_polarity,
            source_handle: spec.source_handle,
            target_handle: spec.target_handle,
        };
        edge.normalize_reverse();
        self.edges.push(edge);
        Ok(self.snapshot())
    }

    pub fn update_edge(&mut self, id: &str, patch: EdgePatch) -> Result<Snapshot, EditorError> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EditorError::UnknownEdge(id.to_string()))?;
        if let Some(relation) = patch.relation {
            edge.relation = relation;
        }
        if let Some(weight) = patch.weight {
            edge.weight = weight;
        }
        if let Some(polarity) = patch.polarity {
            edge.polarity = polarity;
        }
        if let Some(bidirectional) = patch.bidirectional {
            edge.bidirectional = bidirectional;
        }
        if let Some(reverse_weight) = patch.reverse_weight {
            edge.reverse_weight = reverse_weight;
        }
        if let Some(reverse_polarity) = patch.reverse_polarity {
            edge.reverse_polarity = reverse_polarity;
        }
        edge.normalize_reverse();
        debug!(edge = %id, "updated relation");
        Ok(self.snapshot())
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Snapshot, EditorError> {
        let idx = self
            .edges
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EditorError::UnknownEdge(id.to_string()))?;
        self.edges.remove(idx);
        debug!(edge = %id, "removed relation");
        Ok(self.snapshot())
    }

    /// Moves a node inside its region. Layout-owned, so no snapshot.
    pub fn set_position(&mut self, id: &str, position: Point) -> Result<(), EditorError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| EditorError::UnknownNode(id.to_string()))?;
        node.position = position;
        Ok(())
    }

    pub fn set_handles(&mut self, edge_id: &str, handles: HandlePair) -> Result<(), EditorError> {
        let edge = self
            .edges
            .iter_mut()
            .find(|e| e.id == edge_id)
            .ok_or_else(|| EditorError::UnknownEdge(edge_id.to_string()))?;
        edge.source_handle = Some(handles.source);
        edge.target_handle = Some(handles.target);
        Ok(())
    }

    pub(crate) fn next_edge_id(&self, source: &str, target: &str) -> String {
        unique_edge_id(source, target, |id| self.edges.iter().any(|e| e.id == id))
    }
}

/// `e-{source}-{target}`, suffixed `-2`, `-3`, ... when taken.
pub(crate) fn unique_edge_id(source: &str, target: &str, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("e-{source}-{target}");
    if !taken(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or(base)
}
