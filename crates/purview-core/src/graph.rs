//! Graph container over petgraph::StableDiGraph with string-id indexing
//!
//! The container is the sole mutation surface: vertices and edges never
//! register themselves anywhere. Adjacency (per-vertex incident lists) and
//! tree parent back-references are maintained incrementally on every
//! mutation, and edges behave as a set over their identity tuple.

use std::collections::HashMap;
use std::fmt;

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};

use crate::error::{GraphError, Result};
use crate::model::{Edge, EdgeId, EdgeKey, EdgeSymbol, Vertex, VertexId};

pub struct Graph {
    inner: StableDiGraph<Vertex, Edge>,
    /// Id index: globally unique string id → vertex handle.
    ids: HashMap<String, VertexId>,
    /// Set semantics over the edge identity tuple.
    edge_keys: HashMap<EdgeKey, EdgeId>,
    /// Edge handles in insertion order; serialization and `all_edges`
    /// iterate this so output is reproducible for a given construction
    /// sequence.
    edge_order: Vec<EdgeId>,
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("vertex_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            ids: HashMap::new(),
            edge_keys: HashMap::new(),
            edge_order: Vec::new(),
        }
    }

    /// Add a vertex. Returns the assigned handle, or the existing handle
    /// unchanged if the id is already present.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        if let Some(&existing) = self.ids.get(&vertex.id) {
            return existing;
        }
        let id = vertex.id.clone();
        let idx = self.inner.add_node(vertex);
        let handle = VertexId(idx.index() as u64);
        self.ids.insert(id, handle);
        handle
    }

    /// Resolve a string id to a handle. Fails with `NotFound`; use
    /// [`Graph::ensure_vertex`] for the upsert mode.
    pub fn vertex_id(&self, id: &str) -> Result<VertexId> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    /// Resolve a string id, lazily creating a fresh vertex if absent.
    pub fn ensure_vertex(&mut self, id: &str) -> VertexId {
        match self.ids.get(id) {
            Some(&existing) => existing,
            None => self.add_vertex(Vertex::new(id)),
        }
    }

    /// Get a vertex by handle.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.inner.node_weight(NodeIndex::new(id.0 as usize))
    }

    /// Get an edge by handle.
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.inner.edge_weight(EdgeIndex::new(id.0 as usize))
    }

    /// Whether a vertex with this string id exists.
    pub fn contains_vertex(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// Total number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all vertices.
    pub fn all_vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Iterate over all edges in insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edge_order
            .iter()
            .filter_map(move |&id| self.edge(id).map(|e| (id, e)))
    }

    /// Incident edges of a vertex in insertion order.
    pub fn incident(&self, v: VertexId) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.vertex(v).into_iter().flat_map(move |vx| {
            vx.incident
                .iter()
                .filter_map(move |&id| self.edge(id).map(|e| (id, e)))
        })
    }

    /// Tree parent of a vertex, if any.
    pub fn parent_of(&self, v: VertexId) -> Option<VertexId> {
        self.vertex(v).and_then(|vx| vx.parent)
    }

    /// Direct tree children of a vertex, in incident-edge order.
    pub fn tree_children(&self, v: VertexId) -> impl Iterator<Item = VertexId> {
        self.incident(v)
            .filter(move |(_, e)| e.is_tree && e.source == v)
            .map(|(_, e)| e.target)
    }

    /// Add an edge. Both endpoints must already live in this graph.
    ///
    /// Re-adding an edge equal by its identity tuple is a no-op that
    /// returns the existing handle; incident lists are left untouched.
    /// A tree edge sets `parent`/`parent_edge` on its target.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeId> {
        let source = NodeIndex::new(edge.source.0 as usize);
        let target = NodeIndex::new(edge.target.0 as usize);
        if self.inner.node_weight(source).is_none() {
            return Err(GraphError::NotFound(format!("#{}", edge.source.0)));
        }
        if self.inner.node_weight(target).is_none() {
            return Err(GraphError::NotFound(format!("#{}", edge.target.0)));
        }
        if let Some(&existing) = self.edge_keys.get(&edge.key()) {
            return Ok(existing);
        }

        let idx = self.inner.add_edge(source, target, edge);
        let id = EdgeId(idx.index() as u64);
        self.edge_keys.insert(edge.key(), id);
        self.edge_order.push(id);

        if let Some(vx) = self.inner.node_weight_mut(source) {
            vx.incident.push(id);
        }
        if edge.source != edge.target {
            if let Some(vx) = self.inner.node_weight_mut(target) {
                vx.incident.push(id);
            }
        }
        if edge.is_tree {
            if let Some(vx) = self.inner.node_weight_mut(target) {
                vx.parent = Some(edge.source);
                vx.parent_edge = Some(id);
            }
        }
        Ok(id)
    }

    /// Remove an edge by handle, detaching it from both endpoints and
    /// clearing the target's parent if it was the tree edge.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = *self.edge(id)?;
        self.edge_keys.remove(&edge.key());
        self.edge_order.retain(|&e| e != id);

        for endpoint in [edge.source, edge.target] {
            let idx = NodeIndex::new(endpoint.0 as usize);
            if let Some(vx) = self.inner.node_weight_mut(idx) {
                vx.incident.retain(|&e| e != id);
                if vx.parent_edge == Some(id) {
                    vx.parent = None;
                    vx.parent_edge = None;
                }
            }
        }
        self.inner.remove_edge(EdgeIndex::new(id.0 as usize))
    }

    /// Remove the first edge between two ids that matches structurally, in
    /// the from-vertex's incident order. The symbol filter is optional;
    /// without it, edges sharing endpoints but differing in symbol are
    /// candidates in insertion order.
    pub fn remove_edge_between(
        &mut self,
        from_id: &str,
        to_id: &str,
        directed: bool,
        symbol: Option<EdgeSymbol>,
    ) -> Result<Option<Edge>> {
        let from = self.vertex_id(from_id)?;
        let to = self.vertex_id(to_id)?;
        let found = self
            .incident(from)
            .find(|(_, e)| {
                e.source == from
                    && e.target == to
                    && e.directed == directed
                    && symbol.map_or(true, |s| e.symbol == s)
            })
            .map(|(id, _)| id);
        match found {
            Some(id) => Ok(self.remove_edge(id)),
            None => Ok(None),
        }
    }

    /// Remove a vertex and every incident edge. Children parented under it
    /// lose their parent through the tree-edge removal path.
    pub fn remove_vertex(&mut self, id: VertexId) -> Option<Vertex> {
        let incident: Vec<EdgeId> = self.vertex(id)?.incident.clone();
        for edge in incident {
            self.remove_edge(edge);
        }
        let vertex = self.inner.remove_node(NodeIndex::new(id.0 as usize))?;
        self.ids.remove(&vertex.id);
        Some(vertex)
    }

    /// Re-parent an asset: remove any existing tree edge into it, then add
    /// a fresh directed tree edge `new_parent → asset` with symbol
    /// `Normal`. This is the only legal way to change a parent.
    pub fn change_parent(&mut self, asset_id: &str, new_parent_id: &str) -> Result<EdgeId> {
        let asset = self.vertex_id(asset_id)?;
        let parent = self.vertex_id(new_parent_id)?;
        if let Some(old) = self.vertex(asset).and_then(|vx| vx.parent_edge) {
            self.remove_edge(old);
        }
        tracing::debug!(asset = asset_id, parent = new_parent_id, "re-parented asset");
        self.add_edge(Edge::tree(parent, asset))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Graph {
    /// One `from symbol to` line per edge, in insertion order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (_, edge) in self.all_edges() {
            let (Some(from), Some(to)) = (self.vertex(edge.source), self.vertex(edge.target))
            else {
                continue;
            };
            if !first {
                writeln!(f)?;
            }
            write!(f, "{} {} {}", from.id, edge.symbol, to.id)?;
            first = false;
        }
        Ok(())
    }
}
