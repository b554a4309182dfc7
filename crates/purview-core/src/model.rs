//! Core data structures for the organization graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable handle to a vertex in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u64);

/// Stable handle to an edge in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

/// Discriminates what a vertex represents in the organization graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// A person; connects to org units through plain membership edges.
    User,
    /// Organizational grouping; mediates user access to assets.
    OrgUnit,
    /// A node of the asset hierarchy; tree edges run parent → child.
    Asset,
    /// Id prefix not recognized.
    Unknown,
}

impl VertexKind {
    /// Derive the kind from the id prefix before `:` (`u:1`, `ou:3`, `a:7`).
    ///
    /// The kind is computed once at construction and stored as a tag so
    /// traversal hot paths never re-split the id.
    pub fn from_id(id: &str) -> Self {
        match id.split(':').next() {
            Some("u") => VertexKind::User,
            Some("ou") => VertexKind::OrgUnit,
            Some("a") => VertexKind::Asset,
            _ => VertexKind::Unknown,
        }
    }
}

/// Propagation semantics carried by a grant/exclusion edge.
///
/// Only org-unit → asset edges are interpreted this way, but the
/// representation is generic: membership and tree edges carry `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeSymbol {
    /// `-` grants this asset only.
    Normal,
    /// `~` grants this asset and, recursively, all tree descendants.
    NormalApplyChildren,
    /// `x` revokes this asset only, overriding any grant.
    Excluded,
    /// `~x` revokes this asset and all descendants, and halts downward
    /// propagation of any ancestor's apply-children grant.
    ExcludedApplyChildren,
}

impl EdgeSymbol {
    /// Wire token for this symbol.
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeSymbol::Normal => "-",
            EdgeSymbol::NormalApplyChildren => "~",
            EdgeSymbol::Excluded => "x",
            EdgeSymbol::ExcludedApplyChildren => "~x",
        }
    }

    /// Parse a wire token back into a symbol.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "-" => Some(EdgeSymbol::Normal),
            "~" => Some(EdgeSymbol::NormalApplyChildren),
            "x" => Some(EdgeSymbol::Excluded),
            "~x" => Some(EdgeSymbol::ExcludedApplyChildren),
            _ => None,
        }
    }

    /// True for both exclusion variants.
    pub fn is_exclude(&self) -> bool {
        matches!(
            self,
            EdgeSymbol::Excluded | EdgeSymbol::ExcludedApplyChildren
        )
    }
}

impl fmt::Display for EdgeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vertex of the organization graph.
///
/// `incident` is insertion-ordered; every traversal and "first match" rule
/// in the crate leans on that order for reproducibility. `parent` and
/// `parent_edge` are maintained exclusively by [`crate::Graph`] as tree
/// edges come and go — they are never independently settable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vertex {
    pub id: String,
    pub kind: VertexKind,
    pub(crate) incident: Vec<EdgeId>,
    pub(crate) parent: Option<VertexId>,
    pub(crate) parent_edge: Option<EdgeId>,
}

impl Vertex {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let kind = VertexKind::from_id(&id);
        Vertex {
            id,
            kind,
            incident: Vec::new(),
            parent: None,
            parent_edge: None,
        }
    }

    /// Handle of the tree parent, if any.
    pub fn parent(&self) -> Option<VertexId> {
        self.parent
    }

    /// Handle of the tree edge that established `parent`.
    pub fn parent_edge(&self) -> Option<EdgeId> {
        self.parent_edge
    }

    /// Incident edge handles in insertion order.
    pub fn incident_edges(&self) -> &[EdgeId] {
        &self.incident
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// A directed or undirected edge between two vertices.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    pub symbol: EdgeSymbol,
    pub directed: bool,
    pub is_tree: bool,
}

impl Edge {
    /// An undirected, non-tree edge (membership and grant edges).
    pub fn new(source: VertexId, target: VertexId, symbol: EdgeSymbol) -> Self {
        Edge {
            source,
            target,
            symbol,
            directed: false,
            is_tree: false,
        }
    }

    /// A directed tree edge `source → target` with symbol `Normal`.
    pub fn tree(source: VertexId, target: VertexId) -> Self {
        Edge {
            source,
            target,
            symbol: EdgeSymbol::Normal,
            directed: true,
            is_tree: true,
        }
    }

    /// The endpoint that is not `v`.
    pub fn other(&self, v: VertexId) -> VertexId {
        if v == self.source {
            self.target
        } else {
            self.source
        }
    }

    /// Identity tuple; the graph's edge collection is a set over this key.
    pub(crate) fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source,
            target: self.target,
            symbol: self.symbol,
            directed: self.directed,
            is_tree: self.is_tree,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeKey {
    source: VertexId,
    target: VertexId,
    symbol: EdgeSymbol,
    directed: bool,
    is_tree: bool,
}
