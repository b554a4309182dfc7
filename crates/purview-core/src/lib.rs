//! Purview Core — organization graph model, traversal engine, and
//! effective-visibility resolution
//!
//! Users connect to org units by membership edges, org units connect to
//! assets by grant/exclusion edges with propagation semantics, and assets
//! form a directed tree. The crate answers which assets a user can see,
//! which subtree scaffold contains them, and where the nearest visible
//! descendant sits — and round-trips the whole graph through a compact
//! two-mode text format.

pub mod codec;
pub mod error;
pub mod graph;
pub mod model;
pub mod traverse;
pub mod visibility;


#[cfg(test)]
pub mod test_utils;

pub use codec::{COMPRESSED_MARKER, RAW_MARKER, decode, encode};
pub use error::{GraphError, Result};
pub use graph::Graph;
pub use model::{Edge, EdgeId, EdgeSymbol, Vertex, VertexId, VertexKind};
pub use traverse::Visit;
pub use visibility::{
    Visibility, check_visibility, first_visible_asset_tree, full_asset_tree, visible_assets,
};
