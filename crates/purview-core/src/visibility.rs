//! Effective-visibility resolution over the organization graph
//!
//! Four pure queries built on the traversal engine, all confined to the
//! asset side of the graph (`neighbor filter: kind == Asset`). A grant
//! propagates downward once started by an apply-children symbol and is
//! only halted by an apply-children exclusion; a plain exclusion blocks a
//! single asset. String ids that do not resolve fail with `NotFound`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::Graph;
use crate::model::{EdgeSymbol, VertexId, VertexKind};
use crate::traverse::Visit;

/// Result of [`check_visibility`]: the scaffold of a queried subtree plus
/// every visited vertex the user may not see.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Visibility {
    /// Every vertex that is itself visible or is an ancestor of a visible
    /// vertex — the minimal connected scaffold reachable from the root.
    pub included_in_tree: HashSet<VertexId>,
    /// Every visited vertex that is not individually visible, scaffold
    /// member or not.
    pub unauthorized: HashSet<VertexId>,
}

/// Assets a user can see through their org-unit grants.
///
/// One DFS per org unit adjacent to the user, with boolean state
/// "currently propagating an apply-children grant". At each asset the
/// first incident edge back to the originating org unit carrying an
/// exclusion symbol decides: any exclusion drops the asset itself, and the
/// apply-children variant additionally halts downward propagation.
pub fn visible_assets(graph: &Graph, user_id: &str) -> Result<HashSet<VertexId>> {
    let user = graph.vertex_id(user_id)?;
    let org_units: Vec<VertexId> = graph.incident(user).map(|(_, e)| e.other(user)).collect();

    let mut assets = HashSet::new();
    for ou in org_units {
        let granted = graph.dfs(
            ou,
            false,
            |v| v.kind == VertexKind::Asset,
            |v, via, expanding: &bool| {
                if v == ou {
                    // The org unit itself is not a grant target.
                    return Visit {
                        accept: false,
                        expand: true,
                        state: *expanding,
                    };
                }
                let first_exclude = graph
                    .incident(v)
                    .map(|(_, e)| e)
                    .find(|e| e.other(v) == ou && e.symbol.is_exclude());
                let arrived_apply_children = via
                    .and_then(|id| graph.edge(id))
                    .map_or(false, |e| e.symbol == EdgeSymbol::NormalApplyChildren);
                let halted = first_exclude
                    .map_or(false, |e| e.symbol == EdgeSymbol::ExcludedApplyChildren);
                let expand = (*expanding || arrived_apply_children) && !halted;
                Visit {
                    accept: first_exclude.is_none(),
                    expand,
                    state: expand,
                }
            },
        );
        assets.extend(granted);
    }
    Ok(assets)
}

/// Reconcile a user's visible assets with the asset tree under
/// `root_asset_id`.
///
/// Pre-order records every non-visible vertex as unauthorized; post-order
/// builds the scaffold bottom-up: a vertex joins `included_in_tree` when
/// it is itself visible or one of its children already qualified, and it
/// pulls its parent in with it.
pub fn check_visibility(graph: &Graph, user_id: &str, root_asset_id: &str) -> Result<Visibility> {
    let visible = visible_assets(graph, user_id)?;
    let root = graph.vertex_id(root_asset_id)?;

    let mut included_in_tree = HashSet::new();
    let mut unauthorized = HashSet::new();
    graph.dfs_post(
        root,
        true,
        |v| v.kind == VertexKind::Asset,
        |v, _, _: &bool| {
            let is_visible = visible.contains(&v);
            if !is_visible {
                unauthorized.insert(v);
            }
            Visit {
                accept: false,
                expand: true,
                state: is_visible,
            }
        },
        |v, _, is_visible: &bool| {
            if *is_visible || included_in_tree.contains(&v) {
                included_in_tree.insert(v);
                if let Some(parent) = graph.parent_of(v) {
                    included_in_tree.insert(parent);
                }
            }
        },
    );

    Ok(Visibility {
        included_in_tree,
        unauthorized,
    })
}

/// Minimal reveal of the nearest authorized descendant of an asset.
///
/// BFS order makes the first hit the nearest by edge count (ties broken by
/// incident-edge order). The result starts with the asset itself, then the
/// upward parent walk from the hit (stopping before the asset's direct
/// child), then the asset's direct tree children that are in the scaffold.
/// `[asset]` alone when nothing qualifies.
pub fn first_visible_asset_tree(
    graph: &Graph,
    asset_id: &str,
    visibility: &Visibility,
) -> Result<Vec<VertexId>> {
    let asset = graph.vertex_id(asset_id)?;

    let mut found = false;
    let first_visible = graph
        .bfs(
            asset,
            (),
            |v| v.kind == VertexKind::Asset,
            |v, _, _| {
                if found {
                    return Visit {
                        accept: false,
                        expand: false,
                        state: (),
                    };
                }
                if v == asset {
                    return Visit {
                        accept: false,
                        expand: true,
                        state: (),
                    };
                }
                let included = visibility.included_in_tree.contains(&v);
                found = included && !visibility.unauthorized.contains(&v);
                Visit {
                    accept: found,
                    expand: !found,
                    state: (),
                }
            },
        )
        .into_iter()
        .next();

    let mut tree = vec![asset];
    if let Some(first) = first_visible {
        let mut current = Some(first);
        while let Some(v) = current {
            if graph.parent_of(v) == Some(asset) {
                break;
            }
            tree.push(v);
            current = graph.parent_of(v);
        }
        for child in graph.tree_children(asset) {
            if visibility.included_in_tree.contains(&child) {
                tree.push(child);
            }
        }
    }
    Ok(tree)
}

/// Every scaffold vertex reachable from the root asset, in BFS order.
pub fn full_asset_tree(
    graph: &Graph,
    included_in_tree: &HashSet<VertexId>,
    root_asset_id: &str,
) -> Result<Vec<VertexId>> {
    let root = graph.vertex_id(root_asset_id)?;
    Ok(graph.bfs(
        root,
        (),
        |v| v.kind == VertexKind::Asset,
        |v, _, _| {
            let included = included_in_tree.contains(&v);
            Visit {
                accept: included,
                expand: included,
                state: (),
            }
        },
    ))
}
