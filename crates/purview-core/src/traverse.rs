//! Generic stateful traversal over the graph container
//!
//! BFS and DFS share one contract: a `process` callback decides, per
//! first-visited vertex, whether it joins the result, whether its neighbors
//! are expanded, and what state its children inherit; a `filter` gates
//! which neighbors are candidates at all. The DFS additionally offers a
//! post-order hook for bottom-up aggregation. Callbacks are read-only with
//! respect to graph topology — traversal reads adjacency live.

use std::collections::{HashSet, VecDeque};

use crate::graph::Graph;
use crate::model::{EdgeId, Vertex, VertexId};

/// Verdict of a `process` callback at one vertex.
pub struct Visit<S> {
    /// Include the vertex in the traversal result.
    pub accept: bool,
    /// Enqueue/recurse into the vertex's neighbors.
    pub expand: bool,
    /// State threaded to every neighbor expanded from here.
    pub state: S,
}

impl<S> Visit<S> {
    /// Unconditional verdict: accept the vertex and keep expanding.
    pub fn accept(state: S) -> Self {
        Visit {
            accept: true,
            expand: true,
            state,
        }
    }
}

impl Graph {
    /// Breadth-first traversal from `start`.
    ///
    /// `process(vertex, incoming_edge, inherited_state)` runs once per
    /// vertex, at dequeue, before expansion; the incoming edge is `None`
    /// for `start`. Each vertex is visited at most once. Results are in
    /// discovery order. An unknown `start` handle yields an empty result.
    pub fn bfs<S, F, P>(&self, start: VertexId, init: S, filter: F, mut process: P) -> Vec<VertexId>
    where
        S: Clone,
        F: Fn(&Vertex) -> bool,
        P: FnMut(VertexId, Option<EdgeId>, &S) -> Visit<S>,
    {
        let mut result = Vec::new();
        if self.vertex(start).is_none() {
            return result;
        }
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back((start, None, init));

        while let Some((v, via, state)) = queue.pop_front() {
            let visit = process(v, via, &state);
            if visit.accept {
                result.push(v);
            }
            if !visit.expand {
                continue;
            }
            for (id, edge) in self.incident(v) {
                if edge.directed && edge.source != v {
                    continue;
                }
                let neighbor = edge.other(v);
                match self.vertex(neighbor) {
                    Some(vx) if filter(vx) => {}
                    _ => continue,
                }
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, Some(id), visit.state.clone()));
                }
            }
        }
        result
    }

    /// BFS with the default verdict: every vertex accepted and expanded.
    pub fn bfs_all<F>(&self, start: VertexId, filter: F) -> Vec<VertexId>
    where
        F: Fn(&Vertex) -> bool,
    {
        self.bfs(start, (), filter, |_, _, _| Visit::accept(()))
    }

    /// Depth-first traversal from `start`; `process` runs at entry.
    pub fn dfs<S, F, P>(&self, start: VertexId, init: S, filter: F, process: P) -> Vec<VertexId>
    where
        S: Clone,
        F: Fn(&Vertex) -> bool,
        P: FnMut(VertexId, Option<EdgeId>, &S) -> Visit<S>,
    {
        self.dfs_post(start, init, filter, process, |_, _, _: &S| {})
    }

    /// DFS with the default verdict: every vertex accepted and expanded.
    pub fn dfs_all<F>(&self, start: VertexId, filter: F) -> Vec<VertexId>
    where
        F: Fn(&Vertex) -> bool,
    {
        self.dfs(start, (), filter, |_, _, _| Visit::accept(()))
    }

    /// DFS with a post-order hook.
    ///
    /// `before_pop(vertex, incoming_edge, state)` fires after all of a
    /// vertex's children have been fully processed, receiving the state
    /// `process` returned there — the same state the children inherited.
    /// That is the mechanism for bottom-up aggregation ("mark the ancestor
    /// if any descendant qualified"). The hook does not fire for vertices
    /// `process` declined to expand.
    pub fn dfs_post<S, F, P, B>(
        &self,
        start: VertexId,
        init: S,
        filter: F,
        mut process: P,
        mut before_pop: B,
    ) -> Vec<VertexId>
    where
        S: Clone,
        F: Fn(&Vertex) -> bool,
        P: FnMut(VertexId, Option<EdgeId>, &S) -> Visit<S>,
        B: FnMut(VertexId, Option<EdgeId>, &S),
    {
        let mut result = Vec::new();
        if self.vertex(start).is_none() {
            return result;
        }
        let mut visited = HashSet::new();
        self.dfs_visit(
            start,
            None,
            init,
            &mut visited,
            &mut result,
            &filter,
            &mut process,
            &mut before_pop,
        );
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn dfs_visit<S, F, P, B>(
        &self,
        v: VertexId,
        via: Option<EdgeId>,
        state: S,
        visited: &mut HashSet<VertexId>,
        result: &mut Vec<VertexId>,
        filter: &F,
        process: &mut P,
        before_pop: &mut B,
    ) where
        S: Clone,
        F: Fn(&Vertex) -> bool,
        P: FnMut(VertexId, Option<EdgeId>, &S) -> Visit<S>,
        B: FnMut(VertexId, Option<EdgeId>, &S),
    {
        visited.insert(v);
        let visit = process(v, via, &state);
        if visit.accept {
            result.push(v);
        }
        if !visit.expand {
            return;
        }
        for (id, edge) in self.incident(v) {
            if edge.directed && edge.source != v {
                continue;
            }
            let neighbor = edge.other(v);
            match self.vertex(neighbor) {
                Some(vx) if filter(vx) => {}
                _ => continue,
            }
            if !visited.contains(&neighbor) {
                self.dfs_visit(
                    neighbor,
                    Some(id),
                    visit.state.clone(),
                    visited,
                    result,
                    filter,
                    process,
                    before_pop,
                );
            }
        }
        before_pop(v, via, &visit.state);
    }
}
