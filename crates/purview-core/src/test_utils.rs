//! Test fixtures for purview-core

use crate::graph::Graph;
use crate::model::{Edge, EdgeSymbol, Vertex};

/// Connect two vertices by string id with an undirected edge.
pub fn connect(graph: &mut Graph, from: &str, to: &str, symbol: EdgeSymbol) {
    let source = graph.vertex_id(from).unwrap();
    let target = graph.vertex_id(to).unwrap();
    graph.add_edge(Edge::new(source, target, symbol)).unwrap();
}

/// Add a directed tree edge `parent → child` by string id.
pub fn tree_edge(graph: &mut Graph, parent: &str, child: &str) {
    let source = graph.vertex_id(parent).unwrap();
    let target = graph.vertex_id(child).unwrap();
    graph.add_edge(Edge::tree(source, target)).unwrap();
}

/// The worked organization fixture: five org units, two users, and a
/// twelve-asset tree rooted at `a:1`.
///
/// ```text
/// a:1 ── a:2 ── a:4 ── a:8 ── a:10, a:11
///     │      │      └─ a:9 ── a:12
///     │      └─ a:5 ── a:6
///     └─ a:3 ── a:7
/// ```
///
/// u:1 belongs to ou:1, ou:2, ou:3, ou:5; u:2 belongs to ou:4. Grants:
/// ou:2 and ou:3 see a:1; ou:4 sees a:3 and a:2 (apply-children); ou:5
/// sees a:7, a:2 and a:9 (apply-children) but excludes a:4 with
/// apply-children.
pub fn sample_org_graph() -> Graph {
    let mut graph = Graph::new();

    for n in 1..=5 {
        graph.add_vertex(Vertex::new(format!("ou:{n}")));
    }
    for n in 1..=2 {
        graph.add_vertex(Vertex::new(format!("u:{n}")));
    }
    for n in 1..=12 {
        graph.add_vertex(Vertex::new(format!("a:{n}")));
    }

    for ou in ["ou:1", "ou:2", "ou:3", "ou:5"] {
        connect(&mut graph, "u:1", ou, EdgeSymbol::Normal);
    }
    connect(&mut graph, "u:2", "ou:4", EdgeSymbol::Normal);

    connect(&mut graph, "ou:2", "a:1", EdgeSymbol::Normal);
    connect(&mut graph, "ou:3", "a:1", EdgeSymbol::Normal);
    connect(&mut graph, "ou:4", "a:3", EdgeSymbol::Normal);
    connect(&mut graph, "ou:5", "a:7", EdgeSymbol::Normal);

    connect(&mut graph, "ou:5", "a:2", EdgeSymbol::NormalApplyChildren);
    connect(&mut graph, "ou:5", "a:9", EdgeSymbol::NormalApplyChildren);
    connect(&mut graph, "ou:4", "a:2", EdgeSymbol::NormalApplyChildren);

    connect(&mut graph, "ou:5", "a:4", EdgeSymbol::ExcludedApplyChildren);

    for (parent, child) in [
        ("a:1", "a:2"),
        ("a:1", "a:3"),
        ("a:2", "a:4"),
        ("a:2", "a:5"),
        ("a:5", "a:6"),
        ("a:3", "a:7"),
        ("a:4", "a:8"),
        ("a:4", "a:9"),
        ("a:8", "a:10"),
        ("a:8", "a:11"),
        ("a:9", "a:12"),
    ] {
        tree_edge(&mut graph, parent, child);
    }

    graph
}
