//! Raw and dictionary-compressed text forms of the whole graph
//!
//! Both forms carry the edge stream only; vertices are recreated on first
//! mention during decode. The leading marker character selects the mode:
//! `R` for the whitespace-separated raw token stream, `C` for the
//! dictionary-compressed fixed-width stream. Decoding always builds into a
//! fresh graph, so a failed load never leaves a target half-populated.

use std::collections::HashMap;

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::model::{Edge, EdgeSymbol};

/// Marker for the raw form.
pub const RAW_MARKER: char = 'R';
/// Marker for the dictionary-compressed form.
pub const COMPRESSED_MARKER: char = 'C';

/// The two code points reserved as structural separators; the dictionary
/// never assigns them.
const SEPARATORS: [char; 2] = [' ', '\n'];

/// Encode a graph into its textual wire form.
pub fn encode(graph: &Graph, compressed: bool) -> Result<String> {
    let payload = if compressed {
        encode_compressed(graph)?
    } else {
        encode_raw(graph)
    };
    tracing::debug!(
        compressed,
        edges = graph.edge_count(),
        bytes = payload.len(),
        "encoded graph"
    );
    Ok(payload)
}

/// Decode a textual payload into a fresh graph.
pub fn decode(text: &str) -> Result<Graph> {
    let mut chars = text.chars();
    match chars.next() {
        Some(RAW_MARKER) => decode_raw(chars.as_str()),
        Some(COMPRESSED_MARKER) => decode_compressed(chars.as_str()),
        _ => Err(GraphError::MalformedPayload(
            "missing format marker".to_string(),
        )),
    }
}

fn flag(value: bool) -> char {
    if value { '1' } else { '0' }
}

fn parse_flag(token: &str) -> Result<bool> {
    match token {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(GraphError::MalformedPayload(format!(
            "invalid flag token `{other}`"
        ))),
    }
}

fn parse_flag_char(c: char) -> Result<bool> {
    match c {
        '1' => Ok(true),
        '0' => Ok(false),
        other => Err(GraphError::MalformedPayload(format!(
            "invalid flag character `{}`",
            other.escape_debug()
        ))),
    }
}

fn parse_symbol(token: &str) -> Result<EdgeSymbol> {
    EdgeSymbol::parse(token)
        .ok_or_else(|| GraphError::MalformedPayload(format!("unknown edge symbol `{token}`")))
}

/// Five tokens per edge, space-separated, one edge per line.
fn encode_raw(graph: &Graph) -> String {
    let mut lines = Vec::with_capacity(graph.edge_count());
    for (_, edge) in graph.all_edges() {
        let (Some(from), Some(to)) = (graph.vertex(edge.source), graph.vertex(edge.target)) else {
            continue;
        };
        lines.push(format!(
            "{} {} {} {} {}",
            from.id,
            edge.symbol,
            to.id,
            flag(edge.directed),
            flag(edge.is_tree),
        ));
    }
    format!("{RAW_MARKER}\n{}", lines.join("\n"))
}

fn decode_raw(body: &str) -> Result<Graph> {
    let tokens: Vec<&str> = body.split_whitespace().collect();
    if tokens.len() % 5 != 0 {
        return Err(GraphError::MalformedPayload(format!(
            "raw token count {} is not a multiple of five",
            tokens.len()
        )));
    }
    let mut graph = Graph::new();
    for group in tokens.chunks(5) {
        let symbol = parse_symbol(group[1])?;
        let directed = parse_flag(group[3])?;
        let is_tree = parse_flag(group[4])?;
        let source = graph.ensure_vertex(group[0]);
        let target = graph.ensure_vertex(group[2]);
        graph.add_edge(Edge {
            source,
            target,
            symbol,
            directed,
            is_tree,
        })?;
    }
    Ok(graph)
}

/// Allocates dictionary code points sequentially from the minimum scalar
/// value, skipping the structural separators and (in Rust) the surrogate
/// gap. Exhaustion of the scalar range is the capacity limit.
struct CodeAllocator {
    next: u32,
    assigned: usize,
}

impl CodeAllocator {
    fn new() -> Self {
        CodeAllocator {
            next: 0,
            assigned: 0,
        }
    }

    fn next_code(&mut self) -> Result<char> {
        loop {
            if self.next > char::MAX as u32 {
                return Err(GraphError::CapacityExceeded {
                    distinct: self.assigned,
                });
            }
            let candidate = self.next;
            self.next += 1;
            if SEPARATORS.iter().any(|&s| s as u32 == candidate) {
                continue;
            }
            if let Some(code) = char::from_u32(candidate) {
                self.assigned += 1;
                return Ok(code);
            }
        }
    }
}

/// Dictionary block (one `\n<code><token>` per distinct token, in first
/// appearance order), a single space, then five code characters per edge.
fn encode_compressed(graph: &Graph) -> Result<String> {
    let mut allocator = CodeAllocator::new();
    let mut codes: HashMap<String, char> = HashMap::new();
    let mut dictionary = String::new();
    let mut stream = String::new();

    let mut code_for = |token: &str, dictionary: &mut String| -> Result<char> {
        if let Some(&code) = codes.get(token) {
            return Ok(code);
        }
        let code = allocator.next_code()?;
        codes.insert(token.to_string(), code);
        dictionary.push('\n');
        dictionary.push(code);
        dictionary.push_str(token);
        Ok(code)
    };

    for (_, edge) in graph.all_edges() {
        let (Some(from), Some(to)) = (graph.vertex(edge.source), graph.vertex(edge.target)) else {
            continue;
        };
        stream.push(code_for(&from.id, &mut dictionary)?);
        stream.push(code_for(edge.symbol.as_str(), &mut dictionary)?);
        stream.push(code_for(&to.id, &mut dictionary)?);
        stream.push(flag(edge.directed));
        stream.push(flag(edge.is_tree));
    }
    Ok(format!("{COMPRESSED_MARKER}{dictionary} {stream}"))
}

fn decode_compressed(body: &str) -> Result<Graph> {
    let mut chars = body.chars().peekable();
    let mut table: HashMap<char, String> = HashMap::new();

    // Dictionary block runs up to the single space separator.
    loop {
        match chars.next() {
            Some('\n') => {
                let code = chars.next().ok_or_else(|| {
                    GraphError::MalformedPayload("truncated dictionary entry".to_string())
                })?;
                let mut token = String::new();
                while let Some(&c) = chars.peek() {
                    if SEPARATORS.contains(&c) {
                        break;
                    }
                    token.push(c);
                    chars.next();
                }
                table.insert(code, token);
            }
            Some(' ') => break,
            Some(other) => {
                return Err(GraphError::MalformedPayload(format!(
                    "unexpected character `{}` in dictionary block",
                    other.escape_debug()
                )));
            }
            None => {
                return Err(GraphError::MalformedPayload(
                    "unterminated dictionary block".to_string(),
                ));
            }
        }
    }

    let stream: Vec<char> = chars.collect();
    if stream.len() % 5 != 0 {
        return Err(GraphError::MalformedPayload(format!(
            "edge stream length {} is not a multiple of five",
            stream.len()
        )));
    }

    let lookup = |code: char, table: &HashMap<char, String>| -> Result<String> {
        table.get(&code).cloned().ok_or_else(|| {
            GraphError::MalformedPayload(format!(
                "undefined dictionary code `{}`",
                code.escape_debug()
            ))
        })
    };

    let mut graph = Graph::new();
    for group in stream.chunks(5) {
        let from = lookup(group[0], &table)?;
        let symbol = parse_symbol(&lookup(group[1], &table)?)?;
        let to = lookup(group[2], &table)?;
        let directed = parse_flag_char(group[3])?;
        let is_tree = parse_flag_char(group[4])?;
        let source = graph.ensure_vertex(&from);
        let target = graph.ensure_vertex(&to);
        graph.add_edge(Edge {
            source,
            target,
            symbol,
            directed,
            is_tree,
        })?;
    }
    Ok(graph)
}

impl Graph {
    /// Serialize the whole graph into its textual wire form.
    pub fn serialize(&self, compressed: bool) -> Result<String> {
        encode(self, compressed)
    }

    /// Load a serialized payload, replacing (`reset`) or merging into this
    /// graph. The payload is fully decoded into a fresh graph first; on
    /// any failure `self` is left untouched. Merging upserts vertices by
    /// id and re-adds edges under set semantics.
    pub fn load(&mut self, text: &str, reset: bool) -> Result<()> {
        let parsed = decode(text)?;
        tracing::debug!(
            reset,
            vertices = parsed.vertex_count(),
            edges = parsed.edge_count(),
            "loaded graph payload"
        );
        if reset {
            *self = parsed;
            return Ok(());
        }
        // Handles from the parsed graph are not valid in self; rebuild by id.
        for vertex in parsed.all_vertices() {
            self.ensure_vertex(&vertex.id);
        }
        for (_, edge) in parsed.all_edges() {
            let (Some(from), Some(to)) = (parsed.vertex(edge.source), parsed.vertex(edge.target))
            else {
                continue;
            };
            let source = self.vertex_id(&from.id)?;
            let target = self.vertex_id(&to.id)?;
            self.add_edge(Edge {
                source,
                target,
                symbol: edge.symbol,
                directed: edge.directed,
                is_tree: edge.is_tree,
            })?;
        }
        Ok(())
    }
}
