// Graph file reading and writing

use crate::error::{CoreError, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use serde::Deserialize;
use sitemesh_scanner::GraphSnapshot;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";

/// Node ids and directed edges, as stored in a graph file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphData {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
}

impl From<GraphSnapshot> for GraphData {
    fn from(snapshot: GraphSnapshot) -> Self {
        GraphData {
            nodes: snapshot.vertices,
            edges: snapshot.edges,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphMlDocument {
    #[serde(rename = "graph", default)]
    graphs: Vec<GraphElement>,
}

#[derive(Debug, Deserialize)]
struct GraphElement {
    #[serde(rename = "node", default)]
    nodes: Vec<NodeElement>,
    #[serde(rename = "edge", default)]
    edges: Vec<EdgeElement>,
}

#[derive(Debug, Deserialize)]
struct NodeElement {
    #[serde(rename = "@id", default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeElement {
    #[serde(rename = "@source", default)]
    source: Option<String>,
    #[serde(rename = "@target", default)]
    target: Option<String>,
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Writes `graph` as GraphML. Ids are sanitized, so distinct ids that
/// sanitize alike are written once.
pub fn write_graphml<W: Write>(graph: &GraphData, out: W) -> Result<()> {
    let mut writer = Writer::new_with_indent(out, b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("graphml");
    root.push_attribute(("xmlns", GRAPHML_NS));
    writer.write_event(Event::Start(root))?;

    let mut graph_elem = BytesStart::new("graph");
    graph_elem.push_attribute(("id", "G"));
    graph_elem.push_attribute(("edgedefault", "directed"));
    writer.write_event(Event::Start(graph_elem))?;

    let mut written = HashSet::new();
    for node in &graph.nodes {
        let id = sanitize_id(node);
        if !written.insert(id.clone()) {
            continue;
        }
        let mut elem = BytesStart::new("node");
        elem.push_attribute(("id", id.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    let mut written = HashSet::new();
    for (source, target) in &graph.edges {
        let source = sanitize_id(source);
        let target = sanitize_id(target);
        if !written.insert((source.clone(), target.clone())) {
            continue;
        }
        let mut elem = BytesStart::new("edge");
        elem.push_attribute(("source", source.as_str()));
        elem.push_attribute(("target", target.as_str()));
        writer.write_event(Event::Empty(elem))?;
    }

    writer.write_event(Event::End(BytesEnd::new("graph")))?;
    writer.write_event(Event::End(BytesEnd::new("graphml")))?;

    let out = writer.get_mut();
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Reads node ids (first-seen order, duplicates collapsed) and edges.
/// Nodes without an `id` and edges missing an endpoint are ignored.
pub fn read_graphml<R: BufRead>(reader: R) -> Result<GraphData> {
    let document: GraphMlDocument = quick_xml::de::from_reader(reader)?;

    let mut data = GraphData::default();
    let mut seen = HashSet::new();

    for graph in document.graphs {
        for node in graph.nodes {
            if let Some(id) = node.id
                && seen.insert(id.clone())
            {
                data.nodes.push(id);
            }
        }
        for edge in graph.edges {
            if let (Some(source), Some(target)) = (edge.source, edge.target) {
                data.edges.push((source, target));
            }
        }
    }

    Ok(data)
}

pub fn save_graphml(graph: &GraphData, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
    write_graphml(graph, BufWriter::new(file))
}

pub fn load_graphml(path: &Path) -> Result<GraphData> {
    let file = File::open(path).map_err(|e| CoreError::io(path, e))?;
    read_graphml(BufReader::new(file))
}
