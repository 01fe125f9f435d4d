// Interactive HTML rendering of a laid-out graph

use crate::error::{CoreError, Result};
use crate::graphml::GraphData;
use crate::layout::{Layout, Position};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const MARGIN: f64 = 50.0;
const STYLE: &str = include_str!("assets/graph.css");
const SCRIPT: &str = include_str!("assets/graph.js");

#[derive(Debug, Serialize)]
struct EdgeLine<'a> {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    source: &'a str,
    target: &'a str,
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Builds a standalone HTML page: one dot per positioned node and one line
/// per edge whose endpoints both have a position.
pub fn render_html(graph: &GraphData, layout: &Layout) -> Result<String> {
    let positions: HashMap<&str, Position> =
        layout.iter().map(|(id, p)| (id.as_str(), *p)).collect();

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for (_, p) in layout {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if layout.is_empty() {
        (min_x, min_y, max_x, max_y) = (0.0, 0.0, 0.0, 0.0);
    }

    let width = max_x - min_x + 2.0 * MARGIN;
    let height = max_y - min_y + 2.0 * MARGIN;
    let place = |p: Position| Position::new(p.x - min_x + MARGIN, p.y - min_y + MARGIN);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
    html.push_str("<title>sitemesh graph</title>\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<div id=\"viewport\">\n");
    html.push_str(&format!(
        "<div id=\"container\" style=\"width:{:.2}px; height:{:.2}px;\">\n",
        width, height
    ));
    html.push_str(&format!(
        "<svg id=\"edges\" width=\"{:.2}\" height=\"{:.2}\"></svg>\n",
        width, height
    ));

    for (id, p) in layout {
        let at = place(*p);
        html.push_str(&format!(
            "<div class=\"node\" data-id=\"{}\" style=\"left:{:.2}px; top:{:.2}px;\"></div>\n",
            escape_html(id),
            at.x,
            at.y
        ));
    }

    let lines: Vec<EdgeLine> = graph
        .edges
        .iter()
        .filter_map(|(source, target)| {
            let from = place(*positions.get(source.as_str())?);
            let to = place(*positions.get(target.as_str())?);
            Some(EdgeLine {
                x1: round2(from.x),
                y1: round2(from.y),
                x2: round2(to.x),
                y2: round2(to.y),
                source,
                target,
            })
        })
        .collect();

    // '<' only occurs inside JSON strings, so the escape keeps the payload valid
    let payload = serde_json::to_string(&lines)?.replace('<', "\\u003c");

    html.push_str("</div>\n</div>\n");
    html.push_str("<script type=\"application/json\" id=\"edge-data\">");
    html.push_str(&payload);
    html.push_str("</script>\n<script>\n");
    html.push_str(SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");

    Ok(html)
}

pub fn save_html(graph: &GraphData, layout: &Layout, path: &Path) -> Result<()> {
    let html = render_html(graph, layout)?;
    fs::write(path, html).map_err(|e| CoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (GraphData, Layout) {
        let graph = GraphData {
            nodes: vec!["a".to_string(), "b".to_string()],
            edges: vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "missing".to_string()),
            ],
        };
        let layout = vec![
            ("a".to_string(), Position::new(100.0, 200.0)),
            ("b".to_string(), Position::new(300.0, 250.0)),
        ];
        (graph, layout)
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain.example"), "plain.example");
    }

    #[test]
    fn test_container_is_bounding_box_plus_margin() {
        let (graph, layout) = sample();
        let html = render_html(&graph, &layout).unwrap();
        assert!(html.contains("width:300.00px; height:150.00px;"));
        assert!(html.contains("data-id=\"a\" style=\"left:50.00px; top:50.00px;\""));
        assert!(html.contains("data-id=\"b\" style=\"left:250.00px; top:100.00px;\""));
    }

    #[test]
    fn test_edges_without_positions_are_dropped() {
        let (graph, layout) = sample();
        let html = render_html(&graph, &layout).unwrap();
        assert!(html.contains(r#""source":"a","target":"b""#));
        assert!(!html.contains("missing"));
    }

    #[test]
    fn test_hostile_ids_cannot_break_out() {
        let id = "</script><b>".to_string();
        let graph = GraphData {
            nodes: vec![id.clone()],
            edges: vec![(id.clone(), id.clone())],
        };
        let layout = vec![(id, Position::new(0.0, 0.0))];
        let html = render_html(&graph, &layout).unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_empty_layout_renders() {
        let html = render_html(&GraphData::default(), &Vec::new()).unwrap();
        assert!(html.contains("width:100.00px; height:100.00px;"));
        assert!(html.contains("[]"));
    }
}
