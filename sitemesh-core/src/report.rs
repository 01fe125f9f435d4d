// Crawl summary reports

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use sitemesh_scanner::CrawlOutcome;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";
const TOP_DOMAINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainLinks {
    pub domain: String,
    pub outbound: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub pages_fetched: usize,
    pub pages_failed: usize,
    pub urls_visited: usize,
    pub domains: usize,
    pub links: usize,
    pub self_links: usize,
    pub top_domains: Vec<DomainLinks>,
}

impl ReportData {
    pub fn from_outcome(outcome: &CrawlOutcome) -> Self {
        let edges = &outcome.graph.edges;

        let mut outbound: HashMap<&str, usize> = HashMap::new();
        for (source, target) in edges {
            if source != target {
                *outbound.entry(source.as_str()).or_default() += 1;
            }
        }

        let mut top_domains: Vec<DomainLinks> = outbound
            .into_iter()
            .map(|(domain, outbound)| DomainLinks {
                domain: domain.to_string(),
                outbound,
            })
            .collect();
        top_domains.sort_by(|a, b| b.outbound.cmp(&a.outbound).then(a.domain.cmp(&b.domain)));
        top_domains.truncate(TOP_DOMAINS);

        ReportData {
            pages_fetched: outcome.pages_fetched,
            pages_failed: outcome.pages_failed,
            urls_visited: outcome.urls_visited,
            domains: outcome.domain_count(),
            links: outcome.link_count(),
            self_links: edges.iter().filter(|(s, t)| s == t).count(),
            top_domains,
        }
    }
}

pub fn generate_text_report(outcome: &CrawlOutcome) -> String {
    let data = ReportData::from_outcome(outcome);
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                           SITEMESH CRAWL REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    report.push_str(&format!("URLs Visited:   {}\n", data.urls_visited));
    report.push_str(&format!("Pages Fetched:  {}\n", data.pages_fetched));
    report.push_str(&format!("Pages Failed:   {}\n", data.pages_failed));
    report.push_str(&format!("Domains:        {}\n", data.domains));
    report.push_str(&format!(
        "Domain Links:   {} ({} self-links)\n",
        data.links, data.self_links
    ));
    report.push('\n');

    if !data.top_domains.is_empty() {
        report.push_str(RULE);
        report.push_str("TOP DOMAINS BY OUTBOUND LINKS\n");
        report.push_str(RULE);
        report.push('\n');

        let width = data
            .top_domains
            .iter()
            .map(|d| d.domain.len())
            .max()
            .unwrap_or(0);
        for (idx, entry) in data.top_domains.iter().enumerate() {
            report.push_str(&format!(
                "{:>3}. {:<width$}  {}\n",
                idx + 1,
                entry.domain,
                entry.outbound,
                width = width
            ));
        }
        report.push('\n');
    }

    report
}

pub fn generate_json_report(outcome: &CrawlOutcome) -> Result<String> {
    let data = ReportData::from_outcome(outcome);
    Ok(serde_json::to_string_pretty(&data)?)
}

pub fn save_report(content: &str, path: &Path) -> Result<()> {
    fs::write(path, content).map_err(|e| CoreError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sitemesh_scanner::GraphSnapshot;

    fn outcome() -> CrawlOutcome {
        let edge = |a: &str, b: &str| (a.to_string(), b.to_string());
        CrawlOutcome {
            graph: GraphSnapshot {
                vertices: vec!["a.com".into(), "b.com".into(), "c.com".into()],
                edges: vec![
                    edge("a.com", "a.com"),
                    edge("a.com", "b.com"),
                    edge("a.com", "c.com"),
                    edge("b.com", "c.com"),
                ],
            },
            pages_fetched: 7,
            pages_failed: 2,
            urls_visited: 9,
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("csv"), None);
    }

    #[test]
    fn test_report_data_ranks_domains() {
        let data = ReportData::from_outcome(&outcome());
        assert_eq!(data.domains, 3);
        assert_eq!(data.links, 4);
        assert_eq!(data.self_links, 1);
        assert_eq!(
            data.top_domains,
            vec![
                DomainLinks {
                    domain: "a.com".into(),
                    outbound: 2
                },
                DomainLinks {
                    domain: "b.com".into(),
                    outbound: 1
                },
            ]
        );
    }

    #[test]
    fn test_text_report_contents() {
        let report = generate_text_report(&outcome());
        assert!(report.contains("SITEMESH CRAWL REPORT"));
        assert!(report.contains("Pages Fetched:  7"));
        assert!(report.contains("Pages Failed:   2"));
        assert!(report.contains("Domain Links:   4 (1 self-links)"));
        assert!(report.contains("  1. a.com  2"));
    }

    #[test]
    fn test_empty_outcome_has_no_ranking() {
        let report = generate_text_report(&CrawlOutcome::default());
        assert!(!report.contains("TOP DOMAINS"));
        assert!(report.contains("Domains:        0"));
    }

    #[test]
    fn test_json_report_parses() {
        let json = generate_json_report(&outcome()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages_fetched"], 7);
        assert_eq!(value["top_domains"][0]["domain"], "a.com");
    }
}
