pub mod crawl;
pub mod error;
pub mod graphml;
pub mod layout;
pub mod render;
pub mod report;

pub use crawl::{CrawlOptions, execute_crawl, outcome_to_graph};
pub use error::CoreError;
pub use graphml::{GraphData, load_graphml, save_graphml};
pub use layout::{Layout, LayoutConfig, Position, compute_layout};
pub use render::{render_html, save_html};
pub use report::{ReportFormat, generate_json_report, generate_text_report, save_report};
