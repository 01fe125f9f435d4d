use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use sitemesh_core::crawl::{CrawlOptions, execute_crawl, outcome_to_graph};
use sitemesh_core::graphml::{load_graphml, save_graphml};
use sitemesh_core::layout::{LayoutConfig, compute_layout};
use sitemesh_core::render::save_html;
use sitemesh_core::report::{
    ReportFormat, generate_json_report, generate_text_report, save_report,
};
use sitemesh_scanner::CrawlOutcome;
use sitemesh_scanner::fetch::DEFAULT_USER_AGENT;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use url::Url;

// Helper functions for seed loading

/// Merge seeds given with --url and those read from --seeds-file
pub fn load_seeds_from_source(urls: &[String], seeds_file: Option<&str>) -> Result<Vec<String>> {
    let mut seeds: Vec<String> = urls.iter().filter_map(|u| parse_url_line(u)).collect();

    if let Some(path) = seeds_file {
        let expanded = shellexpand::tilde(path);
        seeds.extend(load_seeds_from_file(Path::new(expanded.as_ref()))?);
    }

    if seeds.is_empty() {
        bail!("No valid seed URLs given (use --url or --seeds-file)");
    }

    Ok(seeds)
}

/// Load and parse seed URLs from a file
pub fn load_seeds_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read seeds file {}", path.display()))?;

    Ok(content.lines().filter_map(parse_url_line).collect())
}

/// Parse a single line as a seed URL, adding https:// to bare hosts.
/// Blank lines and `#` comments yield `None`.
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let candidate = if line.contains("://") {
        line.to_string()
    } else {
        format!("https://{}", line)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some() => Some(candidate),
        _ => {
            warn!("Skipping invalid URL '{}'", line);
            None
        }
    }
}

pub fn crawl_options_from_args(args: &ArgMatches, quiet: bool) -> Result<CrawlOptions> {
    let urls: Vec<String> = args
        .get_many::<String>("url")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let seeds_file = args.get_one::<String>("seeds-file").map(String::as_str);

    Ok(CrawlOptions {
        seeds: load_seeds_from_source(&urls, seeds_file)?,
        max_depth: args.get_one::<usize>("max-depth").copied().unwrap_or(3),
        timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(5),
        user_agent: args
            .get_one::<String>("user-agent")
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        show_progress: !quiet && !args.get_flag("verbose"),
    })
}

pub fn layout_config_from_args(args: &ArgMatches) -> LayoutConfig {
    let defaults = LayoutConfig::default();
    LayoutConfig {
        iterations: args
            .get_one::<usize>("iterations")
            .copied()
            .unwrap_or(defaults.iterations),
        seed: args.get_one::<u64>("seed").copied().unwrap_or(defaults.seed),
        ..defaults
    }
}

fn canvas_from_args(args: &ArgMatches) -> (f64, f64) {
    (
        args.get_one::<f64>("width").copied().unwrap_or(5050.0),
        args.get_one::<f64>("height").copied().unwrap_or(5050.0),
    )
}

fn output_report(args: &ArgMatches, outcome: &CrawlOutcome, quiet: bool) -> Result<()> {
    let format = args
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let report = match format {
        ReportFormat::Text => generate_text_report(outcome),
        ReportFormat::Json => generate_json_report(outcome)?,
    };

    match args.get_one::<PathBuf>("report") {
        Some(path) => {
            save_report(&report, path)?;
            if !quiet {
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None if !quiet => print!("{}", report),
        None => {}
    }
    Ok(())
}

async fn crawl_to_file(args: &ArgMatches, quiet: bool) -> Result<PathBuf> {
    let options = crawl_options_from_args(args, quiet)?;
    let output = args
        .get_one::<PathBuf>("output")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(crate::commands::DEFAULT_GRAPH_FILE));

    if !quiet {
        println!(
            "\n{} Crawling {} seed(s), max depth {}\n",
            "→".blue().bold(),
            options.seeds.len(),
            options.max_depth
        );
    }

    let outcome = execute_crawl(options).await?;
    let graph = outcome_to_graph(&outcome);
    save_graphml(&graph, &output)?;

    info!(
        "Wrote {} domains and {} links to {}",
        graph.nodes.len(),
        graph.edges.len(),
        output.display()
    );
    if !quiet {
        println!("{} Graph saved to {}", "✓".green().bold(), output.display());
    }

    output_report(args, &outcome, quiet)?;
    Ok(output)
}

/// Read a graph file, lay it out and write the HTML view.
pub fn render_file(
    input: &Path,
    output: &Path,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<usize> {
    let graph = load_graphml(input)?;
    info!(
        "Loaded {} nodes and {} edges from {}",
        graph.nodes.len(),
        graph.edges.len(),
        input.display()
    );

    let layout = compute_layout(&graph, width, height, config);
    save_html(&graph, &layout, output)?;
    Ok(layout.len())
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) -> Result<()> {
    crawl_to_file(args, quiet).await?;
    Ok(())
}

pub fn handle_render(args: &ArgMatches, quiet: bool) -> Result<()> {
    let input = args
        .get_one::<PathBuf>("input")
        .context("--input is required")?;
    let output = args
        .get_one::<PathBuf>("output")
        .context("--output is required")?;
    let (width, height) = canvas_from_args(args);

    let nodes = render_file(input, output, width, height, &layout_config_from_args(args))?;
    if !quiet {
        println!(
            "{} Rendered {} nodes to {}",
            "✓".green().bold(),
            nodes,
            output.display()
        );
    }
    Ok(())
}

pub async fn handle_map(args: &ArgMatches, quiet: bool) -> Result<()> {
    let graph_file = crawl_to_file(args, quiet).await?;
    let html = args
        .get_one::<PathBuf>("html")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(crate::commands::DEFAULT_HTML_FILE));
    let (width, height) = canvas_from_args(args);

    let nodes = render_file(&graph_file, &html, width, height, &layout_config_from_args(args))?;
    if !quiet {
        println!(
            "{} Rendered {} nodes to {}",
            "✓".green().bold(),
            nodes,
            html.display()
        );
    }
    Ok(())
}
