use clap::{Arg, ArgAction, arg, command};
use std::path::PathBuf;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub const DEFAULT_GRAPH_FILE: &str = "internet_map.graphml";
pub const DEFAULT_HTML_FILE: &str = "graph_output.html";

fn crawl_args() -> Vec<Arg> {
    vec![
        arg!(-u --"url" <URL>)
            .required(false)
            .required_unless_present("seeds-file")
            .help("A seed URL to start crawling from (repeatable; bare hosts get https://)")
            .action(ArgAction::Append),
        arg!(-H --"seeds-file" <PATH>)
            .required(false)
            .help("Path to a newline-delimited file of seed URLs ('#' starts a comment)"),
        arg!(-d --"max-depth" <DEPTH>)
            .required(false)
            .help("How many links away from a seed to follow")
            .value_parser(clap::value_parser!(usize))
            .default_value("3"),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Per-request timeout in seconds")
            .value_parser(clap::value_parser!(u64).range(1..))
            .default_value("5"),
        arg!(--"user-agent" <AGENT>)
            .required(false)
            .help("User-Agent header sent with every request"),
        arg!(--"report" <PATH>)
            .required(false)
            .help("Save a crawl summary to file (default: print to screen)")
            .value_parser(clap::value_parser!(PathBuf)),
        arg!(-f --"format" <FORMAT>)
            .required(false)
            .help("Report format: text, json")
            .value_parser(["text", "json"])
            .default_value("text"),
    ]
}

/// Canvas dimensions must be finite and positive.
pub fn parse_canvas_size(value: &str) -> Result<f64, String> {
    let size: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if size.is_finite() && size > 0.0 {
        Ok(size)
    } else {
        Err(format!("`{}` must be a finite size greater than zero", value))
    }
}

fn layout_args() -> Vec<Arg> {
    vec![
        arg!(--"width" <PIXELS>)
            .required(false)
            .help("Layout canvas width")
            .value_parser(parse_canvas_size)
            .default_value("5050"),
        arg!(--"height" <PIXELS>)
            .required(false)
            .help("Layout canvas height")
            .value_parser(parse_canvas_size)
            .default_value("5050"),
        arg!(--"iterations" <COUNT>)
            .required(false)
            .help("Number of force simulation steps")
            .value_parser(clap::value_parser!(usize))
            .default_value("400"),
        arg!(--"seed" <SEED>)
            .required(false)
            .help("Random seed for initial node placement")
            .value_parser(clap::value_parser!(u64))
            .default_value("42"),
    ]
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemesh")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemesh")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Only print warnings and errors; no spinner")
                .global(true)
                .conflicts_with("verbose"),
        )
        .arg(arg!(-v --"verbose" "Print debug logs").global(true))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("crawl")
                .about("Crawl outward from the seeds and write the domain graph as GraphML")
                .args(crawl_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Graph file to write")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_GRAPH_FILE),
                ),
        )
        .subcommand(
            command!("render")
                .about("Lay out a GraphML file and write an interactive HTML view")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Graph file to read")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_GRAPH_FILE),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("HTML file to write")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_HTML_FILE),
                )
                .args(layout_args()),
        )
        .subcommand(
            command!("map")
                .about("Crawl, write the graph file, then render it")
                .args(crawl_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Graph file to write")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_GRAPH_FILE),
                )
                .arg(
                    arg!(--"html" <PATH>)
                        .required(false)
                        .help("HTML file to write")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value(DEFAULT_HTML_FILE),
                )
                .args(layout_args()),
        )
}
