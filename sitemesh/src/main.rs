use colored::Colorize;
use sitemesh::commands::command_argument_builder;
use sitemesh::handlers::{handle_crawl, handle_map, handle_render};
use tracing::Level;

fn init_tracing(quiet: bool, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();

    let Some((name, sub_matches)) = matches.subcommand() else {
        unreachable!("clap should ensure we don't get here");
    };
    let quiet = sub_matches.get_flag("quiet");
    init_tracing(quiet, sub_matches.get_flag("verbose"));

    let result = match name {
        "crawl" => handle_crawl(sub_matches, quiet).await,
        "render" => handle_render(sub_matches, quiet),
        "map" => handle_map(sub_matches, quiet).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
