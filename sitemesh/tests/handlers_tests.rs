use sitemesh::commands::{command_argument_builder, parse_canvas_size};
use sitemesh::handlers::*;
use sitemesh_core::graphml::{GraphData, save_graphml};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_parse_url_line_with_scheme() {
    let result = parse_url_line("http://example.com/start");
    assert_eq!(result, Some("http://example.com/start".to_string()));
}

#[test]
fn test_parse_url_line_without_scheme() {
    let result = parse_url_line("  example.com  ");
    assert_eq!(result, Some("https://example.com".to_string()));
}

#[test]
fn test_parse_url_line_skips_comments_and_blanks() {
    assert_eq!(parse_url_line("# a comment"), None);
    assert_eq!(parse_url_line("   "), None);
}

#[test]
fn test_parse_url_line_invalid() {
    let result = parse_url_line("not a valid url!!!");
    assert_eq!(result, None);
}

#[test]
fn test_load_seeds_from_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "# seeds")?;
    writeln!(temp_file, "https://example.com")?;
    writeln!(temp_file, "httpbin.org")?;
    writeln!(temp_file)?; // Empty line
    writeln!(temp_file, "http://api.example.com")?;

    let path = PathBuf::from(temp_file.path());
    let seeds = load_seeds_from_file(&path)?;

    assert_eq!(
        seeds,
        vec![
            "https://example.com",
            "https://httpbin.org",
            "http://api.example.com"
        ]
    );

    Ok(())
}

#[test]
fn test_load_seeds_from_missing_file() {
    let result = load_seeds_from_file(&PathBuf::from("/definitely/not/here.txt"));
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Failed to read seeds file")
    );
}

#[test]
fn test_load_seeds_from_source_merges_inputs() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "b.org").unwrap();

    let path = temp_file.path().to_string_lossy().to_string();
    let seeds =
        load_seeds_from_source(&["a.com".to_string()], Some(path.as_str())).unwrap();

    assert_eq!(seeds, vec!["https://a.com", "https://b.org"]);
}

#[test]
fn test_load_seeds_from_source_no_input() {
    let result = load_seeds_from_source(&[], None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No valid seed URLs"));
}

#[test]
fn test_load_seeds_from_source_only_comments() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "# nothing here").unwrap();
    writeln!(temp_file, "   ").unwrap();

    let path = temp_file.path().to_string_lossy().to_string();
    assert!(load_seeds_from_source(&[], Some(path.as_str())).is_err());
}

#[test]
fn test_crawl_options_from_args() {
    let matches = command_argument_builder()
        .try_get_matches_from([
            "sitemesh",
            "crawl",
            "-u",
            "a.com",
            "--url",
            "https://b.org/x",
            "-d",
            "1",
            "--timeout",
            "9",
            "--user-agent",
            "tester/1.0",
        ])
        .unwrap();
    let args = matches.subcommand_matches("crawl").unwrap();

    let options = crawl_options_from_args(args, true).unwrap();
    assert_eq!(options.seeds, vec!["https://a.com", "https://b.org/x"]);
    assert_eq!(options.max_depth, 1);
    assert_eq!(options.timeout_secs, 9);
    assert_eq!(options.user_agent, "tester/1.0");
    assert!(!options.show_progress);
}

#[test]
fn test_crawl_requires_a_seed_source() {
    let result = command_argument_builder().try_get_matches_from(["sitemesh", "crawl"]);
    assert!(result.is_err());
}

#[test]
fn test_quiet_and_verbose_conflict() {
    let result = command_argument_builder()
        .try_get_matches_from(["sitemesh", "-q", "-v", "render"]);
    assert!(result.is_err());
}

#[test]
fn test_layout_config_from_args() {
    let matches = command_argument_builder()
        .try_get_matches_from(["sitemesh", "render", "--iterations", "12", "--seed", "7"])
        .unwrap();
    let args = matches.subcommand_matches("render").unwrap();

    let config = layout_config_from_args(args);
    assert_eq!(config.iterations, 12);
    assert_eq!(config.seed, 7);
    assert_eq!(config.theta, 0.5);
}

#[test]
fn test_render_defaults() {
    let matches = command_argument_builder()
        .try_get_matches_from(["sitemesh", "render"])
        .unwrap();
    let args = matches.subcommand_matches("render").unwrap();

    assert_eq!(
        args.get_one::<PathBuf>("input").unwrap(),
        &PathBuf::from("internet_map.graphml")
    );
    assert_eq!(
        args.get_one::<PathBuf>("output").unwrap(),
        &PathBuf::from("graph_output.html")
    );
    assert_eq!(args.get_one::<f64>("width"), Some(&5050.0));
}

#[test]
fn test_canvas_size_rejects_degenerate_values() {
    assert_eq!(parse_canvas_size("800"), Ok(800.0));
    assert_eq!(parse_canvas_size("12.5"), Ok(12.5));
    for bad in ["nan", "NaN", "inf", "-inf", "0", "-100", "wide"] {
        assert!(parse_canvas_size(bad).is_err(), "accepted {}", bad);
    }

    let result = command_argument_builder()
        .try_get_matches_from(["sitemesh", "render", "--width", "nan"]);
    assert!(result.is_err());
    let result = command_argument_builder()
        .try_get_matches_from(["sitemesh", "map", "-u", "https://a.com", "--height=-5"]);
    assert!(result.is_err());
}

#[test]
fn test_render_file_writes_html() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("g.graphml");
    let output = dir.path().join("g.html");

    let graph = GraphData {
        nodes: vec!["x".to_string(), "y".to_string()],
        edges: vec![("x".to_string(), "y".to_string())],
    };
    save_graphml(&graph, &input).unwrap();

    let config = sitemesh_core::layout::LayoutConfig {
        iterations: 10,
        ..Default::default()
    };
    let nodes = render_file(&input, &output, 800.0, 800.0, &config).unwrap();

    assert_eq!(nodes, 2);
    let html = fs::read_to_string(&output).unwrap();
    assert!(html.contains(r#"data-id="x""#));
    assert!(html.contains(r#""source":"x","target":"y""#));
}

#[test]
fn test_render_file_missing_input() {
    let dir = TempDir::new().unwrap();
    let result = render_file(
        &dir.path().join("nope.graphml"),
        &dir.path().join("out.html"),
        100.0,
        100.0,
        &Default::default(),
    );
    assert!(result.is_err());
}
