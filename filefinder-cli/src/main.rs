mod render;

use clap::Parser;
use colored::Colorize;
use filefinder::{find, FinderConfig, Match, ReconciledResults, SearchError};
use std::{num::NonZeroUsize, path::PathBuf, time::Duration};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::records_to_markdown_table;

type Result<T> = std::result::Result<T, SearchError>;

const RULE_WIDTH: usize = 100;

/// Find files by name and by content under a directory and its immediate subdirectories
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Substring of the file names to find (case-insensitive)
    #[arg(short, long)]
    name: Option<String>,

    /// Substring of a line inside the files to find (case-insensitive)
    #[arg(short, long)]
    content: Option<String>,

    /// Directory to search [default: current directory, or `root_path` from the config file]
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Extra configuration file layered over the global and local ones
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worker threads for subdirectory tasks
    #[arg(short = 'j', long)]
    workers: Option<NonZeroUsize>,

    /// Give up waiting for subdirectory tasks after this long (e.g. "2s", "500ms")
    #[arg(long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the results as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Disable colors and terminal hyperlinks
    #[arg(long)]
    plain: bool,
}

impl Cli {
    fn to_config(&self) -> FinderConfig {
        let defaults = FinderConfig::default();
        FinderConfig {
            name: self.name.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
            root_path: self.path.clone().unwrap_or(defaults.root_path),
            worker_count: self.workers.unwrap_or(defaults.worker_count),
            search_timeout: self.timeout,
            log_level: self.log_level.clone().unwrap_or(defaults.log_level),
            limits: defaults.limits,
        }
    }
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let file_config = FinderConfig::load_from(cli.config.as_deref())
        .map_err(|e| SearchError::config_error(e.to_string()))?;
    let config = file_config.merge_with_cli(cli.to_config());

    init_tracing(&config.log_level);
    debug!("Using configuration: {:?}", config);
    if cli.plain {
        colored::control::set_override(false);
    }

    let results = find(&config)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&results).map_err(std::io::Error::from)?;
        println!("{}", json);
        return Ok(());
    }

    print_results(&results, !cli.plain);
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_results(results: &ReconciledResults, hyperlinks: bool) {
    if results.is_empty() {
        println!("No results found for parameters provided");
        return;
    }

    println!("{}", "*".repeat(RULE_WIDTH));
    print_section("Results found by name:", &results.results_only_by_name, hyperlinks);
    print_section(
        "Results found by content:",
        &results.results_only_by_content,
        hyperlinks,
    );
    print_section("Combined results:", &results.combined_result, hyperlinks);
    print_section("Results intersection:", &results.intersection_result, hyperlinks);

    if results.is_truncated() {
        println!(
            "{}",
            format!(
                "Warning: {} match(es) dropped because a directory exceeded the match limit",
                results.dropped_matches
            )
            .yellow()
        );
    }
}

fn print_section(heading: &str, records: &[Match], hyperlinks: bool) {
    if records.is_empty() {
        return;
    }
    println!("{}", heading.blue().bold());
    println!("{}", records_to_markdown_table(records, hyperlinks));
    println!();
}
