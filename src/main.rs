//! The `costar` command-line entry point.
//!
//! - `costar patterns` lists the role patterns a search can use.
//! - `costar pairs` finds the collaborator pairs with the most shared films.
//! - `costar prepare` reduces the raw tables to the working tables.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use costar::{
    find_top_pairs, init_logging, prepare_dataset, registered_patterns, render_report,
    CostarConfig, FilmFilter, PairQuery, PairSearch,
};

/// Collaborator-pair search over film credit tables.
#[derive(Debug, Parser)]
#[command(name = "costar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file; absent fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level, including metric lines.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Append log records to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Rows per batch; overrides the config file.
    #[arg(long, global = true)]
    batch_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the role patterns.
    Patterns,
    /// Find the pairs that shared the most films.
    Pairs(PairsArgs),
    /// Reduce the raw tables to the working tables.
    Prepare,
}

#[derive(Debug, Args)]
struct PairsArgs {
    /// Role pattern number, see `costar patterns`.
    #[arg(long)]
    pattern: usize,

    #[arg(long)]
    min_rating: f64,

    #[arg(long)]
    max_rating: f64,

    #[arg(long)]
    min_year: i32,

    #[arg(long)]
    max_year: i32,

    /// Number of pairs to report.
    #[arg(long)]
    count: usize,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref()).context("failed to set up logging")?;

    let mut config = match &cli.config {
        Some(path) => CostarConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CostarConfig::default(),
    };
    if let Some(batch_size) = cli.batch_size {
        config.batch_size_rows = batch_size;
    }
    config.validate()?;

    let started = Instant::now();
    match cli.command {
        Commands::Patterns => print_patterns(),
        Commands::Pairs(args) => run_pairs(&args, &config)?,
        Commands::Prepare => run_prepare(&config)?,
    }
    log::info!("Finished in {:.2?}", started.elapsed());
    Ok(())
}

fn print_patterns() {
    for (choice, pattern) in registered_patterns() {
        println!("{:>2}. {}", choice, pattern);
    }
}

fn run_pairs(args: &PairsArgs, config: &CostarConfig) -> Result<()> {
    let query = PairQuery {
        pattern_choice: args.pattern,
        filter: FilmFilter {
            min_rating: args.min_rating,
            max_rating: args.max_rating,
            min_year: args.min_year,
            max_year: args.max_year,
        },
        result_count: args.count,
    };

    let search = find_top_pairs(&query, config).context("pair search failed")?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&search)?),
        OutputFormat::Text => print_search(&search),
    }
    Ok(())
}

fn print_search(search: &PairSearch) {
    if search.result.pairs.is_empty() {
        println!(
            "{}",
            format!("No {} pairs found for these criteria.", search.pattern).yellow()
        );
        return;
    }
    if let Some(shortfall) = search.shortfall {
        println!(
            "{}",
            format!(
                "Only {} pairs found ({} requested); showing all of them.\n",
                shortfall.available, shortfall.requested
            )
            .yellow()
        );
    }
    print!("{}", render_report(&search.result, true));
}

fn run_prepare(config: &CostarConfig) -> Result<()> {
    let summary = prepare_dataset(config).context("dataset preparation failed")?;
    println!(
        "{} {} films, {} credits, {} persons",
        "Prepared".green().bold(),
        summary.films,
        summary.credits,
        summary.persons
    );
    Ok(())
}
