mod analysis;
mod classifier;
mod config;
mod loader;
mod models;
mod pipeline;
mod scraper;
mod storage;
mod utils;
mod viz;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::loader::load_csv;
use crate::pipeline::Pipeline;

const NOT_ENOUGH_DATA: &str = "Недостаточно данных для визуализации";

#[derive(Parser)]
#[command(name = "hh-analyst", about = "Data analyst vacancies from hh.ru: levels, salaries, skills", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch vacancies, classify them, write the CSV and render charts
    Run,

    /// Summarise a previously written CSV
    Stats {
        /// CSV written by `run` (default: the configured output path)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Re-render charts from a previously written CSV
    Charts {
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output directory (default: the configured charts directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "hh_analyst=info,warn",
        1 => "hh_analyst=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Run => {
            let _t = utils::Timer::start("Full run");
            let stats = Pipeline::new(config).run().await?;
            if stats.search_aborted {
                info!("Search stopped early; results are partial");
            }
            if stats.rows_written == 0 {
                println!("{}", NOT_ENOUGH_DATA);
            }
            info!(
                "Done: {} of {} vacancies, {} rows written, {} charts",
                stats.vacancies_fetched,
                stats.found.unwrap_or(0),
                stats.rows_written,
                stats.charts.len()
            );
        }

        Command::Stats { input } => {
            let path = input.unwrap_or(config.output.csv_path);
            let table = load_csv(&path)?;
            let total = table.len();

            println!("─────────────────────────────────");
            println!("  Vacancies — {}", path.display());
            println!("─────────────────────────────────");
            println!("  Rows     : {}", total);
            println!("  Levels");
            for (level, count) in table.level_counts() {
                println!("    {:<8} {:>5}  {:>5.1}%", level.as_str(), count, utils::percent(count, total));
            }
            println!("  Experience");
            for (label, count) in table.experience_counts() {
                println!("    {:<20} {:>5}", label, count);
            }
            println!("  Top skills");
            for (skill, count) in table.without_errors().top_skills(10) {
                println!("    {:<30} {:>5}", skill, count);
            }
            println!("─────────────────────────────────");
        }

        Command::Charts { input, out } => {
            let path = input.unwrap_or(config.output.csv_path);
            let dir = out.unwrap_or(config.output.charts_dir);
            let table = load_csv(&path)?;

            if table.is_empty() {
                println!("{}", NOT_ENOUGH_DATA);
            } else {
                let written =
                    viz::render_charts(&table, &table.without_errors(), &config.output.currency, &dir)?;
                for file in &written {
                    println!("  {}", file.display());
                }
            }
        }
    }

    Ok(())
}
