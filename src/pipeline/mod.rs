//! Pipeline orchestrator: search → details → classify → table → CSV → charts.
//!
//! Every stage consumes the previous stage's full output. Failure handling
//! differs per stage and is visible in the types:
//!   - search loop: abort, keep what was collected ([`Harvest::aborted`])
//!   - detail fetch: degrade to no skills
//!   - classifier: tag the vacancy [`Level::Error`]
//!   - row builder: drop the vacancy
//!
//! Configuration, output and chart failures propagate.

use crate::analysis::VacancyTable;
use crate::classifier::detect_level;
use crate::config::AppConfig;
use crate::models::{Level, VacancyRow};
use crate::scraper::cleaner::build_row;
use crate::scraper::{HhScraper, VacancySource, collect_vacancies, fetch_detail_skills};
use crate::storage::write_csv;
use crate::utils::Timer;
use crate::viz::render_charts;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

pub struct Pipeline {
    config: AppConfig,
}

/// Tables produced by one run, before charting.
#[derive(Debug)]
pub struct Processed {
    pub table: VacancyTable,
    pub in_currency: VacancyTable,
    pub stats: PipelineStats,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<PipelineStats> {
        let scraper = HhScraper::new(&self.config.api).context("Failed to build scraper")?;

        let Processed {
            table,
            in_currency,
            mut stats,
        } = self.process(&scraper).await?;

        if in_currency.is_empty() {
            warn!("No {} vacancies, charts skipped", self.config.output.currency);
            return Ok(stats);
        }

        let _t = Timer::start("Charts");
        stats.charts = render_charts(
            &in_currency,
            &table.without_errors(),
            &self.config.output.currency,
            &self.config.output.charts_dir,
        )?;

        Ok(stats)
    }

    /// Everything up to and including the CSV write.
    pub async fn process<S: VacancySource + ?Sized>(&self, source: &S) -> Result<Processed> {
        let api = &self.config.api;
        let output = &self.config.output;

        // ── 1. Search ─────────────────────────────────────────────────────────
        let harvest = {
            let _t = Timer::start("Search");
            collect_vacancies(source, api.max_pages, Duration::from_millis(api.request_delay_ms)).await
        };

        // ── 2. Details, levels, rows ──────────────────────────────────────────
        let rows = {
            let _t = Timer::start("Details and classification");
            let mut rows: Vec<VacancyRow> = Vec::with_capacity(harvest.vacancies.len());

            for vacancy in &harvest.vacancies {
                let skills = fetch_detail_skills(source, vacancy).await;
                let level = detect_level(vacancy);

                match build_row(vacancy, level, &skills) {
                    Ok(row) => rows.push(row),
                    Err(e) => warn!("Vacancy {} dropped: {}", vacancy.display_id(), e),
                }
            }
            rows
        };

        // ── 3. Table and CSV ──────────────────────────────────────────────────
        let table = VacancyTable::from_rows(rows);
        let in_currency = table.in_currency(&output.currency);
        write_csv(&in_currency, &output.csv_path)
            .with_context(|| format!("Failed to write {:?}", output.csv_path))?;

        let stats = PipelineStats {
            search_aborted: harvest.aborted.is_some(),
            found: harvest.found,
            vacancies_fetched: harvest.vacancies.len(),
            rows_built: table.len(),
            rows_dropped: harvest.vacancies.len() - table.len(),
            unclassified: table.count_by_level(Level::Error),
            rows_written: in_currency.len(),
            charts: Vec::new(),
        };

        info!(
            "=== {} fetched | {} rows | {} dropped | {} unclassified | {} written ===",
            stats.vacancies_fetched, stats.rows_built, stats.rows_dropped, stats.unclassified, stats.rows_written,
        );

        Ok(Processed {
            table,
            in_currency,
            stats,
        })
    }
}

#[derive(Debug, Default)]
pub struct PipelineStats {
    pub search_aborted: bool,
    pub found: Option<u64>,
    pub vacancies_fetched: usize,
    pub rows_built: usize,
    pub rows_dropped: usize,
    pub unclassified: usize,
    pub rows_written: usize,
    pub charts: Vec<PathBuf>,
}
