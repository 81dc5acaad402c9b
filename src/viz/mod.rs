//! SVG charts over the vacancy tables.

use crate::analysis::VacancyTable;
use crate::models::Level;
use crate::utils::truncate_label;
use anyhow::{Context, Result};
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const FONT: &str = "sans-serif";
const TOP_SKILLS: usize = 10;
const PIE_START_ANGLE: f64 = 90.0;
const MAX_LABEL_CHARS: usize = 40;

const TEAL: RGBColor = RGBColor(0, 128, 128);

/// Sampled from matplotlib's viridis, one per graded level.
const VIRIDIS: [RGBColor; 3] = [
    RGBColor(68, 1, 84),
    RGBColor(33, 145, 140),
    RGBColor(253, 231, 37),
];

/// Sampled from seaborn's rocket, dark to light.
const ROCKET: [RGBColor; 6] = [
    RGBColor(53, 25, 62),
    RGBColor(112, 31, 87),
    RGBColor(173, 23, 89),
    RGBColor(225, 51, 66),
    RGBColor(243, 118, 81),
    RGBColor(246, 180, 143),
];

const PIE_COLORS: [RGBColor; 5] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
];

pub const SALARY_CHART: &str = "salary_by_level.svg";
pub const SKILLS_CHART: &str = "top_skills.svg";
pub const LEVELS_CHART: &str = "levels.svg";
pub const EXPERIENCE_CHART: &str = "experience.svg";

/// Render all four charts into `dir`. `salaries` is the view in `currency`,
/// `vacancies` the error-free table. Returns the files written; a chart with
/// nothing to show is skipped.
pub fn render_charts(
    salaries: &VacancyTable,
    vacancies: &VacancyTable,
    currency: &str,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let mut written = Vec::new();

    let path = dir.join(SALARY_CHART);
    salary_boxplot(&salaries.salary_from_by_level(), currency, &path)?;
    written.push(path);

    let skills = vacancies.top_skills(TOP_SKILLS);
    if skills.is_empty() {
        warn!("No skills to chart");
    } else {
        let path = dir.join(SKILLS_CHART);
        horizontal_bars(
            &skills,
            &path,
            (1000, 600),
            "Топ-10 востребованных навыков",
            "Количество вакансий",
            |_| TEAL,
        )?;
        written.push(path);
    }

    let levels = vacancies.level_counts();
    if levels.is_empty() {
        warn!("No levels to chart");
    } else {
        let path = dir.join(LEVELS_CHART);
        level_pie(&levels, &path)?;
        written.push(path);
    }

    let experience = vacancies.experience_counts();
    if experience.is_empty() {
        warn!("No experience labels to chart");
    } else {
        let path = dir.join(EXPERIENCE_CHART);
        horizontal_bars(
            &experience,
            &path,
            (1000, 600),
            "Требования к опыту работы",
            "Количество вакансий",
            |rank| ROCKET[rank % ROCKET.len()],
        )?;
        written.push(path);
    }

    info!("{} charts written to {:?}", written.len(), dir);
    Ok(written)
}

/// Box per graded level, x axis in Junior, Middle, Senior order.
pub fn salary_boxplot(groups: &[(Level, Vec<f64>)], currency: &str, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let top = groups
        .iter()
        .flat_map(|(_, values)| values.iter().copied())
        .fold(0.0_f64, f64::max);
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };

    let labels = boxplot_labels(groups);
    let last = labels.len().saturating_sub(1) as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Распределение зарплат по уровням ({})", currency), (FONT, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(90)
        .build_cartesian_2d((0u32..last).into_segmented(), 0f32..top as f32)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(labels.len())
        .x_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                labels.get(*i as usize).map(|s| s.to_string()).unwrap_or_default()
            }
            SegmentValue::Last => String::new(),
        })
        .y_label_formatter(&|v: &f32| format!("{:.0}", v))
        .x_desc("Уровень")
        .y_desc("Зарплата_от")
        .draw()?;

    chart.draw_series(
        groups
            .iter()
            .enumerate()
            .filter(|(_, (_, values))| !values.is_empty())
            .map(|(i, (_, values))| {
                Boxplot::new_vertical(SegmentValue::CenterOf(i as u32), &Quartiles::new(values))
                    .width(60)
                    .whisker_width(0.5)
                    .style(VIRIDIS[i % VIRIDIS.len()].stroke_width(2))
            }),
    )?;

    root.present()?;
    Ok(())
}

/// x axis slot names, in the order the groups are drawn.
fn boxplot_labels(groups: &[(Level, Vec<f64>)]) -> Vec<&'static str> {
    groups.iter().map(|(level, _)| level.as_str()).collect()
}

/// Row (0 at the bottom) for the item at `rank` among `n` bars.
fn row_for_rank(n: u32, rank: usize) -> u32 {
    n.saturating_sub(rank as u32 + 1)
}

/// Inverse of [`row_for_rank`]; `None` for rows past the last bar.
fn rank_for_row(n: u32, row: u32) -> Option<usize> {
    n.checked_sub(row + 1).map(|r| r as usize)
}

/// Horizontal bars, first item at the top.
pub fn horizontal_bars(
    items: &[(String, usize)],
    path: &Path,
    size: (u32, u32),
    title: &str,
    x_desc: &str,
    color: fn(usize) -> RGBColor,
) -> Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let n = items.len() as u32;
    let max = items.iter().map(|(_, count)| *count as u32).max().unwrap_or(0);
    let labels: Vec<String> = items
        .iter()
        .map(|(label, _)| truncate_label(label, MAX_LABEL_CHARS))
        .collect();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 26))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(280)
        .build_cartesian_2d(0u32..max + 1, (0u32..n.saturating_sub(1)).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(items.len())
        .y_label_formatter(&|v: &SegmentValue<u32>| match v {
            SegmentValue::CenterOf(row) | SegmentValue::Exact(row) => rank_for_row(n, *row)
                .and_then(|rank| labels.get(rank).cloned())
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .x_desc(x_desc)
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .margin(6)
            .style_func(move |row, _| {
                let rank = match row {
                    SegmentValue::CenterOf(r) | SegmentValue::Exact(r) => rank_for_row(n, *r).unwrap_or(0),
                    SegmentValue::Last => 0,
                };
                color(rank).filled()
            })
            .data(
                items
                    .iter()
                    .enumerate()
                    .map(|(rank, (_, count))| (row_for_rank(n, rank), *count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}

/// Share of each level, with percentage labels.
pub fn level_pie(counts: &[(Level, usize)], path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Распределение вакансий по уровням", (FONT, 28))?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let sizes: Vec<f64> = counts.iter().map(|(_, count)| *count as f64).collect();
    let colors: Vec<RGBColor> = (0..counts.len())
        .map(|i| PIE_COLORS[i % PIE_COLORS.len()])
        .collect();
    let labels: Vec<&str> = counts.iter().map(|(level, _)| level.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(PIE_START_ANGLE);
    pie.label_style((FONT, 22).into_font().color(&BLACK));
    pie.percentages((FONT, radius * 0.08).into_font().color(&WHITE));
    root.draw(&pie)?;

    root.present()?;
    Ok(())
}
