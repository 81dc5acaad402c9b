//! Aggregation over classified vacancies.
//!
//! A [`VacancyTable`] is built once from projected rows and never mutated;
//! the currency view and the error-free view are new tables.

use crate::models::{Level, VacancyRecord, VacancyRow};
use crate::scraper::cleaner::{coerce_row, split_skills};
use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VacancyTable {
    records: Vec<VacancyRecord>,
}

impl VacancyTable {
    /// Coerce salary bounds and freeze the rows in order.
    pub fn from_rows(rows: Vec<VacancyRow>) -> Self {
        Self {
            records: rows.into_iter().map(coerce_row).collect(),
        }
    }

    pub fn from_records(records: Vec<VacancyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[VacancyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filtered(&self, keep: impl Fn(&VacancyRecord) -> bool) -> Self {
        Self {
            records: self.records.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Rows whose currency is exactly `code`.
    pub fn in_currency(&self, code: &str) -> Self {
        self.filtered(|r| r.currency == code)
    }

    /// Rows the classifier could not label are left out.
    pub fn without_errors(&self) -> Self {
        self.filtered(|r| r.level != Level::Error)
    }

    pub fn count_by_level(&self, level: Level) -> usize {
        self.records.iter().filter(|r| r.level == level).count()
    }

    /// Lower salary bounds per graded level, in Junior, Middle, Senior order.
    /// Rows without a lower bound are left out.
    pub fn salary_from_by_level(&self) -> Vec<(Level, Vec<f64>)> {
        Level::GRADED
            .iter()
            .map(|&level| {
                let values = self
                    .records
                    .iter()
                    .filter(|r| r.level == level)
                    .filter_map(|r| r.salary_from)
                    .collect();
                (level, values)
            })
            .collect()
    }

    /// The `n` most frequent skills across rows with a non-empty skill cell.
    pub fn top_skills(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts = value_counts(
            self.records
                .iter()
                .filter(|r| !r.skills.is_empty())
                .flat_map(|r| split_skills(&r.skills))
                .map(str::to_string),
        );
        counts.truncate(n);
        counts
    }

    pub fn level_counts(&self) -> Vec<(Level, usize)> {
        value_counts(self.records.iter().map(|r| r.level))
    }

    pub fn experience_counts(&self) -> Vec<(String, usize)> {
        value_counts(self.records.iter().map(|r| r.experience.clone()))
    }
}

/// Occurrence counts, most frequent first. Ties keep first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
