//! Reads a previously written vacancy CSV back into a table.

use crate::analysis::VacancyTable;
use crate::models::VacancyRecord;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Unreadable rows are logged and skipped; a missing file is an error.
pub fn load_csv(path: &Path) -> Result<VacancyTable> {
    debug!("Loading vacancies from {:?}", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let mut records = Vec::new();

    for (i, result) in reader.deserialize::<VacancyRecord>().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("Row {} in {:?}: {}", i + 1, path, e),
        }
    }

    info!("{} vacancies loaded from {:?}", records.len(), path);
    Ok(VacancyTable::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, VacancyRow};
    use crate::storage::write_csv;

    #[test]
    fn reads_back_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyst_vacancies.csv");
        let table = VacancyTable::from_rows(vec![VacancyRow {
            title: "Ведущий аналитик".into(),
            company: "Тинькофф".into(),
            level: Level::Senior,
            salary_from: Some("250000".into()),
            salary_to: Some("320000".into()),
            currency: "RUR".into(),
            experience: "От 3 до 6 лет".into(),
            url: "https://hh.ru/vacancy/2".into(),
            skills: "SQL, Python, Tableau".into(),
        }]);

        write_csv(&table, &path).unwrap();
        let loaded = load_csv(&path).unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn bad_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.csv");
        std::fs::write(
            &path,
            "Название,Компания,Уровень,Зарплата_от,Зарплата_до,Валюта,Опыт,Ссылка,Навыки\n\
             A,B,Junior,,,RUR,Нет опыта,,\n\
             A,B,Principal,,,RUR,Нет опыта,,\n",
        )
        .unwrap();

        let loaded = load_csv(&path).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records()[0].salary_from, None);
        assert_eq!(loaded.records()[0].skills, "");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_csv(Path::new("/nonexistent/analyst_vacancies.csv")).is_err());
    }
}
