use crate::config::default_currency;
use crate::models::{Level, ShapeError, Vacancy, VacancyRecord, VacancyRow};

pub const NO_TITLE: &str = "Не указано";
pub const NO_COMPANY: &str = "Не указана";
pub const NO_EXPERIENCE: &str = "Не указан";

/// Separator between skills in the `Навыки` column.
pub const SKILL_SEPARATOR: &str = ", ";

// ── Row builder ───────────────────────────────────────────────────────────────

/// Project a vacancy into a row. `skills` come from the detail record, not
/// from the vacancy's embedded list.
pub fn build_row(vacancy: &Vacancy, level: Level, skills: &[String]) -> Result<VacancyRow, ShapeError> {
    Ok(VacancyRow {
        title: vacancy.title()?.unwrap_or_else(|| NO_TITLE.to_string()),
        company: vacancy.employer_name()?.unwrap_or_else(|| NO_COMPANY.to_string()),
        level,
        salary_from: vacancy.salary_from()?,
        salary_to: vacancy.salary_to()?,
        currency: vacancy.currency()?.unwrap_or_else(default_currency),
        experience: vacancy.experience_name()?.unwrap_or_else(|| NO_EXPERIENCE.to_string()),
        url: vacancy.url()?.unwrap_or_default(),
        skills: skills.join(SKILL_SEPARATOR),
    })
}

// ── Coercion ──────────────────────────────────────────────────────────────────

/// Parse a salary bound. Anything that is not a finite number is missing.
/// "120000" → 120000.0 | " 95000.5 " → 95000.5 | "abc" → None
pub fn parse_amount(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn coerce_row(row: VacancyRow) -> VacancyRecord {
    VacancyRecord {
        salary_from: row.salary_from.as_deref().and_then(parse_amount),
        salary_to: row.salary_to.as_deref().and_then(parse_amount),
        title: row.title,
        company: row.company,
        level: row.level,
        currency: row.currency,
        experience: row.experience,
        url: row.url,
        skills: row.skills,
    }
}

/// Individual skills of a joined `Навыки` cell.
pub fn split_skills(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(SKILL_SEPARATOR).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_vacancy_projects_every_field() {
        let v = Vacancy::new(json!({
            "id": "101",
            "name": "Аналитик данных",
            "employer": {"name": "Яндекс"},
            "salary": {"from": 150000, "to": null, "currency": "RUR"},
            "experience": {"name": "От 1 года до 3 лет"},
            "alternate_url": "https://hh.ru/vacancy/101",
            "key_skills": [{"name": "ignored for output"}],
        }));
        let skills = vec!["SQL".to_string(), "Python".to_string()];

        let row = build_row(&v, Level::Middle, &skills).unwrap();

        assert_eq!(row.title, "Аналитик данных");
        assert_eq!(row.company, "Яндекс");
        assert_eq!(row.salary_from.as_deref(), Some("150000"));
        assert_eq!(row.salary_to, None);
        assert_eq!(row.currency, "RUR");
        assert_eq!(row.experience, "От 1 года до 3 лет");
        assert_eq!(row.url, "https://hh.ru/vacancy/101");
        assert_eq!(row.skills, "SQL, Python");
    }

    #[test]
    fn missing_fields_get_placeholders() {
        let row = build_row(&Vacancy::new(json!({"salary": null})), Level::Other, &[]).unwrap();

        assert_eq!(row.title, NO_TITLE);
        assert_eq!(row.company, NO_COMPANY);
        assert_eq!(row.currency, "RUR");
        assert_eq!(row.experience, NO_EXPERIENCE);
        assert_eq!(row.url, "");
        assert_eq!(row.skills, "");
    }

    #[test]
    fn malformed_employer_drops_the_row() {
        let v = Vacancy::new(json!({"name": "Аналитик", "employer": "ООО Ромашка"}));
        assert!(build_row(&v, Level::Other, &[]).is_err());
    }

    #[test]
    fn container_salary_bounds_keep_the_row() {
        let v = Vacancy::new(json!({"name": "Аналитик",
                                    "salary": {"from": {"amount": 100000}, "to": [1, 2], "currency": "RUR"}}));
        let row = build_row(&v, Level::Other, &[]).unwrap();
        assert_eq!(row.salary_from, None);
        assert_eq!(row.salary_to, None);
        assert_eq!(row.currency, "RUR");

        let v = Vacancy::new(json!({"name": "Аналитик", "salary": "100000"}));
        assert!(build_row(&v, Level::Other, &[]).is_err());
    }

    #[test]
    fn amounts_coerce_or_go_missing() {
        assert_eq!(parse_amount("50000"), Some(50000.0));
        assert_eq!(parse_amount(" 95000.5 "), Some(95000.5));
        assert_eq!(parse_amount("договорная"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn split_skips_empty_pieces() {
        assert_eq!(split_skills("Python, SQL").collect::<Vec<_>>(), vec!["Python", "SQL"]);
        assert_eq!(split_skills("").count(), 0);
    }
}
