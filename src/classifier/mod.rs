//! Seniority heuristic.
//!
//! Keywords are matched against the title and the vacancy's own embedded
//! skills, in Senior → Middle → Junior priority. With no keyword hit the
//! experience requirement decides, then the lower salary bound. Shape errors
//! never escape: they turn into [`Level::Error`].

use crate::models::{Level, ShapeError, Vacancy};
use tracing::warn;

const SENIOR_KEYWORDS: &[&str] = &["senior", "сеньор", "старш", "ведущий", "руководитель"];
const MIDDLE_KEYWORDS: &[&str] = &["middle", "миддл", "средний", "опыт от 1 года"];
const JUNIOR_KEYWORDS: &[&str] = &["junior", "джун", "младш", "начинающий", "стажер"];

const EXPERIENCE_LEVELS: &[(&str, Level)] = &[
    ("нет опыта", Level::Junior),
    ("от 1 года до 3 лет", Level::Middle),
    ("от 3 лет", Level::Senior),
];

/// Lower salary bound at which a vacancy counts as Middle.
pub const MIDDLE_SALARY_FROM: f64 = 80_000.0;
/// Lower salary bound at which a vacancy counts as Senior.
pub const SENIOR_SALARY_FROM: f64 = 180_000.0;

pub fn detect_level(vacancy: &Vacancy) -> Level {
    match try_detect_level(vacancy) {
        Ok(level) => level,
        Err(e) => {
            warn!("Level detection failed for vacancy {}: {}", vacancy.display_id(), e);
            Level::Error
        }
    }
}

fn try_detect_level(vacancy: &Vacancy) -> Result<Level, ShapeError> {
    let experience = vacancy.experience_label()?.unwrap_or_default().to_lowercase();
    let salary_from = vacancy.salary_from()?;
    let skills = vacancy.embedded_skills()?.join(" ").to_lowercase();
    let title = vacancy.title()?.unwrap_or_default().to_lowercase();

    let mentions = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| title.contains(k) || skills.contains(k))
    };

    if mentions(SENIOR_KEYWORDS) {
        return Ok(Level::Senior);
    }
    if mentions(MIDDLE_KEYWORDS) {
        return Ok(Level::Middle);
    }
    if mentions(JUNIOR_KEYWORDS) {
        return Ok(Level::Junior);
    }

    if let Some((_, level)) = EXPERIENCE_LEVELS
        .iter()
        .find(|(pattern, _)| experience.contains(pattern))
    {
        return Ok(*level);
    }

    Ok(salary_from
        .as_deref()
        .and_then(parse_salary_floor)
        .map(level_for_salary)
        .unwrap_or(Level::Other))
}

/// A zero or unparsable lower bound carries no signal.
fn parse_salary_floor(s: &str) -> Option<f64> {
    let v: f64 = s.trim().parse().ok()?;
    (v != 0.0 && !v.is_nan()).then_some(v)
}

fn level_for_salary(from: f64) -> Level {
    if from < MIDDLE_SALARY_FROM {
        Level::Junior
    } else if from < SENIOR_SALARY_FROM {
        Level::Middle
    } else {
        Level::Senior
    }
}
