use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

// ── Level ─────────────────────────────────────────────────────────────────────

/// Seniority label inferred for a vacancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Junior,
    Middle,
    Senior,
    Other,
    Error,
}

impl Level {
    /// Levels that get a salary box on the chart, in axis order.
    pub const GRADED: [Level; 3] = [Level::Junior, Level::Middle, Level::Senior];

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::Middle => "Middle",
            Level::Senior => "Senior",
            Level::Other => "Other",
            Level::Error => "Error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── API payloads ──────────────────────────────────────────────────────────────

/// One page of `GET /vacancies`. Items stay raw: their shape is checked
/// field by field when classifying and projecting.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    pub found: u64,
    /// Missing or not a count: the items are still kept, paging stops.
    #[serde(default, deserialize_with = "lenient_count")]
    pub pages: Option<u32>,
    pub items: Vec<Value>,
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Value::deserialize(deserializer)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok()))
}

/// A vacancy as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Vacancy(pub Value);

#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("vacancy is not a JSON object")]
    NotAnObject,
    #[error("field `{field}` should be {expected}, got {found}")]
    Unexpected {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unexpected(field: &'static str, expected: &'static str, v: &Value) -> ShapeError {
    ShapeError::Unexpected {
        field,
        expected,
        found: kind(v),
    }
}

/// Absent and null are the same thing for every vacancy field.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

impl Vacancy {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    fn object(&self) -> Result<&Map<String, Value>, ShapeError> {
        self.0.as_object().ok_or(ShapeError::NotAnObject)
    }

    /// The `id` as text, if the vacancy has a usable one.
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `id` for log lines.
    pub fn display_id(&self) -> String {
        self.id().unwrap_or_else(|| "no-id".to_string())
    }

    /// Scalars are rendered as text; containers are a shape error.
    fn text(&self, field: &'static str) -> Result<Option<String>, ShapeError> {
        match present(self.object()?, field) {
            None => Ok(None),
            Some(v) => scalar_text(v).map(Some).ok_or_else(|| unexpected(field, "a scalar", v)),
        }
    }

    fn nested(&self, field: &'static str) -> Result<Option<&Map<String, Value>>, ShapeError> {
        match present(self.object()?, field) {
            None => Ok(None),
            Some(Value::Object(m)) => Ok(Some(m)),
            Some(v) => Err(unexpected(field, "an object", v)),
        }
    }

    fn nested_text(
        &self,
        field: &'static str,
        key: &str,
        path: &'static str,
    ) -> Result<Option<String>, ShapeError> {
        let Some(obj) = self.nested(field)? else {
            return Ok(None);
        };
        match present(obj, key) {
            None => Ok(None),
            Some(v) => scalar_text(v).map(Some).ok_or_else(|| unexpected(path, "a scalar", v)),
        }
    }

    pub fn title(&self) -> Result<Option<String>, ShapeError> {
        self.text("name")
    }

    pub fn url(&self) -> Result<Option<String>, ShapeError> {
        self.text("alternate_url")
    }

    pub fn employer_name(&self) -> Result<Option<String>, ShapeError> {
        self.nested_text("employer", "name", "employer.name")
    }

    pub fn experience_name(&self) -> Result<Option<String>, ShapeError> {
        self.nested_text("experience", "name", "experience.name")
    }

    /// `experience.name` for matching: only a string will do.
    pub fn experience_label(&self) -> Result<Option<String>, ShapeError> {
        let Some(obj) = self.nested("experience")? else {
            return Ok(None);
        };
        match present(obj, "name") {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v) => Err(unexpected("experience.name", "a string", v)),
        }
    }

    /// A bound that is not a scalar is unparsable, not malformed: it reads
    /// as missing. `salary` itself must still be an object.
    fn salary_bound(&self, key: &str) -> Result<Option<String>, ShapeError> {
        let Some(salary) = self.nested("salary")? else {
            return Ok(None);
        };
        Ok(present(salary, key).and_then(scalar_text))
    }

    pub fn salary_from(&self) -> Result<Option<String>, ShapeError> {
        self.salary_bound("from")
    }

    pub fn salary_to(&self) -> Result<Option<String>, ShapeError> {
        self.salary_bound("to")
    }

    pub fn currency(&self) -> Result<Option<String>, ShapeError> {
        self.nested_text("salary", "currency", "salary.currency")
    }

    /// Names of the embedded `key_skills`. Elements that are not objects are
    /// skipped; the list itself must be an array when present.
    pub fn embedded_skills(&self) -> Result<Vec<String>, ShapeError> {
        match present(self.object()?, "key_skills") {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(Value::as_object)
                .map(|skill| present(skill, "name").and_then(scalar_text).unwrap_or_default())
                .collect()),
            Some(v) => Err(unexpected("key_skills", "an array", v)),
        }
    }
}

fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Strict variant used for detail records: every element must be
/// `{"name": "<string>"}` or the whole list is rejected. Unlike
/// [`Vacancy::embedded_skills`], which skips bad elements, a bad element here
/// means the detail record is unusable and the vacancy gets no skills.
pub fn detail_skills(detail: &Value) -> Option<Vec<String>> {
    let Some(list) = detail.get("key_skills") else {
        return Some(Vec::new());
    };
    if list.is_null() {
        return Some(Vec::new());
    }
    list.as_array()?
        .iter()
        .map(|skill| {
            let obj = skill.as_object()?;
            match obj.get("name") {
                None => Some(String::new()),
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => None,
            }
        })
        .collect()
}

// ── Rows ──────────────────────────────────────────────────────────────────────

/// A projected vacancy before numeric coercion. Salary bounds are still the
/// raw text the API returned.
#[derive(Debug, Clone, PartialEq)]
pub struct VacancyRow {
    pub title: String,
    pub company: String,
    pub level: Level,
    pub salary_from: Option<String>,
    pub salary_to: Option<String>,
    pub currency: String,
    pub experience: String,
    pub url: String,
    pub skills: String,
}

/// Column names of the output CSV, in order. Must match [`VacancyRecord`].
pub const CSV_HEADER: [&str; 9] = [
    "Название",
    "Компания",
    "Уровень",
    "Зарплата_от",
    "Зарплата_до",
    "Валюта",
    "Опыт",
    "Ссылка",
    "Навыки",
];

/// A table row, as written to and read back from the CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancyRecord {
    #[serde(rename = "Название")]
    pub title: String,
    #[serde(rename = "Компания")]
    pub company: String,
    #[serde(rename = "Уровень")]
    pub level: Level,
    #[serde(rename = "Зарплата_от")]
    pub salary_from: Option<f64>,
    #[serde(rename = "Зарплата_до")]
    pub salary_to: Option<f64>,
    #[serde(rename = "Валюта")]
    pub currency: String,
    #[serde(rename = "Опыт")]
    pub experience: String,
    #[serde(rename = "Ссылка")]
    pub url: String,
    #[serde(rename = "Навыки")]
    pub skills: String,
}
