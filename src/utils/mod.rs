use std::time::Instant;
use tracing::info;

/// Logs how long a pipeline stage took when it goes out of scope.
pub struct Timer {
    stage: String,
    start: Instant,
}

impl Timer {
    pub fn start(stage: impl Into<String>) -> Self {
        let stage = stage.into();
        info!("Stage started: {}", stage);
        Self {
            stage,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!("Stage finished: {} ({:.2?})", self.stage, self.start.elapsed());
    }
}

/// `part` as a percentage of `total`, one decimal. Zero total gives 0.0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

/// Cut `label` to at most `max` characters, marking the cut with an ellipsis.
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let mut out: String = label.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(5, 0), 0.0);
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("SQL", 10), "SQL");
        assert_eq!(truncate_label("Анализ данных", 7), "Анализ…");
        assert_eq!(truncate_label("abcdef", 6), "abcdef");
    }
}
