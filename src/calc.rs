use crate::roster::{PerformanceRecord, Student};

/// One-decimal rounding used for every displayed average:
/// `Int(10*x + 0.5) / 10`
pub fn round_off_1_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

pub fn record_average(record: &PerformanceRecord) -> f64 {
    let values = record.subjects.values();
    let sum: i64 = values.iter().sum();
    sum as f64 / values.len() as f64
}

/// Mean over every score in every record, not a mean of per-record means.
/// `None` when the student has no records yet.
pub fn overall_average(student: &Student) -> Option<f64> {
    let mut total: i64 = 0;
    let mut count: usize = 0;
    for record in &student.performance {
        for v in record.subjects.values() {
            total += v;
            count += 1;
        }
    }
    if count == 0 {
        return None;
    }
    Some(total as f64 / count as f64)
}

pub fn average_display(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{:.1}%", round_off_1_decimal(v)),
        None => "N/A".to_string(),
    }
}
