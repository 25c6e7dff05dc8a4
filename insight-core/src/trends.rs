//! Keyword trend aggregation.

use std::collections::BTreeMap;

use crate::domain::{AggregatedTrends, SignalRecord, TrendEntry};

/// Tally keyword occurrence across signal records.
///
/// A keyword counts once per record. Percentages are relative to the number
/// of records, with the denominator clamped to at least one.
pub fn aggregate_trends(signals: &[SignalRecord]) -> AggregatedTrends {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for signal in signals {
        let mut seen: Vec<&str> = Vec::with_capacity(signal.keywords.len());
        for keyword in &signal.keywords {
            if seen.contains(&keyword.as_str()) {
                continue;
            }
            seen.push(keyword);
            *counts.entry(keyword).or_insert(0) += 1;
        }
    }

    let total = signals.len().max(1);
    counts
        .into_iter()
        .map(|(keyword, count)| {
            let percentage = round_percentage((count as f64 / total as f64) * 100.0);
            (keyword.to_string(), TrendEntry { count, percentage })
        })
        .collect()
}

/// Round a percentage to two decimal places, ties to even.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
