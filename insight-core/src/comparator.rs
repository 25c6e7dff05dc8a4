//! Framework adoption comparison.

use crate::domain::{Comparison, SignalRecord};
use crate::taxonomy::FrameworkPair;

/// Count records mentioning each framework of the pair.
///
/// A record mentioning both frameworks counts toward both.
pub fn compare_frameworks(signals: &[SignalRecord], frameworks: &FrameworkPair) -> Comparison {
    let count_a = count_mentions(signals, &frameworks.a.keyword);
    let count_b = count_mentions(signals, &frameworks.b.keyword);
    Comparison {
        framework_a: frameworks.a.clone(),
        framework_a_count: count_a,
        framework_b: frameworks.b.clone(),
        framework_b_count: count_b,
        difference: count_a as i64 - count_b as i64,
    }
}

fn count_mentions(signals: &[SignalRecord], keyword: &str) -> usize {
    signals
        .iter()
        .filter(|signal| signal.mentions(keyword))
        .count()
}
