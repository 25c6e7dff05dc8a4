//! Report types and formatting utilities for Insight outputs.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AggregatedTrends, ComparisonMap, SignalRecord, TrendEntry};
use crate::error::{InsightError, Result};

/// Minimum number of populated fields for a report to count as an insight.
pub const MIN_POPULATED_FIELDS: usize = 2;

/// Result fields of a full analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InsightReport {
    /// Keyword frequency across repositories.
    pub aggregate: BTreeMap<String, TrendEntry>,
    /// Framework adoption counts keyed by `<Label>_projects`, plus `difference`.
    pub comparison: BTreeMap<String, i64>,
    /// Generated summary text.
    pub summary: String,
    /// Whether the summary passed the grounding check.
    pub verified: bool,
}

impl InsightReport {
    /// Number of result fields carrying data.
    pub fn populated_fields(&self) -> usize {
        [
            !self.aggregate.is_empty(),
            !self.comparison.is_empty(),
            !self.summary.is_empty(),
            self.verified,
        ]
        .into_iter()
        .filter(|populated| *populated)
        .count()
    }

    /// Reject reports with fewer than `required` populated fields.
    pub fn ensure_sufficient(self, required: usize) -> Result<Self> {
        let populated = self.populated_fields();
        if populated < required {
            return Err(InsightError::InsufficientInsight {
                populated,
                required,
            });
        }
        Ok(self)
    }
}

/// Deterministic results computed without the text-generation stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendReport {
    /// Per-repository keyword signals.
    pub project_signals: Vec<SignalRecord>,
    /// Keyword frequency across repositories.
    pub aggregate: AggregatedTrends,
    /// Framework adoption counts.
    pub comparison: ComparisonMap,
}

/// Render an insight report as Markdown.
pub fn render_insight_markdown(report: &InsightReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Repository Insight Report\n");
    append_summary(&mut output, &report.summary, report.verified);
    append_trends(&mut output, &report.aggregate);
    append_comparison(&mut output, &report.comparison);
    output
}

/// Render a trend report as Markdown.
pub fn render_trend_markdown(report: &TrendReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Repository Trend Report\n");
    append_signals(&mut output, &report.project_signals);
    append_trends(&mut output, &report.aggregate);
    append_comparison(&mut output, &report.comparison);
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(
    payload: &T,
) -> std::result::Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

/// Trends sorted by count, most frequent first, ties by keyword.
pub fn format_trends(trends: &AggregatedTrends) -> Vec<(String, TrendEntry)> {
    let mut items: Vec<(String, TrendEntry)> =
        trends.iter().map(|(k, v)| (k.clone(), *v)).collect();
    items.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    items
}

fn append_summary(output: &mut String, summary: &str, verified: bool) {
    let _ = writeln!(output, "## Summary");
    if summary.is_empty() {
        let _ = writeln!(output, "No summary generated.\n");
    } else {
        let _ = writeln!(output, "{summary}\n");
    }
    let status = if verified { "grounded" } else { "unverified" };
    let _ = writeln!(output, "- Grounding: {status}\n");
}

fn append_signals(output: &mut String, signals: &[SignalRecord]) {
    if signals.is_empty() {
        let _ = writeln!(output, "## Projects\nNo projects analyzed.\n");
        return;
    }
    let _ = writeln!(output, "## Projects");
    for signal in signals {
        let keywords = if signal.keywords.is_empty() {
            "none".to_string()
        } else {
            signal.keywords.join(", ")
        };
        let _ = writeln!(output, "- {}: {keywords}", signal.name);
    }
    let _ = writeln!(output);
}

fn append_trends(output: &mut String, trends: &AggregatedTrends) {
    if trends.is_empty() {
        let _ = writeln!(output, "## Trends\nNo aggregated trends.\n");
        return;
    }
    let _ = writeln!(output, "## Trends");
    for (keyword, entry) in format_trends(trends) {
        let _ = writeln!(
            output,
            "- {keyword}: {} projects ({:.2}%)",
            entry.count, entry.percentage
        );
    }
    let _ = writeln!(output);
}

fn append_comparison(output: &mut String, comparison: &ComparisonMap) {
    let _ = writeln!(output, "## Comparison");
    for (key, value) in comparison.iter().filter(|(key, _)| *key != "difference") {
        let _ = writeln!(output, "- {key}: {value}");
    }
    if let Some(difference) = comparison.get("difference") {
        let _ = writeln!(output, "- difference: {difference:+}");
    }
    let _ = writeln!(output);
}
