#![deny(missing_docs)]
//! Insight core library.
//!
//! This crate contains the domain types and the five-stage analysis pipeline
//! that turns repository metadata into keyword trends, a framework comparison,
//! and a grounded summary.

pub mod analyzer;
pub mod comparator;
pub mod domain;
pub mod error;
pub mod fact_check;
pub mod fetch;
pub mod keywords;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod summarizer;
pub mod taxonomy;
pub mod trends;

pub use analyzer::{analyze_project, analyze_projects};
pub use comparator::compare_frameworks;
pub use domain::{
    AggregatedTrends, Comparison, ComparisonMap, Framework, RepositoryRecord, SignalRecord,
    TrendEntry,
};
pub use error::{InsightError, Result};
pub use fact_check::check_grounding;
pub use fetch::{RepositoryFetcher, StubRepositoryFetcher, fetch_all};
pub use keywords::extract_keywords;
pub use pipeline::{InsightPipeline, PipelineInput, PipelineStage, compute_trends};
pub use reader::read_repository;
pub use report::{
    InsightReport, MIN_POPULATED_FIELDS, TrendReport, format_trends, render_insight_markdown,
    render_json, render_trend_markdown,
};
pub use summarizer::{DEFAULT_MODEL, DEFAULT_QUERY, TextGenerator, build_prompt, summarize};
pub use taxonomy::{FrameworkPair, Taxonomy, TermList};
pub use trends::{aggregate_trends, round_percentage};
