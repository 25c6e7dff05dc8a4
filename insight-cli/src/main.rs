#![deny(missing_docs)]
//! Insight command-line interface.
//!
//! Submits repositories to an Insight server for analysis and computes keyword
//! trends locally from repository records.

mod client;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
#[cfg(not(test))]
use client::ReqwestAnalyzeClient;
use client::{AnalyzeClient, DEFAULT_SERVER_URL, request_analysis};
use insight_core::{
    FrameworkPair, InsightReport, RepositoryRecord, Taxonomy, TermList, TrendReport,
    compute_trends, format_trends, render_insight_markdown, render_json, render_trend_markdown,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "insight", version, about = "Insight CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["file", "url"])
))]
struct RepoSourceArgs {
    /// File containing repository URLs (one per line).
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Repository URL to analyze (repeatable).
    #[arg(long)]
    url: Vec<String>,
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format for report data.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the report to a file instead of stdout.
    #[arg(long = "report-output")]
    report_output: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct TaxonomyArgs {
    /// Comma-separated keyword vocabulary override.
    #[arg(long, env = "INSIGHT_KEYWORDS")]
    keywords: Option<String>,
    /// Framework pair override, e.g. `crewai:CrewAI,langchain:LangChain`.
    #[arg(long, env = "INSIGHT_FRAMEWORKS")]
    frameworks: Option<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit repositories to an Insight server and render the report.
    Analyze {
        #[command(flatten)]
        source: RepoSourceArgs,
        /// Question guiding the generated summary.
        #[arg(long)]
        query: Option<String>,
        /// Base URL of the Insight server.
        #[arg(long, env = "INSIGHT_API_URL", default_value = DEFAULT_SERVER_URL)]
        server_url: String,
        #[command(flatten)]
        report: OutputArgs,
    },
    /// Compute keyword trends and the framework comparison locally.
    Trends {
        /// JSON file containing an array of repository records.
        #[arg(long)]
        records: PathBuf,
        #[command(flatten)]
        taxonomy: TaxonomyArgs,
        #[command(flatten)]
        report: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            source,
            query,
            server_url,
            report,
        } => {
            let client = ReqwestAnalyzeClient::new()?;
            run_analyze(&client, &source, &server_url, query, &report).await?
        }
        Commands::Trends {
            records,
            taxonomy,
            report,
        } => run_trends(&records, &taxonomy, &report).await?,
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

async fn run_analyze<C: AnalyzeClient>(
    client: &C,
    source: &RepoSourceArgs,
    server_url: &str,
    query: Option<String>,
    output: &OutputArgs,
) -> CliResult<()> {
    let repos = resolve_repo_urls(source).await?;
    let report = request_analysis(client, server_url, repos, query).await?;
    emit_insight_report(&report, output).await
}

async fn run_trends(records: &Path, taxonomy: &TaxonomyArgs, output: &OutputArgs) -> CliResult<()> {
    let repos = load_records(records).await?;
    let taxonomy = resolve_taxonomy(taxonomy)?;
    let report = compute_trends(repos, &taxonomy).into_trend_report();
    emit_trend_report(&report, output).await
}

async fn resolve_repo_urls(source: &RepoSourceArgs) -> CliResult<Vec<String>> {
    if let Some(file) = &source.file {
        return load_repo_urls(file).await;
    }
    let urls: Vec<String> = source
        .url
        .iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return Err("url cannot be empty".into());
    }
    Ok(urls)
}

async fn load_repo_urls(path: &Path) -> CliResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let urls = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(urls)
}

async fn load_records(path: &Path) -> CliResult<Vec<RepositoryRecord>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let records = serde_json::from_str(&contents)
        .map_err(|err| format!("invalid repository records in {}: {err}", path.display()))?;
    Ok(records)
}

fn resolve_taxonomy(args: &TaxonomyArgs) -> CliResult<Taxonomy> {
    let mut taxonomy = Taxonomy::default();
    if let Some(raw) = args.keywords.as_deref().filter(|raw| !raw.trim().is_empty()) {
        taxonomy.vocabulary = TermList::parse(raw)?;
    }
    if let Some(raw) = args.frameworks.as_deref().filter(|raw| !raw.trim().is_empty()) {
        taxonomy.frameworks = FrameworkPair::parse(raw)?;
    }
    for framework in taxonomy.unmatched_frameworks() {
        eprintln!(
            "warning: framework keyword {:?} is not in the vocabulary",
            framework.keyword
        );
    }
    Ok(taxonomy)
}

async fn emit_insight_report(report: &InsightReport, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_insight_text(report),
        OutputFormat::Markdown => render_insight_markdown(report),
        OutputFormat::Json => render_json(report)?,
    };
    emit_output(output, contents).await
}

async fn emit_trend_report(report: &TrendReport, output: &OutputArgs) -> CliResult<()> {
    let contents = match output.format {
        OutputFormat::Text => render_trend_text(report),
        OutputFormat::Markdown => render_trend_markdown(report),
        OutputFormat::Json => render_json(report)?,
    };
    emit_output(output, contents).await
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.report_output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_insight_text(report: &InsightReport) -> String {
    let mut output = String::new();
    if report.summary.is_empty() {
        let _ = writeln!(output, "Summary: none");
    } else {
        let _ = writeln!(output, "Summary: {}", report.summary);
    }
    let _ = writeln!(
        output,
        "Verified: {}",
        if report.verified { "yes" } else { "no" }
    );
    append_trends_text(&mut output, &report.aggregate);
    append_comparison_text(&mut output, &report.comparison);
    output
}

fn render_trend_text(report: &TrendReport) -> String {
    let mut output = String::new();
    if report.project_signals.is_empty() {
        let _ = writeln!(output, "Projects: none");
    } else {
        let _ = writeln!(output, "Projects:");
        for signal in &report.project_signals {
            if signal.keywords.is_empty() {
                let _ = writeln!(output, "- {}: no keywords", signal.name);
            } else {
                let _ = writeln!(output, "- {}: {}", signal.name, signal.keywords.join(", "));
            }
        }
    }
    append_trends_text(&mut output, &report.aggregate);
    append_comparison_text(&mut output, &report.comparison);
    output
}

fn append_trends_text(output: &mut String, trends: &insight_core::AggregatedTrends) {
    if trends.is_empty() {
        let _ = writeln!(output, "Trends: none detected");
        return;
    }
    let _ = writeln!(output, "Trends:");
    for (keyword, entry) in format_trends(trends) {
        let _ = writeln!(
            output,
            "- {keyword}: {} ({:.2}%)",
            entry.count, entry.percentage
        );
    }
}

fn append_comparison_text(output: &mut String, comparison: &insight_core::ComparisonMap) {
    let _ = writeln!(output, "Comparison:");
    for (key, value) in comparison {
        let _ = writeln!(output, "- {key}: {value}");
    }
}
