//! Five-stage analysis pipeline.
//!
//! Each stage consumes the state produced by its predecessor and returns a new
//! state type that only exposes the fields valid at that point:
//!
//! ```text
//! PipelineInput -> Analyzed -> Aggregated -> Compared -> Summarized -> Verified
//! ```

use std::fmt;

use crate::analyzer::analyze_projects;
use crate::comparator::compare_frameworks;
use crate::domain::{AggregatedTrends, Comparison, RepositoryRecord, SignalRecord};
use crate::error::Result;
use crate::fact_check::check_grounding;
use crate::report::{InsightReport, TrendReport};
use crate::summarizer::{DEFAULT_MODEL, TextGenerator, build_prompt, summarize};
use crate::taxonomy::{FrameworkPair, Taxonomy, TermList};
use crate::trends::aggregate_trends;

/// Position of an invocation within the pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    /// Nothing has run yet.
    Start,
    /// Signal records were extracted.
    Analyzed,
    /// Trends were aggregated.
    Aggregated,
    /// Frameworks were compared.
    Compared,
    /// A summary was generated.
    Summarized,
    /// The summary was fact checked.
    Verified,
    /// The invocation finished.
    End,
}

impl PipelineStage {
    /// Stable stage label.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::Analyzed => "analyzed",
            PipelineStage::Aggregated => "aggregated",
            PipelineStage::Compared => "compared",
            PipelineStage::Summarized => "summarized",
            PipelineStage::Verified => "verified",
            PipelineStage::End => "end",
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<PipelineStage> {
        match self {
            PipelineStage::Start => Some(PipelineStage::Analyzed),
            PipelineStage::Analyzed => Some(PipelineStage::Aggregated),
            PipelineStage::Aggregated => Some(PipelineStage::Compared),
            PipelineStage::Compared => Some(PipelineStage::Summarized),
            PipelineStage::Summarized => Some(PipelineStage::Verified),
            PipelineStage::Verified => Some(PipelineStage::End),
            PipelineStage::End => None,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repositories and query entering the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    repos: Vec<RepositoryRecord>,
    query: String,
}

impl PipelineInput {
    /// Create the initial state.
    pub fn new(repos: Vec<RepositoryRecord>, query: impl Into<String>) -> Self {
        Self {
            repos,
            query: query.into(),
        }
    }

    /// Repositories to analyze.
    pub fn repos(&self) -> &[RepositoryRecord] {
        &self.repos
    }

    /// Extract one signal record per repository.
    pub fn analyze(self, vocabulary: &TermList) -> Analyzed {
        let project_signals = analyze_projects(&self.repos, vocabulary);
        Analyzed {
            query: self.query,
            project_signals,
        }
    }
}

/// State after signal extraction.
#[derive(Debug, Clone)]
pub struct Analyzed {
    query: String,
    project_signals: Vec<SignalRecord>,
}

impl Analyzed {
    /// Per-repository signals, in input order.
    pub fn project_signals(&self) -> &[SignalRecord] {
        &self.project_signals
    }

    /// Tally keyword frequency across the signals.
    pub fn aggregate(self) -> Aggregated {
        let aggregated_trends = aggregate_trends(&self.project_signals);
        Aggregated {
            query: self.query,
            project_signals: self.project_signals,
            aggregated_trends,
        }
    }
}

/// State after trend aggregation.
#[derive(Debug, Clone)]
pub struct Aggregated {
    query: String,
    project_signals: Vec<SignalRecord>,
    aggregated_trends: AggregatedTrends,
}

impl Aggregated {
    /// Per-keyword frequency.
    pub fn aggregated_trends(&self) -> &AggregatedTrends {
        &self.aggregated_trends
    }

    /// Count adoption of the two frameworks.
    pub fn compare(self, frameworks: &FrameworkPair) -> Compared {
        let comparison = compare_frameworks(&self.project_signals, frameworks);
        Compared {
            query: self.query,
            project_signals: self.project_signals,
            aggregated_trends: self.aggregated_trends,
            comparison,
        }
    }
}

/// State after the framework comparison.
#[derive(Debug, Clone)]
pub struct Compared {
    query: String,
    project_signals: Vec<SignalRecord>,
    aggregated_trends: AggregatedTrends,
    comparison: Comparison,
}

impl Compared {
    /// Per-repository signals, in input order.
    pub fn project_signals(&self) -> &[SignalRecord] {
        &self.project_signals
    }

    /// Per-keyword frequency.
    pub fn aggregated_trends(&self) -> &AggregatedTrends {
        &self.aggregated_trends
    }

    /// Framework adoption counts.
    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    /// Generate the summary through the external model.
    pub fn summarize<G: TextGenerator + ?Sized>(
        self,
        generator: &G,
        model: &str,
    ) -> Result<Summarized> {
        let prompt = build_prompt(&self.query, &self.aggregated_trends, &self.comparison)?;
        let summary = summarize(generator, model, &prompt)?;
        Ok(Summarized {
            aggregated_trends: self.aggregated_trends,
            comparison: self.comparison,
            summary,
        })
    }

    /// Deterministic results without a summary.
    pub fn into_trend_report(self) -> TrendReport {
        TrendReport {
            project_signals: self.project_signals,
            aggregate: self.aggregated_trends,
            comparison: self.comparison.to_map(),
        }
    }
}

/// State after summary generation.
#[derive(Debug, Clone)]
pub struct Summarized {
    aggregated_trends: AggregatedTrends,
    comparison: Comparison,
    summary: String,
}

impl Summarized {
    /// Generated summary, trimmed.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Check the summary for grounding terms.
    pub fn verify(self, grounding_terms: &TermList) -> Verified {
        let verified = check_grounding(&self.summary, grounding_terms);
        Verified {
            aggregated_trends: self.aggregated_trends,
            comparison: self.comparison,
            summary: self.summary,
            verified,
        }
    }
}

/// Terminal state carrying the four result fields.
#[derive(Debug, Clone)]
pub struct Verified {
    aggregated_trends: AggregatedTrends,
    comparison: Comparison,
    summary: String,
    verified: bool,
}

impl Verified {
    /// Whether the summary passed the grounding check.
    pub fn verified(&self) -> bool {
        self.verified
    }

    /// Convert into the externally visible report.
    pub fn into_report(self) -> InsightReport {
        InsightReport {
            aggregate: self.aggregated_trends,
            comparison: self.comparison.to_map(),
            summary: self.summary,
            verified: self.verified,
        }
    }
}

/// Runs the fixed stage sequence with an injected text generator.
#[derive(Debug, Clone)]
pub struct InsightPipeline<G> {
    generator: G,
    taxonomy: Taxonomy,
    model: String,
}

impl<G: TextGenerator> InsightPipeline<G> {
    /// Create a pipeline with the default taxonomy and model.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            taxonomy: Taxonomy::default(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Replace the taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Replace the model identifier passed to the generator.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Active taxonomy.
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Run all five stages. A generation failure aborts the invocation.
    pub fn invoke(&self, repos: Vec<RepositoryRecord>, query: &str) -> Result<InsightReport> {
        let compared = self.trends_with_query(repos, query);
        let summarized = compared.summarize(&self.generator, &self.model)?;
        log_transition(PipelineStage::Compared);
        let verified = summarized.verify(&self.taxonomy.grounding_terms);
        log_transition(PipelineStage::Summarized);
        log::debug!("summary verified: {}", verified.verified());
        log_transition(PipelineStage::Verified);
        Ok(verified.into_report())
    }

    /// Run only the deterministic stages.
    pub fn trends(&self, repos: Vec<RepositoryRecord>) -> Compared {
        compute_trends(repos, &self.taxonomy)
    }

    fn trends_with_query(&self, repos: Vec<RepositoryRecord>, query: &str) -> Compared {
        run_deterministic(PipelineInput::new(repos, query), &self.taxonomy)
    }
}

/// Run the analysis, aggregation and comparison stages without a text generator.
pub fn compute_trends(repos: Vec<RepositoryRecord>, taxonomy: &Taxonomy) -> Compared {
    run_deterministic(PipelineInput::new(repos, ""), taxonomy)
}

fn run_deterministic(input: PipelineInput, taxonomy: &Taxonomy) -> Compared {
    let analyzed = input.analyze(&taxonomy.vocabulary);
    log_transition(PipelineStage::Start);
    let aggregated = analyzed.aggregate();
    log_transition(PipelineStage::Analyzed);
    let compared = aggregated.compare(&taxonomy.frameworks);
    log_transition(PipelineStage::Aggregated);
    compared
}

fn log_transition(from: PipelineStage) {
    if let Some(to) = from.next() {
        log::debug!("pipeline transition {from} -> {to}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InsightError;
    use crate::summarizer::MockTextGenerator;

    fn sample_repos() -> Vec<RepositoryRecord> {
        vec![
            RepositoryRecord::new("a", "Uses LangChain and RAG"),
            RepositoryRecord::new("b", "Built with CrewAI"),
        ]
    }

    fn fixed_generator(text: &'static str) -> MockTextGenerator {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(move |_, _| Ok(text.to_string()));
        generator
    }

    #[test]
    fn stages_thread_state_forward() {
        let taxonomy = Taxonomy::default();
        let analyzed = PipelineInput::new(sample_repos(), "").analyze(&taxonomy.vocabulary);
        assert_eq!(analyzed.project_signals().len(), 2);

        let aggregated = analyzed.aggregate();
        assert_eq!(aggregated.aggregated_trends().len(), 3);

        let compared = aggregated.compare(&taxonomy.frameworks);
        assert_eq!(compared.comparison().framework_a_count, 1);
        assert_eq!(compared.comparison().framework_b_count, 1);

        let summarized = compared
            .summarize(&fixed_generator("  CrewAI and LangChain tie.  "), DEFAULT_MODEL)
            .expect("summarize");
        assert_eq!(summarized.summary(), "CrewAI and LangChain tie.");

        let verified = summarized.verify(&taxonomy.grounding_terms);
        assert!(verified.verified());
    }

    #[test]
    fn invoke_returns_all_result_fields() {
        let pipeline = InsightPipeline::new(fixed_generator("Half of the projects use RAG."));
        let report = pipeline.invoke(sample_repos(), "agents").expect("invoke");

        assert_eq!(report.aggregate["langchain"].count, 1);
        assert_eq!(report.aggregate["crewai"].percentage, 50.0);
        assert_eq!(report.comparison["CrewAI_projects"], 1);
        assert_eq!(report.comparison["LangChain_projects"], 1);
        assert_eq!(report.comparison["difference"], 0);
        assert_eq!(report.summary, "Half of the projects use RAG.");
        assert!(report.verified);
    }

    #[test]
    fn invoke_passes_model_and_query_to_generator() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .withf(|model, prompt| model == "test-model" && prompt.contains("Compare agents"))
            .times(1)
            .returning(|_, _| Ok("ok".to_string()));

        let pipeline = InsightPipeline::new(generator).with_model("test-model");
        let report = pipeline
            .invoke(sample_repos(), "Compare agents")
            .expect("invoke");
        assert!(!report.verified);
    }

    #[test]
    fn invoke_aborts_on_generation_failure() {
        let mut generator = MockTextGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _| Err(InsightError::Generation("network down".to_string())));

        let err = InsightPipeline::new(generator)
            .invoke(sample_repos(), "")
            .unwrap_err();
        assert_eq!(err, InsightError::Generation("network down".to_string()));
    }

    #[test]
    fn trends_skip_the_generator() {
        let mut generator = MockTextGenerator::new();
        generator.expect_generate().never();

        let compared = InsightPipeline::new(generator).trends(sample_repos());
        let report = compared.into_trend_report();
        assert_eq!(report.project_signals.len(), 2);
        assert_eq!(report.comparison["difference"], 0);
    }

    #[test]
    fn compute_trends_uses_the_given_taxonomy() {
        let taxonomy = Taxonomy {
            vocabulary: TermList::new(["autogen", "crewai"]),
            ..Taxonomy::default()
        };
        let repos = vec![
            RepositoryRecord::new("a", "AutoGen agents with LangChain"),
            RepositoryRecord::new("b", "CrewAI crew"),
        ];
        let report = compute_trends(repos, &taxonomy).into_trend_report();
        assert_eq!(report.project_signals[0].keywords, vec!["autogen"]);
        assert!(!report.aggregate.contains_key("langchain"));
        assert_eq!(report.comparison["LangChain_projects"], 0);
        assert_eq!(report.comparison["CrewAI_projects"], 1);
    }

    #[test]
    fn stage_sequence_is_linear() {
        let mut stage = PipelineStage::Start;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            visited.push(next);
            stage = next;
        }
        let labels: Vec<&str> = visited.iter().map(PipelineStage::as_str).collect();
        assert_eq!(
            labels,
            [
                "start",
                "analyzed",
                "aggregated",
                "compared",
                "summarized",
                "verified",
                "end"
            ]
        );
    }
}
