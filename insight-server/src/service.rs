//! Analysis orchestration behind the HTTP boundary.

use std::sync::Arc;

use insight_core::{
    DEFAULT_MODEL, FrameworkPair, InsightError, InsightPipeline, InsightReport,
    MIN_POPULATED_FIELDS, RepositoryFetcher, Result, StubRepositoryFetcher, Taxonomy, TermList,
    TextGenerator, fetch_all,
};
use uuid::Uuid;

use crate::gemini::GeminiClient;

/// Shared text generator handle.
pub type SharedGenerator = Arc<dyn TextGenerator + Send + Sync>;

/// Deterministic in-process generator used when live generation is disabled.
#[derive(Debug, Default, Clone)]
pub struct MockGenerator;

impl TextGenerator for MockGenerator {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let query = prompt
            .lines()
            .skip_while(|line| !line.starts_with("User query:"))
            .nth(1)
            .unwrap_or_default()
            .trim();
        Ok(format!(
            "Offline summary from {model} for \"{query}\": see the aggregated trends and framework comparison of the analyzed projects."
        ))
    }
}

/// Runs the fetch, pipeline, and insufficiency check for one request.
#[derive(Clone)]
pub struct AnalysisService {
    pipeline: Arc<InsightPipeline<SharedGenerator>>,
    fetcher: Arc<dyn RepositoryFetcher + Send + Sync>,
}

impl AnalysisService {
    /// Build a service from explicit collaborators.
    pub fn new(
        generator: SharedGenerator,
        fetcher: Arc<dyn RepositoryFetcher + Send + Sync>,
        taxonomy: Taxonomy,
        model: impl Into<String>,
    ) -> Self {
        let pipeline = InsightPipeline::new(generator)
            .with_taxonomy(taxonomy)
            .with_model(model);
        Self {
            pipeline: Arc::new(pipeline),
            fetcher,
        }
    }

    /// Build a service with the deterministic generator and default taxonomy.
    pub fn mock() -> Self {
        Self::new(
            Arc::new(MockGenerator),
            Arc::new(StubRepositoryFetcher::new()),
            Taxonomy::default(),
            DEFAULT_MODEL,
        )
    }

    /// Build a service from environment configuration.
    pub fn from_env() -> Result<Self> {
        let taxonomy = taxonomy_from_env()?;
        for framework in taxonomy.unmatched_frameworks() {
            log::warn!(
                "framework keyword {:?} is not in the vocabulary; {} will always count zero",
                framework.keyword,
                framework.count_key()
            );
        }

        let mode = std::env::var("INSIGHT_GENERATION_MODE").unwrap_or_else(|_| "live".to_string());
        let fetcher = Arc::new(StubRepositoryFetcher::new());
        if mode.eq_ignore_ascii_case("mock") {
            log::info!("text generation running in mock mode");
            return Ok(Self::new(
                Arc::new(MockGenerator),
                fetcher,
                taxonomy,
                DEFAULT_MODEL,
            ));
        }

        let client = GeminiClient::from_env();
        let model = client.model().to_string();
        log::info!("text generation using gemini model {model}");
        Ok(Self::new(Arc::new(client), fetcher, taxonomy, model))
    }

    /// Active taxonomy.
    pub fn taxonomy(&self) -> &Taxonomy {
        self.pipeline.taxonomy()
    }

    /// Analyze the given repository identifiers.
    pub fn analyze(
        &self,
        analysis_id: Uuid,
        repos: &[String],
        query: Option<&str>,
    ) -> Result<InsightReport> {
        if repos.is_empty() {
            return Err(InsightError::Input("No repositories provided".to_string()));
        }
        log::info!(
            "analysis {analysis_id} started for {} repositories",
            repos.len()
        );

        let records = fetch_all(self.fetcher.as_ref(), repos)?;
        let report = match self.pipeline.invoke(records, query.unwrap_or_default()) {
            Ok(report) => report,
            Err(err) => {
                log::error!("analysis {analysis_id} failed: {err}");
                return Err(err);
            }
        };
        let report = report.ensure_sufficient(MIN_POPULATED_FIELDS)?;
        log::info!(
            "analysis {analysis_id} finished: {} keywords, verified={}",
            report.aggregate.len(),
            report.verified
        );
        Ok(report)
    }
}

/// Load the taxonomy, applying `INSIGHT_KEYWORDS`, `INSIGHT_FRAMEWORKS`, and
/// `INSIGHT_GROUNDING_TERMS` overrides.
pub fn taxonomy_from_env() -> Result<Taxonomy> {
    let mut taxonomy = Taxonomy::default();
    if let Some(raw) = non_empty_var("INSIGHT_KEYWORDS") {
        taxonomy.vocabulary = TermList::parse(&raw)?;
    }
    if let Some(raw) = non_empty_var("INSIGHT_FRAMEWORKS") {
        taxonomy.frameworks = FrameworkPair::parse(&raw)?;
    }
    if let Some(raw) = non_empty_var("INSIGHT_GROUNDING_TERMS") {
        taxonomy.grounding_terms = TermList::parse(&raw)?;
    }
    Ok(taxonomy)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insight_core::RepositoryRecord;

    use crate::test_env::{env_lock, remove_env, set_env};

    struct FixedGenerator(&'static str);

    impl TextGenerator for FixedGenerator {
        fn generate(&self, _model: &str, _prompt: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingFetcher;

    impl RepositoryFetcher for FailingFetcher {
        fn fetch(&self, identifier: &str) -> Result<RepositoryRecord> {
            Err(InsightError::UpstreamFetch(format!("{identifier} unreachable")))
        }
    }

    fn repos(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn mock_service_returns_a_populated_report() {
        let service = AnalysisService::mock();
        let report = service
            .analyze(
                Uuid::new_v4(),
                &repos(&["https://github.com/org/langchain-agents"]),
                Some("Agent frameworks"),
            )
            .expect("analyze");

        assert_eq!(report.aggregate["langchain"].count, 1);
        assert_eq!(report.comparison["LangChain_projects"], 1);
        assert!(report.summary.contains("Agent frameworks"));
        assert!(report.verified);
    }

    #[test]
    fn empty_repository_list_is_rejected() {
        let err = AnalysisService::mock()
            .analyze(Uuid::new_v4(), &[], None)
            .unwrap_err();
        assert_eq!(err, InsightError::Input("No repositories provided".to_string()));
    }

    #[test]
    fn blank_identifier_is_rejected() {
        let err = AnalysisService::mock()
            .analyze(Uuid::new_v4(), &repos(&["https://github.com/org/a", "  "]), None)
            .unwrap_err();
        assert!(matches!(err, InsightError::Input(_)));
    }

    #[test]
    fn fetch_failures_propagate() {
        let service = AnalysisService::new(
            Arc::new(MockGenerator),
            Arc::new(FailingFetcher),
            Taxonomy::default(),
            DEFAULT_MODEL,
        );
        let err = service
            .analyze(Uuid::new_v4(), &repos(&["https://github.com/org/a"]), None)
            .unwrap_err();
        assert!(matches!(err, InsightError::UpstreamFetch(_)));
    }

    #[test]
    fn sparse_reports_are_insufficient() {
        let taxonomy = Taxonomy {
            vocabulary: TermList::new(["kubernetes"]),
            frameworks: FrameworkPair::default(),
            grounding_terms: TermList::new(["kubernetes"]),
        };
        let service = AnalysisService::new(
            Arc::new(FixedGenerator("")),
            Arc::new(StubRepositoryFetcher::new()),
            taxonomy,
            DEFAULT_MODEL,
        );
        let err = service
            .analyze(Uuid::new_v4(), &repos(&["https://github.com/org/a"]), None)
            .unwrap_err();
        assert_eq!(
            err,
            InsightError::InsufficientInsight {
                populated: 1,
                required: MIN_POPULATED_FIELDS
            }
        );
    }

    #[test]
    fn mock_generator_echoes_default_query() {
        let text = MockGenerator
            .generate(
                DEFAULT_MODEL,
                "You are a research summarization agent.\n\nUser query:\nGeneral analysis of repositories\n",
            )
            .expect("generate");
        assert!(text.contains("General analysis of repositories"));
        assert!(text.contains(DEFAULT_MODEL));
    }

    #[test]
    fn taxonomy_overrides_are_read_from_env() {
        let _guard = env_lock();
        set_env("INSIGHT_KEYWORDS", "autogen, crewai, rag");
        set_env("INSIGHT_FRAMEWORKS", "crewai:CrewAI,autogen:AutoGen");
        set_env("INSIGHT_GROUNDING_TERMS", "autogen");
        let taxonomy = taxonomy_from_env().expect("taxonomy");
        assert_eq!(taxonomy.vocabulary.as_slice(), ["autogen", "crewai", "rag"]);
        assert_eq!(taxonomy.frameworks.b.count_key(), "AutoGen_projects");
        assert!(taxonomy.grounding_terms.contains("autogen"));

        set_env("INSIGHT_FRAMEWORKS", "crewai");
        assert!(taxonomy_from_env().is_err());

        remove_env("INSIGHT_KEYWORDS");
        remove_env("INSIGHT_FRAMEWORKS");
        remove_env("INSIGHT_GROUNDING_TERMS");
        assert_eq!(taxonomy_from_env().expect("defaults"), Taxonomy::default());
    }

    #[test]
    fn from_env_honours_mock_mode() {
        let _guard = env_lock();
        set_env("INSIGHT_GENERATION_MODE", "mock");
        let service = AnalysisService::from_env().expect("service");
        let report = service
            .analyze(Uuid::new_v4(), &repos(&["https://github.com/org/crewai-demo"]), None)
            .expect("analyze");
        assert_eq!(report.comparison["CrewAI_projects"], 1);
        assert_eq!(service.taxonomy(), &Taxonomy::default());
        remove_env("INSIGHT_GENERATION_MODE");
    }
}
