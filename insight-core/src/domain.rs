//! Domain entities for Insight.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Keyword frequency across the analyzed repositories, keyed by keyword.
pub type AggregatedTrends = BTreeMap<String, TrendEntry>;

/// Wire representation of a [`Comparison`].
pub type ComparisonMap = BTreeMap<String, i64>;

/// Repository metadata supplied by the fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RepositoryRecord {
    /// Repository name.
    pub name: String,
    /// Free-form README text.
    #[serde(default)]
    pub readme: String,
    /// Topic tags as supplied by the fetcher.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RepositoryRecord {
    /// Create a record with an empty tag list.
    pub fn new(name: impl Into<String>, readme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            readme: readme.into(),
            tags: Vec::new(),
        }
    }

    /// Attach tags to the record.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Keyword snapshot extracted from one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SignalRecord {
    /// Repository name.
    pub name: String,
    /// Vocabulary keywords found in the repository, in vocabulary order.
    pub keywords: Vec<String>,
    /// The repository's own tags.
    pub tags: Vec<String>,
}

impl SignalRecord {
    /// Whether the record carries the given keyword.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|candidate| candidate == keyword)
    }
}

/// Frequency of a single keyword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrendEntry {
    /// Number of repositories mentioning the keyword.
    pub count: usize,
    /// Share of repositories mentioning the keyword, 0-100, two decimals.
    pub percentage: f64,
}

/// A framework tracked by the comparator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Framework {
    /// Lower-cased vocabulary keyword that identifies the framework.
    pub keyword: String,
    /// Display label used in the comparison output.
    pub label: String,
}

impl Framework {
    /// Create a framework entry, normalising the keyword to lower case.
    pub fn new(keyword: impl AsRef<str>, label: impl Into<String>) -> Self {
        Self {
            keyword: keyword.as_ref().trim().to_lowercase(),
            label: label.into(),
        }
    }

    /// Output key for the framework's project count.
    pub fn count_key(&self) -> String {
        format!("{}_projects", self.label)
    }
}

/// Adoption counts of two frameworks across the analyzed repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ComparisonMap")]
pub struct Comparison {
    /// First framework of the pair.
    pub framework_a: Framework,
    /// Repositories mentioning the first framework.
    pub framework_a_count: usize,
    /// Second framework of the pair.
    pub framework_b: Framework,
    /// Repositories mentioning the second framework.
    pub framework_b_count: usize,
    /// `framework_a_count - framework_b_count`.
    pub difference: i64,
}

impl Comparison {
    /// Render the comparison as `{<A>_projects, <B>_projects, difference}`.
    pub fn to_map(&self) -> ComparisonMap {
        let mut map = BTreeMap::new();
        map.insert(self.framework_a.count_key(), self.framework_a_count as i64);
        map.insert(self.framework_b.count_key(), self.framework_b_count as i64);
        map.insert("difference".to_string(), self.difference);
        map
    }
}

impl From<Comparison> for ComparisonMap {
    fn from(value: Comparison) -> Self {
        value.to_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comparison() -> Comparison {
        Comparison {
            framework_a: Framework::new("crewai", "CrewAI"),
            framework_a_count: 3,
            framework_b: Framework::new("langchain", "LangChain"),
            framework_b_count: 5,
            difference: -2,
        }
    }

    #[test]
    fn repository_record_defaults_missing_fields() {
        let record: RepositoryRecord =
            serde_json::from_str(r#"{"name":"solo"}"#).expect("parse record");
        assert_eq!(record, RepositoryRecord::new("solo", ""));
    }

    #[test]
    fn comparison_serializes_with_labelled_keys() {
        let json = serde_json::to_value(sample_comparison()).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "CrewAI_projects": 3,
                "LangChain_projects": 5,
                "difference": -2
            })
        );
    }

    #[test]
    fn framework_keyword_is_normalised() {
        let framework = Framework::new("  CrewAI ", "CrewAI");
        assert_eq!(framework.keyword, "crewai");
        assert_eq!(framework.count_key(), "CrewAI_projects");
    }

    #[test]
    fn signal_record_mentions_exact_keywords_only() {
        let signal = SignalRecord {
            name: "a".to_string(),
            keywords: vec!["langchain".to_string()],
            tags: Vec::new(),
        };
        assert!(signal.mentions("langchain"));
        assert!(!signal.mentions("lang"));
    }
}
