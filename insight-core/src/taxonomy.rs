//! Keyword vocabulary, framework pair, and grounding terms.

use crate::domain::Framework;
use crate::error::{InsightError, Result};

/// Keywords recognised by the extractor, in declaration order.
pub const DEFAULT_VOCABULARY: [&str; 6] = [
    "langgraph",
    "crewai",
    "langchain",
    "vector database",
    "rag",
    "evaluation",
];

/// Terms whose presence marks a summary as grounded.
pub const DEFAULT_GROUNDING_TERMS: [&str; 4] = ["crewai", "langchain", "percentage", "projects"];

/// An ordered, de-duplicated list of lower-cased terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermList(Vec<String>);

impl TermList {
    /// Build a term list, normalising case and dropping blank or repeated terms.
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() || normalized.contains(&term) {
                continue;
            }
            normalized.push(term);
        }
        Self(normalized)
    }

    /// Parse a comma-separated list such as `"rag, evaluation"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let terms = Self::new(raw.split(','));
        if terms.is_empty() {
            return Err(InsightError::Input("term list cannot be empty".to_string()));
        }
        Ok(terms)
    }

    /// Terms in declaration order.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether the list contains the given (lower-cased) term.
    pub fn contains(&self, term: &str) -> bool {
        self.0.iter().any(|candidate| candidate == term)
    }

    /// Whether the list has no terms.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The two frameworks whose adoption is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkPair {
    /// Framework counted on the left of the difference.
    pub a: Framework,
    /// Framework counted on the right of the difference.
    pub b: Framework,
}

impl FrameworkPair {
    /// Create a framework pair.
    pub fn new(a: Framework, b: Framework) -> Self {
        Self { a, b }
    }

    /// Parse `"keyword[:Label],keyword[:Label]"`.
    pub fn parse(raw: &str) -> Result<Self> {
        let entries: Vec<&str> = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .collect();
        let [first, second] = entries.as_slice() else {
            return Err(InsightError::Input(format!(
                "expected two frameworks, found {}",
                entries.len()
            )));
        };
        Ok(Self::new(parse_framework(first)?, parse_framework(second)?))
    }
}

impl Default for FrameworkPair {
    fn default() -> Self {
        Self::new(
            Framework::new("crewai", "CrewAI"),
            Framework::new("langchain", "LangChain"),
        )
    }
}

fn parse_framework(entry: &str) -> Result<Framework> {
    let (keyword, label) = match entry.split_once(':') {
        Some((keyword, label)) => (keyword.trim(), label.trim()),
        None => (entry, entry),
    };
    if keyword.is_empty() {
        return Err(InsightError::Input(format!(
            "framework keyword missing in {entry:?}"
        )));
    }
    let label = if label.is_empty() { keyword } else { label };
    Ok(Framework::new(keyword, label))
}

/// Configuration data shared by the extractor, comparator, and fact checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taxonomy {
    /// Keywords the extractor looks for.
    pub vocabulary: TermList,
    /// Frameworks compared against each other.
    pub frameworks: FrameworkPair,
    /// Terms the fact checker looks for in the summary.
    pub grounding_terms: TermList,
}

impl Taxonomy {
    /// Frameworks of the pair that the vocabulary cannot detect.
    pub fn unmatched_frameworks(&self) -> Vec<&Framework> {
        [&self.frameworks.a, &self.frameworks.b]
            .into_iter()
            .filter(|framework| !self.vocabulary.contains(&framework.keyword))
            .collect()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            vocabulary: TermList::new(DEFAULT_VOCABULARY),
            frameworks: FrameworkPair::default(),
            grounding_terms: TermList::new(DEFAULT_GROUNDING_TERMS),
        }
    }
}
