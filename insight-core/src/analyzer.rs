//! Per-repository signal extraction.

use crate::domain::{RepositoryRecord, SignalRecord};
use crate::keywords::extract_keywords;
use crate::reader::read_repository;
use crate::taxonomy::TermList;

/// Extract one signal record per repository, preserving input order.
pub fn analyze_projects(repos: &[RepositoryRecord], vocabulary: &TermList) -> Vec<SignalRecord> {
    repos
        .iter()
        .map(|repo| analyze_project(repo, vocabulary))
        .collect()
}

/// Extract the signal record for a single repository.
pub fn analyze_project(repo: &RepositoryRecord, vocabulary: &TermList) -> SignalRecord {
    let content = read_repository(repo);
    SignalRecord {
        name: repo.name.clone(),
        keywords: extract_keywords(&content, vocabulary),
        tags: repo.tags.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{DEFAULT_VOCABULARY, TermList};

    #[test]
    fn keeps_input_order_and_tags() {
        let repos = vec![
            RepositoryRecord::new("first", "evaluation harness").with_tags(["eval"]),
            RepositoryRecord::new("second", "nothing to see"),
        ];
        let signals = analyze_projects(&repos, &TermList::new(DEFAULT_VOCABULARY));

        assert_eq!(signals.len(), 2);
        assert_eq!(signals[0].name, "first");
        assert_eq!(signals[0].keywords, vec!["evaluation"]);
        assert_eq!(signals[0].tags, vec!["eval"]);
        assert_eq!(signals[1].name, "second");
        assert!(signals[1].keywords.is_empty());
    }

    #[test]
    fn tags_and_name_contribute_keywords() {
        let repo = RepositoryRecord::new("langgraph-demo", "").with_tags(["Vector Database"]);
        let signal = analyze_project(&repo, &TermList::new(DEFAULT_VOCABULARY));
        assert_eq!(signal.keywords, vec!["langgraph", "vector database"]);
    }

    #[test]
    fn empty_repository_list_yields_no_signals() {
        assert!(analyze_projects(&[], &TermList::new(DEFAULT_VOCABULARY)).is_empty());
    }
}
