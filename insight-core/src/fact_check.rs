//! Lexical grounding check for generated summaries.

use crate::taxonomy::TermList;

/// Whether the summary mentions at least one grounding term, ignoring case.
///
/// This only checks topical presence; numbers in the summary are not
/// compared against the computed trends.
pub fn check_grounding(summary: &str, grounding_terms: &TermList) -> bool {
    let summary = summary.to_lowercase();
    grounding_terms
        .as_slice()
        .iter()
        .any(|term| summary.contains(term.as_str()))
}

#[cfg(test)]
mod tests {
    use super::check_grounding;
    use crate::taxonomy::{DEFAULT_GROUNDING_TERMS, TermList};

    fn terms() -> TermList {
        TermList::new(DEFAULT_GROUNDING_TERMS)
    }

    #[test]
    fn detects_framework_names_in_any_case() {
        assert!(check_grounding("CREWAI is popular", &terms()));
        assert!(check_grounding("LangChain dominates", &terms()));
    }

    #[test]
    fn detects_generic_grounding_words() {
        assert!(check_grounding("Half of the Projects use RAG", &terms()));
        assert!(check_grounding("The percentage is low", &terms()));
    }

    #[test]
    fn ungrounded_summary_is_not_verified() {
        assert!(!check_grounding("Nothing notable was found.", &terms()));
        assert!(!check_grounding("", &terms()));
    }
}
