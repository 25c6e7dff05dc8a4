//! Keyword extraction over free text.

use crate::taxonomy::TermList;

/// Return the vocabulary terms that occur in `text`, in vocabulary order.
///
/// Matching is case-insensitive substring containment: no stemming and no
/// word-boundary checks, so `"rag"` also matches inside `"storage"`.
pub fn extract_keywords(text: &str, vocabulary: &TermList) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let haystack = text.to_lowercase();
    vocabulary
        .as_slice()
        .iter()
        .filter(|keyword| haystack.contains(keyword.as_str()))
        .cloned()
        .collect()
}
