//! Prompt construction and summary generation.

use std::fmt::Write;
use std::sync::Arc;

use crate::domain::{AggregatedTrends, Comparison};
use crate::error::Result;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Query used in the prompt when the caller supplies none.
pub const DEFAULT_QUERY: &str = "General analysis of repositories";

/// External text-generation capability.
#[cfg_attr(test, mockall::automock)]
pub trait TextGenerator {
    /// Generate text for `prompt` with the given model.
    fn generate(&self, model: &str, prompt: &str) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        (**self).generate(model, prompt)
    }
}

/// Build the grounding prompt from the query and computed data.
pub fn build_prompt(
    query: &str,
    trends: &AggregatedTrends,
    comparison: &Comparison,
) -> Result<String> {
    let query = if query.trim().is_empty() {
        DEFAULT_QUERY
    } else {
        query
    };
    let trends_json = serde_json::to_string_pretty(trends)?;
    let comparison_json = serde_json::to_string_pretty(comparison)?;

    let mut prompt = String::new();
    let _ = writeln!(prompt, "You are a research summarization agent.\n");
    let _ = writeln!(prompt, "User query:\n{query}\n");
    let _ = writeln!(prompt, "Aggregated trends:\n{trends_json}\n");
    let _ = writeln!(prompt, "Comparison results:\n{comparison_json}\n");
    let _ = writeln!(
        prompt,
        "Write a concise, factual summary grounded only in the data above."
    );
    Ok(prompt)
}

/// Generate a summary for `prompt`, trimming surrounding whitespace.
///
/// Generator failures are returned unchanged.
pub fn summarize<G: TextGenerator + ?Sized>(
    generator: &G,
    model: &str,
    prompt: &str,
) -> Result<String> {
    let text = generator.generate(model, prompt)?;
    Ok(text.trim().to_string())
}
