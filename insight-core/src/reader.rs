//! Repository text formatting for keyword extraction.

use std::fmt::Write;

use crate::domain::RepositoryRecord;

/// Format a repository's name, README, and tags as one block of text.
pub fn read_repository(repo: &RepositoryRecord) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Repository: {}", repo.name);
    let _ = writeln!(output, "README:");
    let _ = writeln!(output, "{}", repo.readme);
    let _ = writeln!(output, "Tags: {}", repo.tags.join(", "));
    output
}
