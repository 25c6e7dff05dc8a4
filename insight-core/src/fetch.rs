//! Repository fetch collaborators.

use crate::domain::RepositoryRecord;
use crate::error::{InsightError, Result};

/// Supplies repository records for identifiers such as repository URLs.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryFetcher {
    /// Fetch the record for a single repository identifier.
    fn fetch(&self, identifier: &str) -> Result<RepositoryRecord>;
}

/// Placeholder fetcher that synthesizes a record from the identifier alone.
#[derive(Debug, Default, Clone)]
pub struct StubRepositoryFetcher;

impl StubRepositoryFetcher {
    /// Create a new stub fetcher.
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFetcher for StubRepositoryFetcher {
    fn fetch(&self, identifier: &str) -> Result<RepositoryRecord> {
        Ok(RepositoryRecord::new(
            repository_name(identifier),
            format!("Repository fetched from {identifier}"),
        ))
    }
}

/// Fetch every identifier in order, rejecting blank identifiers.
pub fn fetch_all<F: RepositoryFetcher + ?Sized>(
    fetcher: &F,
    identifiers: &[String],
) -> Result<Vec<RepositoryRecord>> {
    identifiers
        .iter()
        .map(|identifier| {
            if identifier.trim().is_empty() {
                return Err(InsightError::Input(
                    "repository identifier cannot be empty".to_string(),
                ));
            }
            fetcher.fetch(identifier)
        })
        .collect()
}

/// Last path segment of an identifier, ignoring trailing slashes.
pub fn repository_name(identifier: &str) -> String {
    let trimmed = identifier.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_derives_name_and_readme() {
        let record = StubRepositoryFetcher::new()
            .fetch("https://github.com/org/agent-lab/")
            .expect("fetch");
        assert_eq!(record.name, "agent-lab");
        assert_eq!(
            record.readme,
            "Repository fetched from https://github.com/org/agent-lab/"
        );
        assert!(record.tags.is_empty());
    }

    #[test]
    fn repository_name_handles_bare_identifiers() {
        assert_eq!(repository_name("solo"), "solo");
        assert_eq!(repository_name("org/repo.git"), "repo.git");
    }

    #[test]
    fn fetch_all_rejects_blank_identifiers() {
        let err = fetch_all(&StubRepositoryFetcher::new(), &["  ".to_string()]).unwrap_err();
        assert!(matches!(err, InsightError::Input(_)));
    }

    #[test]
    fn fetch_all_passes_identifiers_through_unmodified() {
        let mut fetcher = MockRepositoryFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|identifier| identifier == " https://example.com/a ")
            .times(1)
            .returning(|identifier| {
                Ok(RepositoryRecord::new(
                    "a",
                    format!("Repository fetched from {identifier}"),
                ))
            });

        let records = fetch_all(&fetcher, &[" https://example.com/a ".to_string()]).expect("fetch");
        assert_eq!(
            records[0].readme,
            "Repository fetched from  https://example.com/a "
        );
    }

    #[test]
    fn fetch_all_propagates_fetcher_errors() {
        let mut fetcher = MockRepositoryFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|identifier| identifier == "https://example.com/a")
            .returning(|identifier| Ok(RepositoryRecord::new(repository_name(identifier), "")));
        fetcher
            .expect_fetch()
            .withf(|identifier| identifier == "https://example.com/b")
            .returning(|_| Err(InsightError::UpstreamFetch("rate limited".to_string())));

        let ok = fetch_all(&fetcher, &["https://example.com/a".to_string()]).expect("fetch");
        assert_eq!(ok[0].name, "a");

        let err = fetch_all(
            &fetcher,
            &[
                "https://example.com/a".to_string(),
                "https://example.com/b".to_string(),
            ],
        )
        .unwrap_err();
        assert_eq!(err, InsightError::UpstreamFetch("rate limited".to_string()));
    }
}
