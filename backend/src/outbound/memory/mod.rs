//! Process-local adapters used when no database is configured.

mod in_memory_issue_repository;

pub use in_memory_issue_repository::InMemoryIssueRepository;
