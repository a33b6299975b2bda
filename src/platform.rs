use anyhow::Result;

use crate::context::Repo;
use crate::models::JobResult;

/// The slice of the hosting platform's API the annotator talks to.
///
/// `GithubClient` is the real implementation; tests use an in-memory fake.
#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    /// `Ok(false)` when the file does not exist at the repository root.
    async fn file_exists(&self, repo: &Repo, path: &str) -> Result<bool>;
    async fn list_jobs(&self, repo: &Repo, run_id: u64) -> Result<Vec<JobResult>>;
    async fn create_comment(&self, repo: &Repo, issue: u64, body: &str) -> Result<u64>;
    async fn add_labels(&self, repo: &Repo, issue: u64, labels: &[&str]) -> Result<()>;
    /// `Ok(false)` when the label was not on the issue.
    async fn remove_label(&self, repo: &Repo, issue: u64, label: &str) -> Result<bool>;
    async fn dispatch_workflow(&self, repo: &Repo, workflow: &str, git_ref: &str) -> Result<()>;
}
