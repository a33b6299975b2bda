// GitHub REST client backing the `Platform` trait.
use anyhow::{anyhow, Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::json;
use url::Url;

use crate::config::USER_AGENT as UA;
use crate::context::Repo;
use crate::models::{CreatedComment, JobResult, JobsPage};
use crate::platform::Platform;

const API_VERSION: &str = "2022-11-28";

#[derive(Clone)]
pub struct GithubClient {
    base: Url,
    token: String,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn new(base: &str, token: impl Into<String>) -> Result<Self> {
        let base = Url::parse(base).with_context(|| format!("invalid API url '{base}'"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("invalid API url '{base}'"));
        }
        Ok(Self {
            base,
            token: token.into(),
            http: reqwest::Client::new(),
        })
    }

    /// Join path segments onto the API base, percent-encoding each one
    /// (label names like "CI: Failed" contain spaces).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn repo_endpoint(&self, repo: &Repo, rest: &[&str]) -> Url {
        let mut segments = vec!["repos", repo.owner.as_str(), repo.name.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, UA)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

#[async_trait::async_trait]
impl Platform for GithubClient {
    async fn file_exists(&self, repo: &Repo, path: &str) -> Result<bool> {
        let url = self.repo_endpoint(repo, &["contents", path]);
        let resp = self.request(Method::GET, url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        resp.error_for_status()?;
        Ok(true)
    }

    async fn list_jobs(&self, repo: &Repo, run_id: u64) -> Result<Vec<JobResult>> {
        let run_id = run_id.to_string();
        let url = self.repo_endpoint(repo, &["actions", "runs", &run_id, "jobs"]);
        let page: JobsPage = self
            .request(Method::GET, url)
            .send().await?
            .error_for_status()?
            .json().await
            .context("decoding workflow jobs json")?;
        Ok(page.jobs)
    }

    async fn create_comment(&self, repo: &Repo, issue: u64, body: &str) -> Result<u64> {
        let issue = issue.to_string();
        let url = self.repo_endpoint(repo, &["issues", &issue, "comments"]);
        let created: CreatedComment = self
            .request(Method::POST, url)
            .json(&json!({ "body": body }))
            .send().await?
            .error_for_status()?
            .json().await
            .context("decoding created comment json")?;
        Ok(created.id)
    }

    async fn add_labels(&self, repo: &Repo, issue: u64, labels: &[&str]) -> Result<()> {
        let issue = issue.to_string();
        let url = self.repo_endpoint(repo, &["issues", &issue, "labels"]);
        self.request(Method::POST, url)
            .json(&json!({ "labels": labels }))
            .send().await?
            .error_for_status()?;
        Ok(())
    }

    async fn remove_label(&self, repo: &Repo, issue: u64, label: &str) -> Result<bool> {
        let issue = issue.to_string();
        let url = self.repo_endpoint(repo, &["issues", &issue, "labels", label]);
        let resp = self.request(Method::DELETE, url).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        resp.error_for_status()?;
        Ok(true)
    }

    async fn dispatch_workflow(&self, repo: &Repo, workflow: &str, git_ref: &str) -> Result<()> {
        let url = self.repo_endpoint(repo, &["actions", "workflows", workflow, "dispatches"]);
        let resp = self
            .request(Method::POST, url)
            .json(&json!({ "ref": git_ref }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("workflow dispatch failed: {status}: {body}");
        }
        Ok(())
    }
}
