use futures_util::future::join_all;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::context::Repo;
use crate::models::JobResult;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub workflow_file: String,
    pub git_ref: String,
}

#[derive(Error, Debug)]
#[error("{workflow_file}: {message}")]
pub struct DispatchFailure {
    pub workflow_file: String,
    pub message: String,
}

#[derive(Error, Debug)]
#[error("{} of {attempted} auto-fix dispatches failed: {}", .failures.len(), join_failures(.failures))]
pub struct DispatchError {
    pub attempted: usize,
    pub failures: Vec<DispatchFailure>,
}

fn join_failures(failures: &[DispatchFailure]) -> String {
    failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
}

/// One dispatch per failed job that has an auto-fix workflow configured.
pub fn plan(
    jobs: &[JobResult],
    auto_fix: &BTreeMap<String, String>,
    git_ref: &str,
) -> Vec<DispatchRequest> {
    jobs.iter()
        .filter(|job| job.failed())
        .filter_map(|job| auto_fix.get(&job.name).filter(|w| !w.is_empty()))
        .map(|workflow| DispatchRequest {
            workflow_file: workflow.clone(),
            git_ref: git_ref.to_string(),
        })
        .collect()
}

/// Fire every request concurrently. One failing dispatch never stops the others;
/// all failures are reported together once every request has finished.
pub async fn dispatch<P: Platform + ?Sized>(
    platform: &P,
    repo: &Repo,
    requests: &[DispatchRequest],
) -> Result<(), DispatchError> {
    let results = join_all(requests.iter().map(|req| async move {
        let result = platform
            .dispatch_workflow(repo, &req.workflow_file, &req.git_ref)
            .await;
        (req, result)
    }))
    .await;

    let mut failures = Vec::new();
    for (req, result) in results {
        match result {
            Ok(()) => info!("Dispatched {} on {}", req.workflow_file, req.git_ref),
            Err(e) => {
                warn!("dispatching {} failed: {e:#}", req.workflow_file);
                failures.push(DispatchFailure {
                    workflow_file: req.workflow_file.clone(),
                    message: format!("{e:#}"),
                });
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(DispatchError { attempted: requests.len(), failures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Conclusion;
    use crate::platform::fake::{Call, FakePlatform};

    fn repo() -> Repo {
        Repo { owner: "acme".into(), name: "widgets".into() }
    }

    fn job(name: &str, conclusion: Conclusion) -> JobResult {
        JobResult { name: name.to_string(), conclusion: Some(conclusion) }
    }

    fn auto_fix(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_plan_only_failed_jobs_with_entries() {
        let jobs = vec![
            job("build", Conclusion::Failure),
            job("lint", Conclusion::Failure),
            job("test", Conclusion::Success),
        ];
        let config = auto_fix(&[("build", "rebuild.yml"), ("test", "retest.yml")]);

        let requests = plan(&jobs, &config, "refs/heads/main");
        assert_eq!(
            requests,
            vec![DispatchRequest {
                workflow_file: "rebuild.yml".into(),
                git_ref: "refs/heads/main".into(),
            }]
        );
    }

    #[test]
    fn test_plan_empty_config() {
        let jobs = vec![job("build", Conclusion::Failure)];
        assert!(plan(&jobs, &BTreeMap::new(), "refs/heads/main").is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_attempts_all_and_aggregates() {
        let mut platform = FakePlatform::default();
        platform.failing_workflows.insert("broken.yml".into());

        let requests: Vec<DispatchRequest> = ["broken.yml", "fix-lint.yml", "also-broken.yml"]
            .iter()
            .map(|w| DispatchRequest { workflow_file: w.to_string(), git_ref: "refs/heads/x".into() })
            .collect();
        platform.failing_workflows.insert("also-broken.yml".into());

        let err = dispatch(&platform, &repo(), &requests).await.unwrap_err();
        assert_eq!(err.attempted, 3);
        assert_eq!(err.failures.len(), 2);
        assert_eq!(err.failures[0].workflow_file, "broken.yml");
        assert_eq!(err.failures[1].workflow_file, "also-broken.yml");
        assert!(err.to_string().starts_with("2 of 3 auto-fix dispatches failed: broken.yml:"));

        let dispatched = platform
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Dispatch { .. }))
            .count();
        assert_eq!(dispatched, 3);
    }

    #[tokio::test]
    async fn test_dispatch_nothing_to_do() {
        let platform = FakePlatform::default();
        dispatch(&platform, &repo(), &[]).await.unwrap();
        assert!(platform.calls().is_empty());
    }
}
