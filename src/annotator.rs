//! One annotation pass over the current workflow run.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::autofix::{self, DispatchError, DispatchRequest};
use crate::comment;
use crate::config::OUTPUT_COMMENT_ID;
use crate::context::RunContext;
use crate::inputs::{RawInputs, RunConfiguration};
use crate::labels;
use crate::models::JobResult;
use crate::package_manager::{self, PackageManager};
use crate::platform::Platform;

#[derive(Debug, Clone)]
pub struct Annotation {
    pub package_manager: PackageManager,
    pub jobs: Vec<JobResult>,
    /// Set only when a comment was created.
    pub comment_id: Option<u64>,
    pub any_failure: bool,
}

/// Detect the package manager, fetch jobs, comment on failures and set the
/// status label. Any platform error aborts the pass.
pub async fn annotate<P: Platform + ?Sized>(
    platform: &P,
    ctx: &RunContext,
    config: &RunConfiguration,
) -> Result<Annotation> {
    let package_manager = match &config.package_manager {
        Some(pm) => pm.clone(),
        None => package_manager::detect(platform, &ctx.repo).await,
    };

    let jobs = platform
        .list_jobs(&ctx.repo, ctx.run_id)
        .await
        .with_context(|| format!("listing jobs for run {} of {}", ctx.run_id, ctx.repo))?;
    info!("Fetched {} jobs for run {}", jobs.len(), ctx.run_id);

    let draft = comment::compose(&ctx.actor, &config.fixes, &jobs, package_manager.run_script());
    let comment_id = comment::publish(platform, ctx, &draft).await?;

    match ctx.issue_number {
        Some(issue) => {
            labels::reconcile(platform, &ctx.repo, issue, draft.should_publish).await?;
        }
        // A failure without an issue already errored in publish.
        None => warn!("No issue or pull request for this event, leaving labels alone"),
    }

    Ok(Annotation {
        package_manager,
        jobs,
        comment_id,
        any_failure: draft.should_publish,
    })
}

/// Resolve inputs, annotate, emit `comment_id` and dispatch auto-fixes.
///
/// Inputs are validated before the first platform call, so a bad `FIXES`
/// or a missing token leaves the repository untouched.
pub async fn run<P: Platform + ?Sized>(
    platform: &P,
    raw: RawInputs,
    ctx: &RunContext,
    mut set_output: impl FnMut(&str, &str) -> Result<()>,
) -> Result<Annotation> {
    let config = RunConfiguration::resolve(raw)?;

    let annotation = annotate(platform, ctx, &config).await?;
    if let Some(id) = annotation.comment_id {
        set_output(OUTPUT_COMMENT_ID, &id.to_string())?;
    }

    let dispatched = auto_fix(platform, ctx, &config, &annotation).await?;
    info!("Done: {} auto-fix workflow(s) dispatched", dispatched.len());
    Ok(annotation)
}

/// Dispatch the configured auto-fix workflows for the jobs that failed.
pub async fn auto_fix<P: Platform + ?Sized>(
    platform: &P,
    ctx: &RunContext,
    config: &RunConfiguration,
    annotation: &Annotation,
) -> Result<Vec<DispatchRequest>, DispatchError> {
    let requests = autofix::plan(&annotation.jobs, &config.auto_fix, &ctx.git_ref);
    autofix::dispatch(platform, &ctx.repo, &requests).await?;
    Ok(requests)
}
