use anyhow::{Context, Result};
use std::collections::BTreeMap;
use tracing::info;

use crate::context::RunContext;
use crate::models::JobResult;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentDraft {
    pub body: String,
    /// True when at least one job failed.
    pub should_publish: bool,
}

/// Build the comment listing failed jobs, in the order the platform returned them.
///
/// The body is built even when nothing failed; callers look at `should_publish`.
pub fn compose(
    actor: &str,
    fixes: &BTreeMap<String, String>,
    jobs: &[JobResult],
    run_script: &str,
) -> CommentDraft {
    let mut body = format!("Hello @{actor} and thank you for the pull request,\n\n");
    body.push_str("The following jobs failed and must be fixed:\n\n");

    let mut should_publish = false;
    for job in jobs.iter().filter(|j| j.failed()) {
        should_publish = true;
        body.push_str(&format!("- [ ] {}", job.name));
        if let Some(fix) = fixes.get(&job.name).filter(|f| !f.is_empty()) {
            body.push_str(&format!(
                ". This check can be fixed by running <code>{run_script} {fix}</code>"
            ));
        }
        body.push('\n');
    }

    CommentDraft { body, should_publish }
}

/// Create a new comment when the draft asks for it and return its id.
pub async fn publish<P: Platform + ?Sized>(
    platform: &P,
    ctx: &RunContext,
    draft: &CommentDraft,
) -> Result<Option<u64>> {
    if !draft.should_publish {
        info!("No jobs failed, skipping comment");
        return Ok(None);
    }

    let issue = ctx.issue_number()?;
    let id = platform
        .create_comment(&ctx.repo, issue, &draft.body)
        .await
        .with_context(|| format!("creating comment on {}#{issue}", ctx.repo))?;
    info!("Created comment {id} on {}#{issue}", ctx.repo);
    Ok(Some(id))
}
