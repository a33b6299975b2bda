use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::{LABEL_FAILED, LABEL_PASSED};
use crate::context::Repo;
use crate::platform::Platform;

/// (label to add, label to remove)
pub fn labels_for(any_failure: bool) -> (&'static str, &'static str) {
    if any_failure {
        (LABEL_FAILED, LABEL_PASSED)
    } else {
        (LABEL_PASSED, LABEL_FAILED)
    }
}

/// Leave exactly one of the two status labels on the issue.
pub async fn reconcile<P: Platform + ?Sized>(
    platform: &P,
    repo: &Repo,
    issue: u64,
    any_failure: bool,
) -> Result<()> {
    let (add, remove) = labels_for(any_failure);

    platform
        .add_labels(repo, issue, &[add])
        .await
        .with_context(|| format!("adding label '{add}' to {repo}#{issue}"))?;

    let removed = platform
        .remove_label(repo, issue, remove)
        .await
        .with_context(|| format!("removing label '{remove}' from {repo}#{issue}"))?;
    if removed {
        debug!("removed label '{remove}'");
    } else {
        debug!("label '{remove}' was not present");
    }

    info!("Labelled {repo}#{issue} '{add}'");
    Ok(())
}
