use serde::Deserialize;

/// Terminal status of a workflow job as reported by the Actions API.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobResult {
    pub name: String,
    // null while the job is still running (the annotator's own job, typically)
    #[serde(default)]
    pub conclusion: Option<Conclusion>,
}

impl JobResult {
    pub fn failed(&self) -> bool {
        self.conclusion == Some(Conclusion::Failure)
    }
}

#[derive(Debug, Deserialize)]
pub struct JobsPage {
    pub jobs: Vec<JobResult>,
}

#[derive(Debug, Deserialize)]
pub struct CreatedComment {
    pub id: u64,
}
