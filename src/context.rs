//! The workflow run this invocation belongs to, read once from the runner's
//! environment and then passed around explicitly.

use anyhow::{anyhow, bail, Context, Result};
use std::{fmt, fs, str::FromStr};

use crate::config::GITHUB_API_BASE;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub owner: String,
    pub name: String,
}

impl FromStr for Repo {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(Repo { owner: owner.to_string(), name: name.to_string() })
            }
            _ => bail!("expected repository as 'owner/repo', got '{s}'"),
        }
    }
}

impl fmt::Display for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct RunContext {
    pub actor: String,
    pub repo: Repo,
    pub git_ref: String,
    pub run_id: u64,
    /// Issue or pull request the triggering event refers to, if any.
    pub issue_number: Option<u64>,
    pub api_url: String,
}

impl RunContext {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} is not set; is this running inside a workflow?"))
        };

        let repo: Repo = require("GITHUB_REPOSITORY")?.parse()?;
        let run_id = require("GITHUB_RUN_ID")?;
        let run_id = run_id
            .trim()
            .parse::<u64>()
            .with_context(|| format!("GITHUB_RUN_ID is not a number: '{run_id}'"))?;

        let issue_number = match lookup("GITHUB_EVENT_PATH").filter(|p| !p.is_empty()) {
            Some(path) => {
                let raw = fs::read_to_string(&path)
                    .with_context(|| format!("reading event payload at {path}"))?;
                let payload: serde_json::Value = serde_json::from_str(&raw)
                    .with_context(|| format!("decoding event payload at {path}"))?;
                issue_number_from_event(&payload)
            }
            None => None,
        };

        Ok(RunContext {
            actor: require("GITHUB_ACTOR")?,
            repo,
            git_ref: require("GITHUB_REF")?,
            run_id,
            issue_number,
            api_url: lookup("GITHUB_API_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| GITHUB_API_BASE.to_string()),
        })
    }

    pub fn issue_number(&self) -> Result<u64> {
        self.issue_number
            .ok_or_else(|| anyhow!("the triggering event has no issue or pull request to annotate"))
    }
}

// Same precedence the runner toolkit uses: issue, then pull_request, then top-level number.
pub fn issue_number_from_event(payload: &serde_json::Value) -> Option<u64> {
    payload
        .pointer("/issue/number")
        .or_else(|| payload.pointer("/pull_request/number"))
        .or_else(|| payload.get("number"))
        .and_then(|n| n.as_u64())
}
