use futures_util::future::join_all;
use std::{convert::Infallible, fmt, str::FromStr};
use tracing::{debug, info, warn};

use crate::config::LOCKFILES;
use crate::context::Repo;
use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PackageManager {
    #[default]
    Npm,
    Pnpm,
    Yarn,
    Bun,
    /// Any other tool named explicitly; used verbatim as the script prefix.
    Other(String),
}

impl PackageManager {
    pub fn as_str(&self) -> &str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
            PackageManager::Other(name) => name,
        }
    }

    pub fn from_lockfile(name: &str) -> Option<Self> {
        match name {
            "package-lock.json" => Some(PackageManager::Npm),
            "pnpm-lock.yaml" => Some(PackageManager::Pnpm),
            "yarn.lock" => Some(PackageManager::Yarn),
            "bun.lock" => Some(PackageManager::Bun),
            _ => None,
        }
    }

    /// Prefix for running a package.json script. Only npm needs `run`.
    pub fn run_script(&self) -> &str {
        match self {
            PackageManager::Npm => "npm run",
            other => other.as_str(),
        }
    }
}

impl From<&str> for PackageManager {
    fn from(s: &str) -> Self {
        match s {
            "npm" => PackageManager::Npm,
            "pnpm" => PackageManager::Pnpm,
            "yarn" => PackageManager::Yarn,
            "bun" => PackageManager::Bun,
            other => PackageManager::Other(other.to_string()),
        }
    }
}

impl FromStr for PackageManager {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe the repository root for known lockfiles.
///
/// All probes are sent at once, but the winner is the first lockfile in
/// `LOCKFILES` order that exists, whatever order the responses arrive in.
/// Probe errors count as "not found".
pub async fn detect<P: Platform + ?Sized>(platform: &P, repo: &Repo) -> PackageManager {
    let results = join_all(LOCKFILES.iter().map(|path| platform.file_exists(repo, path))).await;
    pick(LOCKFILES.iter().copied().zip(results))
}

fn pick<'a>(results: impl Iterator<Item = (&'a str, anyhow::Result<bool>)>) -> PackageManager {
    for (lockfile, result) in results {
        match result {
            Ok(true) => {
                if let Some(pm) = PackageManager::from_lockfile(lockfile) {
                    info!("Detected package manager: {pm} (found {lockfile})");
                    return pm;
                }
            }
            Ok(false) => debug!("{lockfile} not found"),
            Err(e) => warn!("probing {lockfile} failed, treating as absent: {e:#}"),
        }
    }
    let fallback = PackageManager::default();
    info!("No lockfile found, defaulting to {fallback}");
    fallback
}
