// Fixed names used when talking to GitHub. None of these are secrets.
pub const GITHUB_API_BASE: &str = "https://api.github.com";
pub const USER_AGENT: &str = "ci-annotator";

pub const LABEL_FAILED: &str = "CI: Failed";
pub const LABEL_PASSED: &str = "CI: Passed";

// Probed in this order; the first hit wins.
pub const LOCKFILES: [&str; 4] = ["package-lock.json", "pnpm-lock.yaml", "yarn.lock", "bun.lock"];

// Log filter override, e.g. CI_ANNOTATOR_LOG=ci_annotator=debug
pub const LOG_ENV: &str = "CI_ANNOTATOR_LOG";

pub const OUTPUT_COMMENT_ID: &str = "comment_id";
