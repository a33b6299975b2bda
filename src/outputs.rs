//! Talking back to the Actions runner: step outputs and failure annotations.

use anyhow::{bail, Context, Result};
use std::{fs::OpenOptions, io::Write, path::Path};
use tracing::info;

/// Expose `name=value` to later steps via the file named by `GITHUB_OUTPUT`.
pub fn set_output(name: &str, value: &str) -> Result<()> {
    match std::env::var_os("GITHUB_OUTPUT").filter(|p| !p.is_empty()) {
        Some(path) => write_output(Path::new(&path), name, value),
        None => {
            info!("GITHUB_OUTPUT not set; output {name}={value}");
            Ok(())
        }
    }
}

pub fn write_output(path: &Path, name: &str, value: &str) -> Result<()> {
    if name.contains(['=', '\n', '\r']) || value.contains(['\n', '\r']) {
        bail!("output {name} must be a single line");
    }
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening output file {}", path.display()))?;
    writeln!(f, "{name}={value}").with_context(|| format!("writing output {name}"))?;
    Ok(())
}

/// Print an `::error::` workflow command so the runner marks the step failed
/// and shows the message on the run summary.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
