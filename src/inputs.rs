use std::collections::BTreeMap;
use thiserror::Error;

use crate::package_manager::PackageManager;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("No GITHUB_TOKEN found in environment")]
    MissingToken,

    #[error("Error parsing {input} ({raw}) as JSON")]
    MalformedJson {
        input: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Inputs as handed over by the runner, before any validation.
#[derive(Debug, Default, Clone)]
pub struct RawInputs {
    pub fixes: Option<String>,
    pub package_manager: Option<String>,
    pub auto_fix: Option<String>,
    pub token: Option<String>,
}

#[derive(Clone)]
pub struct RunConfiguration {
    /// job name -> package.json script that fixes it
    pub fixes: BTreeMap<String, String>,
    /// `None` means "detect from lockfiles"
    pub package_manager: Option<PackageManager>,
    /// job name -> workflow file to dispatch when it fails
    pub auto_fix: BTreeMap<String, String>,
    pub token: String,
}

impl std::fmt::Debug for RunConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfiguration")
            .field("fixes", &self.fixes)
            .field("package_manager", &self.package_manager)
            .field("auto_fix", &self.auto_fix)
            .field("token", &"***")
            .finish()
    }
}

impl RunConfiguration {
    /// Validate raw inputs. Nothing here touches the network, so a failure
    /// means the run stops before any side effect.
    pub fn resolve(raw: RawInputs) -> Result<Self, InputError> {
        let fixes = decode_map("FIXES", raw.fixes.as_deref())?;

        let token = non_empty(raw.token.as_deref()).ok_or(InputError::MissingToken)?;

        let auto_fix = decode_map("AUTO_FIX", raw.auto_fix.as_deref())?;

        let package_manager = non_empty(raw.package_manager.as_deref()).map(PackageManager::from);

        Ok(RunConfiguration {
            fixes,
            package_manager,
            auto_fix,
            token: token.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn decode_map(input: &'static str, raw: Option<&str>) -> Result<BTreeMap<String, String>, InputError> {
    let raw = non_empty(raw).unwrap_or("{}");
    serde_json::from_str(raw).map_err(|source| InputError::MalformedJson {
        input,
        raw: raw.to_string(),
        source,
    })
}
