//! Host tool checks run before any step starts.

use std::ffi::OsStr;

use crate::compose::Step;
use crate::error::{Error, Result};
use crate::process;

/// Package that usually provides each tool the steps invoke.
const PACKAGE_HINTS: &[(&str, &str)] = &[
    ("cmake", "cmake"),
    ("make", "make"),
    ("sudo", "sudo"),
    ("tar", "tar"),
];

/// Result of a single tool check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub tool: String,
    pub status: CheckStatus,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Found in PATH.
    Pass,
    /// Missing - the step would fail to spawn.
    Fail,
}

/// Check that every distinct program used by `steps` is in PATH.
pub fn check_tools(steps: &[Step]) -> Vec<CheckResult> {
    let mut tools: Vec<&OsStr> = Vec::new();
    for step in steps {
        let program = step.program();
        if !program.is_empty() && !tools.contains(&program) {
            tools.push(program);
        }
    }

    tools
        .into_iter()
        .map(|program| {
            let tool = program.to_string_lossy().into_owned();
            match process::which(program) {
                Some(path) => CheckResult {
                    tool,
                    status: CheckStatus::Pass,
                    details: path.display().to_string(),
                },
                None => CheckResult {
                    details: format!("Not found. Install '{}' package.", package_for(&tool)),
                    tool,
                    status: CheckStatus::Fail,
                },
            }
        })
        .collect()
}

/// Fail with [`Error::MissingTool`] on the first program not in PATH.
pub fn require_tools(steps: &[Step]) -> Result<()> {
    for check in check_tools(steps) {
        tracing::debug!(tool = %check.tool, status = ?check.status, details = %check.details, "preflight");
        if check.status == CheckStatus::Fail {
            return Err(Error::MissingTool {
                package: package_for(&check.tool).to_string(),
                tool: check.tool,
            });
        }
    }
    Ok(())
}

fn package_for(tool: &str) -> &str {
    PACKAGE_HINTS
        .iter()
        .find(|(name, _)| *name == tool)
        .map(|(_, package)| *package)
        .unwrap_or(tool)
}
