use std::io::ErrorKind;
use std::process::{Command, Output, Stdio};

use crate::error::PipelineError;

/// Run an external tool to completion and turn everything that can go
/// wrong into a distinct [`PipelineError`]. A launch failure that is not
/// "binary missing" is retried once (a transient fork/exec hiccup); a
/// nonzero exit status never is.
pub(crate) fn run_checked(
    tool: &'static str,
    build: impl Fn() -> Command,
) -> Result<(), PipelineError> {
    let status = retry_launch(tool, || build().status())?;
    if status.success() {
        Ok(())
    } else {
        Err(PipelineError::ToolFailed {
            tool,
            code: status.code(),
        })
    }
}

/// Like [`run_checked`] but captures stdout/stderr; the caller checks the
/// status itself when the tool's output matters even on failure.
pub(crate) fn run_captured(
    tool: &'static str,
    build: impl Fn() -> Command,
) -> Result<Output, PipelineError> {
    retry_launch(tool, || {
        build()
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
    })
}

fn retry_launch<T>(
    tool: &'static str,
    mut attempt: impl FnMut() -> std::io::Result<T>,
) -> Result<T, PipelineError> {
    match attempt() {
        Ok(v) => Ok(v),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PipelineError::ToolNotFound { tool }),
        Err(first) => {
            log::warn!("launching {tool} failed ({first}), retrying once");
            attempt().map_err(|source| PipelineError::Launch { tool, source })
        }
    }
}
