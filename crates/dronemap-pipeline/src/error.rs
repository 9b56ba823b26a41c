use dronemap_gps::export::ExportError;
use dronemap_gps::metadata::MetadataError;

/// Error types for the pipeline crate.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A required external tool is not on PATH
    #[error("{tool} not found, install it and make it available in PATH")]
    ToolNotFound {
        /// Tool binary name
        tool: &'static str,
    },

    /// Spawning the tool failed twice (one retry on launch)
    #[error("failed to launch {tool}: {source}")]
    Launch {
        /// Tool binary name
        tool: &'static str,
        /// The spawn error
        source: std::io::Error,
    },

    /// The tool ran but exited with a failure status
    #[error("{tool} exited with {}", display_code(.code))]
    ToolFailed {
        /// Tool binary name
        tool: &'static str,
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
    },

    /// A pipeline stage ran before the stage it depends on
    #[error("missing input for this stage: {0}")]
    MissingInput(String),

    /// The requested operation has no implementation for this backend
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Filesystem error around an artifact
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Metadata document error from the core crate
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Export error from the core crate
    #[error(transparent)]
    Export(#[from] ExportError),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
