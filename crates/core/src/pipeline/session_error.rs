use std::path::PathBuf;

type Cause = Box<dyn std::error::Error>;

/// Failures that end a session. Per-frame detector errors and screenshot
/// errors are recovered inside the loop and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to open source {path}")]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("failed to read frame after {frames} frames")]
    SourceRead {
        frames: usize,
        #[source]
        source: Cause,
    },

    #[error("failed to open output {path}")]
    SinkOpen {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    #[error("failed to write frame {sequence}")]
    SinkWrite {
        sequence: usize,
        #[source]
        source: Cause,
    },

    #[error("failed to finalize output")]
    SinkClose {
        #[source]
        source: Cause,
    },
}
