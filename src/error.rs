use std::{io, process::ExitStatus};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("probe process has no stdout pipe")]
    MissingStdout,

    #[error("terminal error")]
    Terminal(#[from] io::Error),

    #[error("no data to render")]
    EmptyHistory,

    #[error("failed to wait for probe process")]
    Wait(#[source] io::Error),

    #[error("probe process exited with {0}")]
    ProbeFailed(ExitStatus),
}
