use std::io;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("at most one input can be read from stdin")]
    ManyInputsFromStdin,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    MathObj(#[from] mathobj::Error),

    #[error(transparent)]
    StaleSession(#[from] mathobj::StaleSessionAccess),
}
