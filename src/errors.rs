use thiserror::Error;

/// Errors surfaced by the evaluator.
///
/// Evaluation itself is total: an expression that no resolution rule
/// understands, or one nested too deeply, is an error only in debug mode.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cannot parse expression: {0}")]
    Parse(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvalError>;
