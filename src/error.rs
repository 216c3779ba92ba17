// ⚠️ Errors - Contract violations and engine construction failures
// Bad owner strings are data, not errors; they end up in invalid_owners

use thiserror::Error;

/// Caller broke the input contract. Raised before any record is processed;
/// bad *data* never produces one of these (it becomes an InvalidEntry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("input must be a JSON object")]
    NotAnObject,

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("property id must not be empty")]
    EmptyPropertyId,
}

/// Engine construction failed (a keyword table produced an unusable pattern)
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}
