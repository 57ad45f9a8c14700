use rayon::ThreadPoolBuildError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use std::result::Result as StdResult;
use thiserror::Error;

/// Classified failure of one oplog translation.
///
/// Every variant is terminal, translating the same input again fails the same way.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// input is not valid json.
    #[error("Oplog is not valid json: {0}")]
    Parse(#[from] JsonError),
    /// a required oplog field is missing or has the wrong container type.
    #[error("Invalid oplog schema on field {field:?}: {reason}")]
    Schema {
        /// oplog field name.
        field: String,
        /// what is wrong with it.
        reason: String,
    },
    /// `op` is present but it's not an insert.
    #[error("Only insert operations (op: \"i\") are supported, get op {op:?}")]
    UnsupportedOperation {
        /// the operation found in oplog.
        op: String,
    },
    /// `ns` can't be split into database and collection.
    #[error("Invalid namespace {ns:?}, expect `<database>.<collection>`")]
    NamespaceFormat {
        /// raw namespace.
        ns: String,
    },
    /// a document field holds a value which has no sql literal.
    #[error("Unsupported value type {kind} for field {field:?}")]
    UnsupportedFieldType {
        /// document field name.
        field: String,
        /// type of the field value.
        kind: String,
    },
}

impl TranslateError {
    pub(crate) fn schema(field: &str, reason: &str) -> Self {
        TranslateError::Schema {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a [Runner](crate::Runner) pass over an oplog stream.
#[derive(Error, Debug)]
pub enum RunError {
    /// reading oplog or writing sql failed.
    #[error("Oplog stream io error")]
    Io(#[from] IoError),
    /// translate worker pool can't be created.
    #[error("Create translate worker pool failed")]
    Pool(#[from] ThreadPoolBuildError),
    /// translation failed, only returned in fail fast mode.
    #[error("Translate oplog at line {line} failed: {source}")]
    Translate {
        /// line number in input, starts from 1.
        line: usize,
        /// detailed error.
        source: TranslateError,
    },
}

/// Oplog translation result.
pub type Result<T> = StdResult<T, TranslateError>;
