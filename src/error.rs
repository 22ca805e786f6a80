use thiserror::Error;

/// A control identifier with no live control behind it.
///
/// Only the array row loops treat this as a signal (end of rows); anywhere
/// else it is fatal for the pass that hit it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no control registered under identifier `{0}`")]
pub struct LookupError(pub String);

#[derive(Error, Debug)]
pub enum FormError {
    #[error("schema error at `{path}`: {reason}")]
    Schema { path: String, reason: String },

    #[error("not implemented: {0}")]
    Unimplemented(&'static str),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("identifier `{identifier}` conflicts with parsed data: {reason}")]
    Conflict { identifier: String, reason: String },

    #[error("{0}")]
    Decode(String),
}

impl FormError {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Schema { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
