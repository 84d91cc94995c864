use thiserror::Error;

use crate::env::ObservationMode;

/// Failures while parsing a level description.
///
/// Level loading is a one-shot precondition for an episode: every variant is
/// fatal and there is no partial recovery.
#[derive(Error, Debug)]
pub enum LevelError {
    #[error("expected field `{expected}`, found `{found}`")]
    FieldMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("level truncated while reading `{0}`")]
    Truncated(&'static str),
    #[error("field `{field}` expects {expected} values, found {found}")]
    FieldArity {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("bad number in field `{field}`: `{value}`")]
    BadNumber {
        field: &'static str,
        value: String,
    },
    #[error("bad flag in field `{field}`: `{value}` (expected `true` or `false`)")]
    BadFlag {
        field: &'static str,
        value: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Top-level simulation error.
#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("observation mode {0:?} requires a frame renderer")]
    MissingRenderer(ObservationMode),
}
