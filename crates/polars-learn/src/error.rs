use std::borrow::Cow;

use polars_error::PolarsError;
use thiserror::Error as ThisError;

pub type ErrString = Cow<'static, str>;

#[derive(Debug, ThisError)]
pub enum LearnError {
    #[error("allocation failure: {0}")]
    AllocationFailure(ErrString),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(ErrString),
    #[error("unsupported type: {0}")]
    UnsupportedType(ErrString),
    /// Raised by the foreign numeric library while it handled a call.
    #[error("foreign runtime failure: {0}")]
    ForeignRuntime(ErrString),
    /// The address is not (or no longer) owned by the registry.
    #[error("unknown handle {0:#x}")]
    UnknownHandle(usize),
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

pub type LearnResult<T> = Result<T, LearnError>;

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for LearnError {
    fn from(value: pyo3::PyErr) -> Self {
        LearnError::ForeignRuntime(value.to_string().into())
    }
}

#[macro_export]
macro_rules! learn_err {
    (UnknownHandle: $handle:expr) => {
        $crate::error::LearnError::UnknownHandle($handle)
    };
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::error::LearnError::$variant(format!($fmt $(, $arg)*).into())
    };
}

#[macro_export]
macro_rules! learn_bail {
    ($($tt:tt)+) => {
        return Err($crate::learn_err!($($tt)+))
    };
}

#[macro_export]
macro_rules! learn_ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond {
            $crate::learn_bail!($($tt)+);
        }
    };
}
