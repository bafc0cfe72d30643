use crate::controls::Param;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ControlError {
    #[error("{param} must be within {min}..={max}, got {value}")]
    OutOfRange {
        param: Param,
        value: i64,
        min: u8,
        max: u8,
    },
}
