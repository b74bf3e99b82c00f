use carnac_pointer::PointerError;
use thiserror::Error;

use crate::codec::CodecError;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("no value at {0:?}")]
    TargetNotFound(String),
    #[error("value at {0:?} is not an object")]
    NotAnObject(String),
    #[error("unknown computed property `{0}`")]
    UnknownComputed(String),
    #[error("computed property `{0}` is read-only")]
    ReadOnlyComputed(String),
    #[error("unknown action `{0}`")]
    UnknownAction(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Pointer(#[from] PointerError),
}
