//! Descriptor codecs.
//!
//! - `json`: mutators and patches as plain JSON descriptors, e.g.
//!   `{"arr": {"push": [1, 2]}}` or `{"arr": [{"push": [1]}, {"pop": []}]}`.

pub mod json;

use thiserror::Error;

pub use json::{decode_mutator, decode_object_mutator, decode_patch, encode_mutator, encode_patch};

/// Errors for malformed descriptors.
///
/// Only the descriptor's shape is checked here. Descriptors that are well
/// formed but do not fit their target are reported at apply time.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("arguments of `{op}` must be an array")]
    InvalidArgs { op: &'static str },
    #[error("`{op}` is missing its `{arg}` argument")]
    MissingArgument { op: &'static str, arg: &'static str },
    #[error("`{op}` expects a number, got {value}")]
    InvalidNumber { op: &'static str, value: String },
    #[error("expected an object, got {0}")]
    NotAnObject(String),
}
