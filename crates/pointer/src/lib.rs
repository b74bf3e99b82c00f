//! JSON Pointer (RFC 6901) addressing into carnac state trees.
//!
//! A path step selects an object key, a sequence index, or a map entry whose
//! key is the step string. Sets are not addressable.
//!
//! # Example
//!
//! ```
//! use carnac_pointer::{format_pointer, path, resolve};
//! use carnac_value::Value;
//! use serde_json::json;
//!
//! let target = path(["foo", "bar"]);
//! assert_eq!(format_pointer(&target), "/foo/bar");
//!
//! let doc = Value::from(json!({"foo": {"bar": 42}}));
//! assert_eq!(resolve(&doc, &target), Ok(&Value::from(42)));
//! ```

use carnac_value::Value;
use thiserror::Error;

pub mod types;
pub use types::{path, Path, PathStep};

pub mod validate;
pub use validate::validate_path;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("INVALID_INDEX: {0}")]
    InvalidIndex(String),
    #[error("PATH_TOO_LONG")]
    PathTooLong,
}

/// Escapes a pointer component: `~` becomes `~0`, `/` becomes `~1`.
///
/// ```
/// use carnac_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Formats path steps as a pointer string.
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Returns `true` for a canonical non-negative decimal index.
///
/// ```
/// use carnac_pointer::is_valid_index;
///
/// assert!(is_valid_index("0"));
/// assert!(is_valid_index("12"));
/// assert!(!is_valid_index("01"));
/// assert!(!is_valid_index("-1"));
/// assert!(!is_valid_index(""));
/// ```
pub fn is_valid_index(index: &str) -> bool {
    let bytes = index.as_bytes();
    if bytes.is_empty() || (bytes.len() > 1 && bytes[0] == b'0') {
        return false;
    }
    bytes.iter().all(|b| b.is_ascii_digit())
}

fn parse_index(step: &str, path: &[String]) -> Result<usize, PointerError> {
    if !is_valid_index(step) {
        return Err(PointerError::InvalidIndex(format_pointer(path)));
    }
    step.parse()
        .map_err(|_| PointerError::InvalidIndex(format_pointer(path)))
}

/// Resolves `path` inside `val`.
///
/// # Errors
///
/// - `InvalidIndex` when a sequence is addressed with a non-index step
/// - `NotFound` when a step is missing or crosses a primitive or set
pub fn resolve<'a>(val: &'a Value, path: &[String]) -> Result<&'a Value, PointerError> {
    let mut current = val;
    for (depth, step) in path.iter().enumerate() {
        let here = &path[..=depth];
        let next = match current {
            Value::Object(obj) => obj.get(step),
            Value::Array(arr) => arr.get(parse_index(step, here)?),
            Value::Map(map) => map.get(&Value::String(step.clone())),
            _ => None,
        };
        current = next.ok_or_else(|| PointerError::NotFound(format_pointer(here)))?;
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(val: &'a mut Value, path: &[String]) -> Result<&'a mut Value, PointerError> {
    let mut current = val;
    for (depth, step) in path.iter().enumerate() {
        let here = &path[..=depth];
        let next = match current {
            Value::Object(obj) => obj.get_mut(step),
            Value::Array(arr) => {
                let idx = parse_index(step, here)?;
                arr.get_mut(idx)
            }
            Value::Map(map) => map.get_mut(&Value::String(step.clone())),
            _ => None,
        };
        current = next.ok_or_else(|| PointerError::NotFound(format_pointer(here)))?;
    }
    Ok(current)
}
