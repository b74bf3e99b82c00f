//! Depth limit for state tree paths.

use crate::PointerError;

/// Deepest path a store will resolve.
const MAX_PATH_DEPTH: usize = 256;

/// Rejects paths deeper than the store resolves.
pub fn validate_path(path: &[String]) -> Result<(), PointerError> {
    if path.len() > MAX_PATH_DEPTH {
        return Err(PointerError::PathTooLong);
    }
    Ok(())
}
