//! Type definitions for state tree paths.

/// A step in a path: an object key, a sequence index in decimal, or a
/// string map key.
pub type PathStep = String;

/// A path from the root of a state tree. The empty path is the root.
pub type Path = Vec<PathStep>;

/// Builds a [`Path`] from anything string-like.
///
/// # Example
///
/// ```
/// use carnac_pointer::path;
///
/// assert_eq!(path(["foo", "0"]), vec!["foo".to_string(), "0".to_string()]);
/// assert!(path(Vec::<String>::new()).is_empty());
/// ```
pub fn path<I, S>(steps: I) -> Path
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    steps.into_iter().map(Into::into).collect()
}
