use crate::{Error, Result};

/// Reject logical names that could redirect the staging directory.
///
/// The name becomes a directory-name suffix under the temp root; a path
/// separator, `.`, or `:` is exactly what could point directory creation
/// somewhere else or collide with extension and drive-letter syntax.
/// Rejection is strict, never normalizing.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidName(name.to_string()));
    }
    if name
        .chars()
        .any(|c| std::path::is_separator(c) || c == '.' || c == ':')
    {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(())
}
