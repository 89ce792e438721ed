//! Class name normalization
//!
//! Instrumentation sees class names in their internal form (`org/foo/Bar`),
//! sometimes with a `.class` suffix when they come from a file path. Ids always
//! carry the dotted, fully qualified form so that the same class produces the
//! same objective regardless of where its name was read from.

use crate::result::{SensorError, SensorResult};
use std::borrow::Cow;

const CLASS_FILE_SUFFIX: &str = ".class";

/// Normalize a class name to its dotted fully qualified form
///
/// Borrows when the input is already normalized, which is the common case
/// on the hot path.
pub fn normalize_class_name(name: &str) -> SensorResult<Cow<'_, str>> {
    let trimmed = name.strip_suffix(CLASS_FILE_SUFFIX).unwrap_or(name);
    if trimmed.is_empty() {
        return Err(SensorError::invalid("Empty class name"));
    }

    if trimmed.contains('/') {
        Ok(Cow::Owned(trimmed.replace('/', ".")))
    } else {
        Ok(Cow::Borrowed(trimmed))
    }
}
