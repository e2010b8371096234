//! `path` query parameter extraction and the optional strict policy.
//!
//! By default the parameter is appended to the storage base URL verbatim, so a
//! caller can reach anything below the storage host's base path and, through
//! `..` segments, above it. Strict mode closes that off.

use thiserror::Error;
use url::form_urlencoded;

/// Name of the query parameter holding the object path.
pub const PATH_PARAM: &str = "path";

/// Why strict validation refused a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathRejection {
    #[error("must be relative")]
    Absolute,
    #[error("'..' segments are not allowed")]
    ParentSegment,
    #[error("'.' and empty segments are not allowed")]
    EmptySegment,
    #[error("backslashes are not allowed")]
    Backslash,
    #[error("query and fragment delimiters are not allowed")]
    Delimiter,
    #[error("control characters are not allowed")]
    ControlCharacter,
}

/// Read `path` from a raw query string.
///
/// Decoding follows `application/x-www-form-urlencoded` and the first
/// occurrence wins. An empty value counts as missing.
pub fn path_param(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == PATH_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Last `/`-separated segment, used as the download filename.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Reject paths that could address anything outside the storage namespace.
pub fn check_strict(path: &str) -> Result<(), PathRejection> {
    if path.starts_with('/') {
        return Err(PathRejection::Absolute);
    }
    if path.chars().any(|c| c.is_ascii_control()) {
        return Err(PathRejection::ControlCharacter);
    }
    if path.contains('\\') {
        return Err(PathRejection::Backslash);
    }
    if path.contains(&['?', '#'][..]) {
        return Err(PathRejection::Delimiter);
    }
    for segment in path.split('/') {
        match segment {
            ".." => return Err(PathRejection::ParentSegment),
            "" | "." => return Err(PathRejection::EmptySegment),
            _ => {}
        }
    }
    Ok(())
}
