//! DOT format utilities for graph visualization.
//!
//! This module provides utilities for generating DOT format output,
//! which can be rendered using Graphviz tools.

/// Escapes a string for use inside a quoted DOT identifier or label.
///
/// Quotes and backslashes are escaped. Line breaks become `\l`, the left-justified
/// line break, so multi-line block bodies render as aligned listings.
///
/// # Examples
///
/// ```rust,ignore
/// use irflow::utils::escape_dot;
///
/// assert_eq!(escape_dot("x: int = id y;\nret x;"), "x: int = id y;\\lret x;");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "")
        .replace('\n', "\\l")
}
