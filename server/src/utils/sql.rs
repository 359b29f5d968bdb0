//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input.
///
/// Pair with `ESCAPE '\'` in the query.
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a `%term%` substring pattern from user input
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like_pattern(term))
}
