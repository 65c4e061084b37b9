use std::sync::LazyLock;

use regex::Regex;

static EXCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)planned|in progress|future|not taken|not started|enrolled|register").unwrap()
});
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)completed|taken|credit(?: earned)?|grade:?|\b[a-df][+-]?\b|\bp\b|\bs\b").unwrap()
});
static NON_TERM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)non[- ]?term").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub completed: bool,
}

/// Decide whether a bubble's text describes a finished course.
///
/// Exclusion markers ("planned", "in progress", ...) always win over inclusion
/// markers. Text with no marker at all is treated as not completed.
pub fn classify(text: &str) -> Status {
    if EXCLUDE_RE.is_match(text) {
        return Status { completed: false };
    }
    Status {
        completed: INCLUDE_RE.is_match(text),
    }
}

/// True when the text itself carries a non-term marker ("Non-term", "non term").
pub fn mentions_non_term(text: &str) -> bool {
    NON_TERM_RE.is_match(text)
}
