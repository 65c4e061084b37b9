use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([a-z]{2,4})(\s*-\s*)?([0-9]{3,4})\b").unwrap());

/// Letter runs that look like a department when glued to a year ("Fall2023").
/// Only rejected when no hyphen separates them from the digits. A space alone
/// never joins letters and digits into a code.
const NOT_DEPARTMENTS: &[&str] = &["FALL", "TERM", "YEAR", "CAT", "SEM"];

/// Canonical `DEPT-NUMBER` course identifier. The number keeps its scraped
/// width; `padded()` is the display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseCode(String);

impl CourseCode {
    pub fn new(dept: &str, number: &str) -> Self {
        CourseCode(format!("{}-{}", dept.to_uppercase(), number))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn dept(&self) -> &str {
        self.0.split_once('-').map(|(d, _)| d).unwrap_or(&self.0)
    }

    pub fn number(&self) -> &str {
        self.0.split_once('-').map(|(_, n)| n).unwrap_or("")
    }

    /// `MATH-101` → `MATH-0101`
    pub fn padded(&self) -> String {
        format!("{}-{:0>4}", self.dept(), self.number())
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CourseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeMatch<'a> {
    pub code: CourseCode,
    /// Exact substring that matched, used to blank the code out before credit parsing.
    pub span: &'a str,
}

/// All course codes in `text`, in order. Repeats are reported each time.
pub fn extract_codes(text: &str) -> Vec<CodeMatch<'_>> {
    CODE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let dept = &caps[1];
            let hyphenated = caps.get(2).is_some();
            if !hyphenated && NOT_DEPARTMENTS.contains(&dept.to_uppercase().as_str()) {
                debug!(span = whole.as_str(), "skipping non-course token");
                return None;
            }
            Some(CodeMatch {
                code: CourseCode::new(dept, &caps[3]),
                span: whole.as_str(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(text: &str) -> Vec<String> {
        extract_codes(text).into_iter().map(|m| m.code.to_string()).collect()
    }

    #[test]
    fn single_code() {
        let found = extract_codes("CHEM-110 General Chemistry I (4)");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code.as_str(), "CHEM-110");
        assert_eq!(found[0].span, "CHEM-110");
    }

    #[test]
    fn separators_and_case() {
        assert_eq!(codes("math - 101"), vec!["MATH-101"]);
        assert_eq!(codes("Engl - 1200 Composition"), vec!["ENGL-1200"]);
        assert_eq!(codes("cs101"), vec!["CS-101"]);
    }

    #[test]
    fn multiple_and_repeated_codes() {
        assert_eq!(
            codes("MATH-101 or MATH-102; MATH-101 again"),
            vec!["MATH-101", "MATH-102", "MATH-101"]
        );
    }

    #[test]
    fn word_boundaries() {
        assert!(codes("ABCDE-101").is_empty());
        assert!(codes("MATH-10123").is_empty());
        assert!(codes("MATH-10").is_empty());
    }

    #[test]
    fn years_are_not_codes() {
        assert!(codes("Fall 2023").is_empty());
        assert!(codes("Term 2024 Year 2025").is_empty());
        assert!(codes("Fall2023").is_empty());
        // a hyphen makes the intent explicit
        assert_eq!(codes("TERM-1010"), vec!["TERM-1010"]);
    }

    #[test]
    fn prose_before_a_year_is_not_a_code() {
        assert_eq!(codes("MATH-101 Calculus I Completed in 2023 (3)"), vec!["MATH-101"]);
        assert_eq!(codes("ENGL-120 Grade: A taken May 2023"), vec!["ENGL-120"]);
        assert_eq!(codes("Dec 2022"), Vec::<String>::new());
        // spaced codes need the hyphen
        assert!(codes("HIST 150 World History").is_empty());
    }

    #[test]
    fn only_ascii_digits() {
        assert!(codes("MATH-\u{0661}\u{0660}\u{0661}").is_empty());
        assert!(codes("MATH-\u{ff11}\u{ff10}\u{ff11}").is_empty());
    }

    #[test]
    fn padding_is_display_only() {
        let code = CourseCode::new("math", "101");
        assert_eq!(code.as_str(), "MATH-101");
        assert_eq!(code.padded(), "MATH-0101");
        assert_eq!(CourseCode::new("THEO", "1100").padded(), "THEO-1100");
        assert_eq!(code.dept(), "MATH");
        assert_eq!(code.number(), "101");
    }
}
