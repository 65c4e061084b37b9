use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

static PLACEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)no credits or ceus").unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([0-9]+(?:\.[0-9]+)?)\)").unwrap());
static LABEL_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:credits?|cr)[:\s]*([0-9]+(?:\.[0-9]+)?)").unwrap());
static NUMBER_FIRST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(?:credits?|cr)").unwrap());

/// Credit value of a course occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Credits {
    Hours(f64),
    /// "No credits or CEUs" placement course.
    Placement,
    Unknown,
}

impl Credits {
    pub fn hours(&self) -> Option<f64> {
        match self {
            Credits::Hours(h) => Some(*h),
            _ => None,
        }
    }

    pub fn is_placement(&self) -> bool {
        matches!(self, Credits::Placement)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credits::Hours(h) => write!(f, "{}", h),
            Credits::Placement => f.write_str("Placement"),
            Credits::Unknown => f.write_str("?"),
        }
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Credits::Hours(h) => serializer.serialize_f64(*h),
            Credits::Placement => serializer.serialize_str("Placement"),
            Credits::Unknown => serializer.serialize_str("?"),
        }
    }
}

/// A named credit pattern. Rules are tried in slice order; first hit wins.
pub struct CreditRule {
    pub name: &'static str,
    re: &'static LazyLock<Regex>,
}

impl CreditRule {
    /// The number this rule finds in `text`, if any.
    pub fn apply(&self, text: &str) -> Option<f64> {
        let caps = self.re.captures(text)?;
        caps[1].parse::<f64>().ok().filter(|h| h.is_finite() && *h >= 0.0)
    }
}

pub static CREDIT_RULES: &[CreditRule] = &[
    CreditRule { name: "parenthesized", re: &PAREN_RE },
    CreditRule { name: "label_then_number", re: &LABEL_FIRST_RE },
    CreditRule { name: "number_then_label", re: &NUMBER_FIRST_RE },
];

/// Credit value for the code occurrence `code_span` inside `text`.
///
/// The placement phrase is checked on the full text and overrides everything.
/// Numeric rules run on the text with the first copy of `code_span` removed, so
/// the course number is never read back as a credit count.
pub fn extract_credits(text: &str, code_span: &str) -> Credits {
    if PLACEMENT_RE.is_match(text) {
        return Credits::Placement;
    }
    let stripped = if code_span.is_empty() {
        text.to_string()
    } else {
        text.replacen(code_span, "", 1)
    };
    CREDIT_RULES
        .iter()
        .find_map(|rule| rule.apply(&stripped))
        .map(Credits::Hours)
        .unwrap_or(Credits::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_value() {
        assert_eq!(extract_credits("MATH-101 Calculus I (3)", "MATH-101"), Credits::Hours(3.0));
        assert_eq!(extract_credits("BIOL-121 Lab (1.5)", "BIOL-121"), Credits::Hours(1.5));
    }

    #[test]
    fn labeled_values() {
        assert_eq!(extract_credits("ENGL-120 Credits: 3", "ENGL-120"), Credits::Hours(3.0));
        assert_eq!(extract_credits("ENGL-120 cr 4.0", "ENGL-120"), Credits::Hours(4.0));
        assert_eq!(extract_credits("ENGL-120 3 credits", "ENGL-120"), Credits::Hours(3.0));
        assert_eq!(extract_credits("ENGL-120 2.5cr", "ENGL-120"), Credits::Hours(2.5));
    }

    #[test]
    fn rule_priority() {
        // parenthesized wins over the labeled forms
        assert_eq!(extract_credits("HIST-150 4 credits (3)", "HIST-150"), Credits::Hours(3.0));
        assert_eq!(CREDIT_RULES[0].name, "parenthesized");
        assert_eq!(CREDIT_RULES[0].apply("x (2)"), Some(2.0));
        assert_eq!(CREDIT_RULES[1].apply("Credit 6"), Some(6.0));
        assert_eq!(CREDIT_RULES[2].apply("6 cr"), Some(6.0));
        assert_eq!(CREDIT_RULES[2].apply("nothing here"), None);
    }

    #[test]
    fn course_number_is_not_credit() {
        assert_eq!(extract_credits("STAT-201 grade: B", "STAT-201"), Credits::Unknown);
        assert_eq!(extract_credits("STAT-201 credit", "STAT-201"), Credits::Unknown);
    }

    #[test]
    fn only_the_matched_span_is_removed() {
        // second copy of the code number is left alone
        assert_eq!(extract_credits("MATH-101 (101)", "MATH-101"), Credits::Hours(101.0));
    }

    #[test]
    fn placement_beats_numbers() {
        assert_eq!(
            extract_credits("ART-100 no credits or CEUs Completed", "ART-100"),
            Credits::Placement
        );
        assert_eq!(
            extract_credits("MATH-099 (3) No Credits or CEUs", "MATH-099"),
            Credits::Placement
        );
    }

    #[test]
    fn only_ascii_digits() {
        assert_eq!(extract_credits("ARTH-200 (\u{0663})", "ARTH-200"), Credits::Unknown);
    }

    #[test]
    fn unknown_when_nothing_matches() {
        assert_eq!(extract_credits("PHIL-101 Intro", "PHIL-101"), Credits::Unknown);
        assert_eq!(extract_credits("", ""), Credits::Unknown);
    }

    #[test]
    fn serializes_as_number_or_sentinel() {
        assert_eq!(serde_json::to_string(&Credits::Hours(3.0)).unwrap(), "3.0");
        assert_eq!(serde_json::to_string(&Credits::Placement).unwrap(), "\"Placement\"");
        assert_eq!(serde_json::to_string(&Credits::Unknown).unwrap(), "\"?\"");
        assert_eq!(Credits::Hours(3.0).to_string(), "3");
    }
}
