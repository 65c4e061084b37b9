use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::status::mentions_non_term;

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").unwrap());

pub const NON_TERM: &str = "Non-term";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    /// Not part of the usual academic cycle; ordered after Fall within its year.
    Winter,
}

impl Season {
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "spring" => Some(Season::Spring),
            "summer" => Some(Season::Summer),
            "fall" => Some(Season::Fall),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Normalized academic term.
///
/// Ordering: `NonTerm` first, then dated terms by year and season, then
/// unparseable labels. `Raw` labels compare equal to each other so a stable
/// sort keeps them in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKey {
    NonTerm,
    Dated { year: u16, season: Season },
    Raw(String),
}

impl TermKey {
    fn rank(&self) -> u8 {
        match self {
            TermKey::NonTerm => 0,
            TermKey::Dated { .. } => 1,
            TermKey::Raw(_) => 2,
        }
    }

    /// Chronological comparison used for sorting term groups.
    pub fn chrono_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (
                TermKey::Dated { year: y1, season: s1 },
                TermKey::Dated { year: y2, season: s2 },
            ) => y1.cmp(y2).then(s1.cmp(s2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    pub fn is_dated(&self) -> bool {
        matches!(self, TermKey::Dated { .. })
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermKey::NonTerm => f.write_str(NON_TERM),
            TermKey::Dated { year, season } => write!(f, "{:04} {}", year, season.as_str()),
            TermKey::Raw(label) => f.write_str(label),
        }
    }
}

impl Serialize for TermKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalize a scraped term label to `"<year> <Season>"`, `"Non-term"`, or the
/// trimmed label itself when no year/season pair can be found.
///
/// Token order doesn't matter ("Fall 2023" and "2023 Fall" agree). When a label
/// repeats itself the first year and first season are used.
pub fn normalize_term(raw: Option<&str>) -> TermKey {
    let label = raw.map(str::trim).unwrap_or("");
    if label.is_empty() || mentions_non_term(label) {
        return TermKey::NonTerm;
    }

    let mut year: Option<u16> = None;
    let mut season: Option<Season> = None;
    for token in label.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        if YEAR_RE.is_match(token) {
            match year {
                None => year = token.parse().ok(),
                Some(y) if token.parse::<u16>().ok() != Some(y) => {
                    debug!(label, kept = y, extra = token, "conflicting year in term label")
                }
                _ => {}
            }
        } else if let Some(s) = Season::parse(token) {
            match season {
                None => season = Some(s),
                Some(kept) if kept != s => {
                    debug!(label, kept = kept.as_str(), extra = token, "conflicting season in term label")
                }
                _ => {}
            }
        }
    }

    match (year, season) {
        (Some(year), Some(season)) => TermKey::Dated { year, season },
        _ => TermKey::Raw(label.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(s: &str) -> String {
        normalize_term(Some(s)).to_string()
    }

    #[test]
    fn season_year_in_either_order() {
        assert_eq!(norm("Fall 2023"), "2023 Fall");
        assert_eq!(norm("2023 Fall"), "2023 Fall");
        assert_eq!(norm("  spring   2024 "), "2024 Spring");
        assert_eq!(norm("SUMMER 2022"), "2022 Summer");
        assert_eq!(norm("Winter 2021"), "2021 Winter");
    }

    #[test]
    fn duplicated_labels_collapse() {
        assert_eq!(norm("Fall 2023 Fall 2023"), "2023 Fall");
        assert_eq!(norm("Fall 2023 Spring 2024"), "2023 Fall");
        assert_eq!(norm("Term: Fall, 2023"), "2023 Fall");
    }

    #[test]
    fn non_term_labels() {
        assert_eq!(normalize_term(None), TermKey::NonTerm);
        assert_eq!(norm(""), "Non-term");
        assert_eq!(norm("   "), "Non-term");
        assert_eq!(norm("Non-term"), "Non-term");
        assert_eq!(norm("non term"), "Non-term");
        assert_eq!(norm("NONTERM"), "Non-term");
        assert_eq!(norm("Non-Term Courses"), "Non-term");
    }

    #[test]
    fn unparseable_label_falls_back_to_raw() {
        assert_eq!(norm("  Transfer Credit "), "Transfer Credit");
        assert_eq!(norm("Fall"), "Fall");
        assert_eq!(norm("2023"), "2023");
        assert!(matches!(normalize_term(Some("Fall")), TermKey::Raw(_)));
        // non-ASCII digits are not a year
        assert!(matches!(
            normalize_term(Some("Fall \u{0662}\u{0660}\u{0662}\u{0663}")),
            TermKey::Raw(_)
        ));
    }

    #[test]
    fn idempotent() {
        for label in [
            "Fall 2023", "2023 Fall", "", "non-term", "Transfer Credit",
            "Fall 2023 Fall 2023", "  Summer   2020", "Winter", "AP Exam 2019",
        ] {
            let once = normalize_term(Some(label));
            let twice = normalize_term(Some(&once.to_string()));
            assert_eq!(once, twice, "label {:?}", label);
        }
    }

    #[test]
    fn chronological_order() {
        let labels = [
            "2023 Fall", "Non-term", "Transfer", "2022 Spring", "2023 Spring", "2023 Winter",
            "2023 Summer",
        ];
        let mut keys: Vec<TermKey> = labels.iter().map(|s| normalize_term(Some(*s))).collect();
        keys.sort_by(|a, b| a.chrono_cmp(b));
        let sorted: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            sorted,
            vec!["Non-term", "2022 Spring", "2023 Spring", "2023 Summer", "2023 Fall", "2023 Winter", "Transfer"]
        );
    }
}
