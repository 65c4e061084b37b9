use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::codes::CourseCode;
use super::credits::Credits;
use super::terms::{normalize_term, TermKey};

/// One code occurrence pulled out of a completed fragment. `term` is the label
/// as scraped; it is normalized during aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedRecord {
    pub code: CourseCode,
    pub credits: Credits,
    pub term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseEntry {
    pub code: CourseCode,
    pub credits: Credits,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermGroup {
    pub term: TermKey,
    pub courses: Vec<CourseEntry>,
}

impl TermGroup {
    /// Sum of numeric credits; sentinels count as zero.
    pub fn total_credits(&self) -> f64 {
        self.courses.iter().filter_map(|c| c.credits.hours()).sum()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    /// Term groups in chronological order.
    pub groups: Vec<TermGroup>,
    /// Every code once, first occurrence in extraction order.
    pub unique: Vec<CourseEntry>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.unique.is_empty()
    }

    /// The term order actually used for `groups`, as display strings.
    pub fn term_order(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.term.to_string()).collect()
    }

    pub fn all_codes(&self) -> Vec<&CourseCode> {
        self.unique.iter().map(|c| &c.code).collect()
    }

    /// Courses marked "no credits or CEUs".
    pub fn placement_codes(&self) -> Vec<&CourseCode> {
        self.unique
            .iter()
            .filter(|c| c.credits.is_placement())
            .map(|c| &c.code)
            .collect()
    }

    /// Courses with a known credit count. `?` courses appear in neither list.
    pub fn for_credit_codes(&self) -> Vec<&CourseCode> {
        self.unique
            .iter()
            .filter(|c| c.credits.hours().is_some())
            .map(|c| &c.code)
            .collect()
    }

    /// Grouped records flattened back out, with normalized terms.
    pub fn records(&self) -> Vec<ExtractedRecord> {
        self.groups
            .iter()
            .flat_map(|g| {
                g.courses.iter().map(|c| ExtractedRecord {
                    code: c.code.clone(),
                    credits: c.credits,
                    term: g.term.to_string(),
                })
            })
            .collect()
    }

    /// Presentation form for the debug surface: zero-padded codes plus the term order.
    pub fn debug_view(&self) -> DebugView {
        DebugView {
            term_order: self.term_order(),
            terms: self
                .groups
                .iter()
                .map(|g| DebugTerm {
                    term: g.term.to_string(),
                    courses: g
                        .courses
                        .iter()
                        .map(|c| DebugCourse {
                            code: c.code.padded(),
                            credits: c.credits,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugView {
    pub term_order: Vec<String>,
    pub terms: Vec<DebugTerm>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugTerm {
    pub term: String,
    pub courses: Vec<DebugCourse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugCourse {
    pub code: String,
    pub credits: Credits,
}

struct GroupBuilder {
    term: TermKey,
    courses: Vec<CourseEntry>,
    slots: HashMap<CourseCode, usize>,
}

/// Deduplicate, group by normalized term and sort chronologically.
///
/// Within a term a repeated code keeps its first position but takes the
/// credits of its last occurrence.
pub fn aggregate(records: &[ExtractedRecord]) -> Aggregation {
    let mut builders: Vec<GroupBuilder> = Vec::new();
    let mut by_term: HashMap<TermKey, usize> = HashMap::new();
    let mut unique = Vec::new();
    let mut seen: HashSet<&CourseCode> = HashSet::new();

    for record in records {
        let term = normalize_term(Some(&record.term));
        let idx = *by_term.entry(term.clone()).or_insert_with(|| {
            builders.push(GroupBuilder {
                term,
                courses: Vec::new(),
                slots: HashMap::new(),
            });
            builders.len() - 1
        });

        let group = &mut builders[idx];
        let entry = CourseEntry {
            code: record.code.clone(),
            credits: record.credits,
        };
        match group.slots.get(&record.code) {
            Some(&slot) => {
                debug!(code = %record.code, term = %group.term, "duplicate course in term");
                group.courses[slot] = entry;
            }
            None => {
                group.slots.insert(record.code.clone(), group.courses.len());
                group.courses.push(entry);
            }
        }

        if seen.insert(&record.code) {
            unique.push(CourseEntry {
                code: record.code.clone(),
                credits: record.credits,
            });
        }
    }

    let mut groups: Vec<TermGroup> = builders
        .into_iter()
        .map(|b| TermGroup {
            term: b.term,
            courses: b.courses,
        })
        .collect();
    groups.sort_by(|a, b| a.term.chrono_cmp(&b.term));

    Aggregation { groups, unique }
}
