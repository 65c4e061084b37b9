pub mod aggregate;
pub mod codes;
pub mod credits;
pub mod status;
pub mod terms;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use aggregate::{Aggregation, ExtractedRecord};
use terms::NON_TERM;

/// One scraped course bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFragment {
    pub text: String,
    #[serde(default)]
    pub is_non_term: bool,
    #[serde(default)]
    pub term_label: Option<String>,
}

impl RawFragment {
    pub fn new(text: impl Into<String>, is_non_term: bool, term_label: Option<&str>) -> Self {
        RawFragment {
            text: text.into(),
            is_non_term,
            term_label: term_label.map(str::to_string),
        }
    }
}

/// Filter → codes → credits: one record per code occurrence in completed fragments.
pub fn extract_records(fragments: &[RawFragment]) -> Vec<ExtractedRecord> {
    let mut records = Vec::new();

    for fragment in fragments {
        let text = fragment.text.trim();
        if !status::classify(text).completed {
            debug!(text, "skipping fragment without completed status");
            continue;
        }

        let term = if fragment.is_non_term || status::mentions_non_term(text) {
            NON_TERM.to_string()
        } else {
            fragment.term_label.clone().unwrap_or_default()
        };

        let found = codes::extract_codes(text);
        if found.is_empty() {
            debug!(text, "completed fragment has no course code");
        }
        for m in found {
            records.push(ExtractedRecord {
                credits: credits::extract_credits(text, m.span),
                code: m.code,
                term: term.clone(),
            });
        }
    }

    records
}

/// Full pipeline over one snapshot.
pub fn process_snapshot(fragments: &[RawFragment]) -> Aggregation {
    let records = extract_records(fragments);
    let aggregation = aggregate::aggregate(&records);
    info!(
        fragments = fragments.len(),
        records = records.len(),
        courses = aggregation.unique.len(),
        terms = aggregation.groups.len(),
        "extracted course records"
    );
    aggregation
}
