//! Fragment providers: turn a saved degree-plan page into `RawFragment`s.
//!
//! Two shapes are accepted:
//! - JSON, either fragment objects or the JSON-encoded strings the browser
//!   content script returns;
//! - the degree-plan HTML itself, walked the same way the content script does.

use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::parser::RawFragment;

const BUBBLE_TEXT_SELECTOR: &str = ".dp-coursebubble-indentedtext";
const TERM_TITLE_SELECTOR: &str = ".dp-term-title";
const BUBBLE_CLASS: &str = "dp-coursebubble";
const NON_TERM_CLASS: &str = "dp-nontermcourses";
const TERM_CLASS: &str = "dp-term";

/// Load a snapshot file, as HTML when asked or when the extension says so.
pub fn load(path: &Path, force_html: bool) -> Result<Vec<RawFragment>> {
    let body = std::fs::read_to_string(path)?;
    let is_html = force_html
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"));
    if is_html {
        from_html(&body)
    } else {
        from_json(&body)
    }
}

pub fn from_json(json: &str) -> Result<Vec<RawFragment>> {
    let items = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        _ => return Err(Error::Snapshot("expected a JSON array of fragments".into())),
    };

    let mut fragments = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let parsed = match item {
            Value::String(s) => serde_json::from_str::<RawFragment>(&s),
            other => serde_json::from_value::<RawFragment>(other),
        };
        match parsed {
            Ok(f) => fragments.push(f),
            Err(e) => warn!(index, error = %e, "skipping unparseable fragment"),
        }
    }
    Ok(fragments)
}

pub fn from_html(html: &str) -> Result<Vec<RawFragment>> {
    let doc = Html::parse_document(html);
    let bubble_sel = selector(BUBBLE_TEXT_SELECTOR)?;
    let title_sel = selector(TERM_TITLE_SELECTOR)?;

    let fragments: Vec<RawFragment> = doc
        .select(&bubble_sel)
        .map(|el| {
            let source = closest_with_class(el, BUBBLE_CLASS).unwrap_or(el);
            let is_non_term = el
                .ancestors()
                .filter_map(ElementRef::wrap)
                .any(|a| has_class(a, NON_TERM_CLASS));
            let term_label = closest_with_class(el, TERM_CLASS)
                .and_then(|term| term.select(&title_sel).next())
                .map(element_text)
                .filter(|t| !t.is_empty());
            RawFragment {
                text: element_text(source),
                is_non_term,
                term_label,
            }
        })
        .collect();

    debug!(count = fragments.len(), "course bubbles found in HTML");
    Ok(fragments)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Snapshot(format!("bad selector {}: {}", css, e)))
}

fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

fn closest_with_class<'a>(el: ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| has_class(*a, class))
}

/// Text content with runs of whitespace collapsed.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}
