//! Completed-course extraction from degree-plan timeline pages.
//!
//! Scraped course bubbles go through a fixed pipeline: status filter, course
//! code extraction, credit extraction, term normalization, then aggregation into
//! chronologically ordered term groups.

pub mod config;
pub mod db;
pub mod error;
pub mod parser;
pub mod snapshot;
pub mod taken;

pub use error::{Error, Result};
pub use parser::aggregate::{Aggregation, CourseEntry, ExtractedRecord, TermGroup};
pub use parser::codes::CourseCode;
pub use parser::credits::Credits;
pub use parser::terms::TermKey;
pub use parser::{extract_records, process_snapshot, RawFragment};
