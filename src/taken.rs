use std::collections::HashSet;

use tracing::info;

use crate::error::Result;
use crate::parser::codes::CourseCode;

/// Persistent "courses taken" collection. Inserting a present code is a no-op.
pub trait TakenStore {
    fn has(&self, code: &str) -> Result<bool>;
    fn insert(&mut self, code: &str) -> Result<()>;
    fn remove(&mut self, code: &str) -> Result<bool>;
    fn list(&self) -> Result<Vec<String>>;
}

/// Insertion-ordered in-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: Vec<String>,
    index: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TakenStore for MemoryStore {
    fn has(&self, code: &str) -> Result<bool> {
        Ok(self.index.contains(code))
    }

    fn insert(&mut self, code: &str) -> Result<()> {
        if self.index.insert(code.to_string()) {
            self.items.push(code.to_string());
        }
        Ok(())
    }

    fn remove(&mut self, code: &str) -> Result<bool> {
        if self.index.remove(code) {
            self.items.retain(|c| c != code);
            return Ok(true);
        }
        Ok(false)
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.items.clone())
    }
}

/// Add every code the store doesn't already have. Returns how many were new.
pub fn merge_taken<'a, S, I>(store: &mut S, codes: I) -> Result<usize>
where
    S: TakenStore + ?Sized,
    I: IntoIterator<Item = &'a CourseCode>,
{
    let mut added = 0;
    for code in codes {
        if !store.has(code.as_str())? {
            store.insert(code.as_str())?;
            added += 1;
        }
    }
    info!(added, "merged extracted courses into taken list");
    Ok(added)
}

/// Clean up a hand-typed code: trimmed and upper-cased, `None` when blank.
pub fn normalize_entry(input: &str) -> Option<String> {
    let value = input.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_uppercase())
    }
}
