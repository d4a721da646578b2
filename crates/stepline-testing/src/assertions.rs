//! Custom assertions over the fake collaborators' journal.
//!
//! Provides high-level assertions that make tests more readable:
//! - Ordered subsequence checks
//! - Absence of a kind of call

use crate::Journal;
use anyhow::Result;

/// Assert that `expected` appears in the journal in this order, not
/// necessarily adjacent.
pub fn assert_in_order(journal: &Journal, expected: &[&str]) -> Result<()> {
    let entries = journal.entries();
    let mut remaining = entries.iter();

    for want in expected {
        if !remaining.any(|entry| entry == want) {
            anyhow::bail!(
                "Expected '{}' (in order) in journal, got:\n{:#?}",
                want,
                entries
            );
        }
    }

    Ok(())
}

/// Assert that no journal entry starts with `prefix`.
pub fn assert_never(journal: &Journal, prefix: &str) -> Result<()> {
    let entries = journal.entries();
    if let Some(entry) = entries.iter().find(|entry| entry.starts_with(prefix)) {
        anyhow::bail!(
            "Expected no '{}' calls, found '{}' in:\n{:#?}",
            prefix,
            entry,
            entries
        );
    }
    Ok(())
}
