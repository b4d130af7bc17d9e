//! Import Replacer
//!
//! Replaces the items of matched project tracks with filtered source
//! items. Replacement is whole-track: the new item list is staged in full
//! and only applied through the host's batched write, so a failed run
//! never leaves a track half-replaced. Source timing is preserved as-is;
//! quantization is the Normalizer's opt-in job.

use serde::{Deserialize, Serialize};

use crate::model::{Item, Ticks, Track};

/// A predicate rejecting source items; an item is imported only if it
/// passes every rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionRule {
    /// Reject items whose name contains any of these patterns
    /// (case-sensitive substring match against the excluded marker list).
    NameMatches(Vec<String>),
    /// Reject items falling entirely outside the working range
    /// `[start, end)`.
    OutsideRange { start: Ticks, end: Ticks },
}

impl ExclusionRule {
    /// True if this rule rejects the item.
    pub fn excludes(&self, item: &Item) -> bool {
        match self {
            ExclusionRule::NameMatches(patterns) => {
                let name = item.name.as_deref().unwrap_or("");
                patterns.iter().any(|pattern| name.contains(pattern.as_str()))
            }
            ExclusionRule::OutsideRange { start, end } => {
                item.end() <= *start || item.start >= *end
            }
        }
    }
}

/// Outcome of filtering one source track's items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredItems {
    pub accepted: Vec<Item>,
    pub rejected: usize,
}

/// Apply every rule to every item of the source track.
///
/// Rejected items are counted, never fatal; a track whose items are all
/// rejected simply comes back empty and clears its project counterpart.
pub fn filter_items(source: &Track, rules: &[ExclusionRule]) -> FilteredItems {
    let mut accepted = Vec::with_capacity(source.items.len());
    let mut rejected = 0;

    for item in &source.items {
        if rules.iter().any(|rule| rule.excludes(item)) {
            rejected += 1;
        } else {
            accepted.push(item.clone());
        }
    }

    FilteredItems { accepted, rejected }
}
