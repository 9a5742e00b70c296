//! Frequency-based rank tables over categorical columns.
//!
//! The rank assignment matches the production rank tables downstream
//! dashboards were built against: values with equal counts share a rank,
//! and the next strictly-smaller count takes the rank of its *position*
//! in the count-descending order — not count-based competition ranking.
//! Whenever more than one value shares the top count this produces gaps
//! (counts `[5, 5, 3, 3, 3, 1]` rank `[1, 1, 3, 3, 3, 6]`). Do not
//! "fix" the gap behavior; it is part of the table's contract.

use std::collections::HashMap;

/// A per-batch rank table: categorical value -> (count, rank).
///
/// Derived fresh for each batch and discarded after the rows are mapped;
/// ranks from one batch are meaningless against another.
#[derive(Debug)]
pub struct RankTable {
    entries: HashMap<String, (usize, u32)>,
}

impl RankTable {
    /// Builds the table from one categorical column.
    ///
    /// Distinct values are ordered by count descending; values with equal
    /// counts keep their first-observed order, which makes the assignment
    /// deterministic without a secondary sort key.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn from_column<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for value in values {
            let count = counts.entry(value).or_insert(0);
            if *count == 0 {
                order.push(value);
            }
            *count += 1;
        }

        // sort_by is stable: ties keep first-observed order.
        order.sort_by(|a, b| counts[b].cmp(&counts[a]));

        let mut entries = HashMap::with_capacity(order.len());
        let mut rank = 1_u32;
        let mut prev_count = 0_usize;
        for (position, value) in order.iter().enumerate() {
            let count = counts[value];
            if position > 0 && count < prev_count {
                // The position, not the count, determines the new rank.
                rank = position as u32 + 1;
            }
            prev_count = count;
            entries.insert((*value).to_string(), (count, rank));
        }

        Self { entries }
    }

    /// Rank assigned to `value`, if it appeared in the column.
    #[must_use]
    pub fn rank_of(&self, value: &str) -> Option<u32> {
        self.entries.get(value).map(|&(_, rank)| rank)
    }

    /// Occurrence count of `value`, if it appeared in the column.
    #[must_use]
    pub fn count_of(&self, value: &str) -> Option<usize> {
        self.entries.get(value).map(|&(count, _)| count)
    }

    /// Number of distinct values in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the column was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps every row of a column to its value's rank.
#[must_use]
pub fn rank_rows(values: &[&str]) -> Vec<u32> {
    let table = RankTable::from_column(values.iter().copied());
    values
        .iter()
        .map(|value| {
            table
                .rank_of(value)
                .unwrap_or_else(|| unreachable!("value came from the ranked column"))
        })
        .collect()
}
