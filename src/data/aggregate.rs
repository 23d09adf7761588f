use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{CellValue, Column, MedalTable};

// ---------------------------------------------------------------------------
// Result rows
// ---------------------------------------------------------------------------

/// One group of a count aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCount {
    pub value: CellValue,
    pub count: usize,
}

/// One slice of a proportion aggregation; `share` is in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub value: CellValue,
    pub count: usize,
    pub share: f64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Row count per non-missing value of `col`, ascending by value.
pub fn group_counts(table: &MedalTable, view: &FilteredView, col: Column) -> Vec<GroupCount> {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for v in view.values(table, col).filter(|v| !v.is_null()) {
        *counts.entry(v).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(value, count)| GroupCount {
            value: value.clone(),
            count,
        })
        .collect()
}

/// The `n` largest groups of `col`, returned ascending by count so the largest
/// ends up at the top of a horizontal bar chart.
///
/// Ranking ties are broken by value (smallest first); the final ascending sort
/// is stable, so tied groups appear in reverse value order.
pub fn top_n(table: &MedalTable, view: &FilteredView, col: Column, n: usize) -> Vec<GroupCount> {
    let mut groups = group_counts(table, view, col);
    // group_counts is value-ordered, so a stable sort keeps value as the tiebreak.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(n);
    groups.reverse();
    groups
}

/// Row count per medal type, in order of first appearance in the view.
pub fn medal_distribution(table: &MedalTable, view: &FilteredView) -> Vec<GroupCount> {
    let mut groups: Vec<GroupCount> = Vec::new();
    for v in view.values(table, Column::Medal).filter(|v| !v.is_null()) {
        match groups.iter_mut().find(|g| &g.value == v) {
            Some(g) => g.count += 1,
            None => groups.push(GroupCount {
                value: v.clone(),
                count: 1,
            }),
        }
    }
    groups
}

/// Share of rows per sex, largest first (ties by value).
pub fn sex_shares(table: &MedalTable, view: &FilteredView) -> Vec<Share> {
    let mut groups = group_counts(table, view, Column::Sex);
    groups.sort_by(|a, b| b.count.cmp(&a.count));

    let total: usize = groups.iter().map(|g| g.count).sum();
    if total == 0 {
        return Vec::new();
    }
    groups
        .into_iter()
        .map(|g| Share {
            share: g.count as f64 / total as f64,
            value: g.value,
            count: g.count,
        })
        .collect()
}

/// Row count per ISO3 code. Rows without a code are left out entirely.
pub fn medals_by_iso3(table: &MedalTable, view: &FilteredView) -> Vec<GroupCount> {
    group_counts(table, view, Column::CountryIso3)
}
