use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{CellValue, Column, MedalTable};

// ---------------------------------------------------------------------------
// Filter columns and their side-panel grouping
// ---------------------------------------------------------------------------

/// Which side-panel group a filter is shown in. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterGroup {
    Primary,
    Advanced,
}

impl FilterGroup {
    pub fn title(self) -> &'static str {
        match self {
            FilterGroup::Primary => "Primary filters",
            FilterGroup::Advanced => "Advanced filters",
        }
    }

    /// Filter columns belonging to this group, in display order.
    pub fn columns(self) -> impl Iterator<Item = Column> {
        FILTER_COLUMNS
            .into_iter()
            .filter(move |col| group_of(*col) == self)
    }
}

/// Every column the user can filter on. The ISO3 code is not one of them.
pub const FILTER_COLUMNS: [Column; 9] = [
    Column::Year,
    Column::Medal,
    Column::Sport,
    Column::Modality,
    Column::Country,
    Column::City,
    Column::Event,
    Column::Sex,
    Column::Athlete,
];

/// Columns whose selections restrict rows. The athlete selector is offered in
/// the panel but never narrows the view.
pub const MASK_COLUMNS: [Column; 8] = [
    Column::Year,
    Column::Medal,
    Column::Sport,
    Column::Modality,
    Column::Country,
    Column::City,
    Column::Event,
    Column::Sex,
];

fn group_of(col: Column) -> FilterGroup {
    match col {
        Column::Year | Column::Medal => FilterGroup::Primary,
        _ => FilterGroup::Advanced,
    }
}

// ---------------------------------------------------------------------------
// Filter registry: the options available per column
// ---------------------------------------------------------------------------

/// Sorted distinct non-missing values per filter column, derived once from the
/// full table. Options never narrow as other filters change.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    options: BTreeMap<Column, Vec<CellValue>>,
}

impl FilterRegistry {
    pub fn from_table(table: &MedalTable) -> Self {
        let options = FILTER_COLUMNS
            .into_iter()
            .map(|col| {
                let distinct: BTreeSet<&CellValue> = (0..table.len())
                    .map(|row| table.value(row, col))
                    .filter(|v| !v.is_null())
                    .collect();
                (col, distinct.into_iter().cloned().collect())
            })
            .collect();
        FilterRegistry { options }
    }

    /// Available values for a column, ascending.
    pub fn options(&self, col: Column) -> &[CellValue] {
        self.options.get(&col).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Selections with every option chosen, i.e. the unfiltered view.
    pub fn select_all(&self) -> FilterSelections {
        FilterSelections {
            selected: self
                .options
                .iter()
                .map(|(col, vals)| (*col, vals.iter().cloned().collect()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter selections: what the user currently allows per column
// ---------------------------------------------------------------------------

/// Per-column selection state. A column without an entry selects nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelections {
    selected: BTreeMap<Column, BTreeSet<CellValue>>,
}

impl FilterSelections {
    pub fn get(&self, col: Column) -> Option<&BTreeSet<CellValue>> {
        self.selected.get(&col)
    }

    pub fn is_selected(&self, col: Column, value: &CellValue) -> bool {
        self.selected
            .get(&col)
            .is_some_and(|set| set.contains(value))
    }

    pub fn selected_count(&self, col: Column) -> usize {
        self.selected.get(&col).map_or(0, BTreeSet::len)
    }

    /// Replace a column's selection.
    pub fn set<I>(&mut self, col: Column, values: I)
    where
        I: IntoIterator<Item = CellValue>,
    {
        self.selected.insert(col, values.into_iter().collect());
    }

    /// Toggle one value; returns whether it is now selected.
    pub fn toggle(&mut self, col: Column, value: &CellValue) -> bool {
        let set = self.selected.entry(col).or_default();
        if set.remove(value) {
            false
        } else {
            set.insert(value.clone());
            true
        }
    }

    pub fn clear(&mut self, col: Column) {
        self.selected.insert(col, BTreeSet::new());
    }
}

// ---------------------------------------------------------------------------
// Row filter
// ---------------------------------------------------------------------------

/// Indices of the source rows passing every filter, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredView {
    indices: Vec<usize>,
}

impl FilteredView {
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Every downstream computation checks this before doing any work.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Values of one column over the filtered rows.
    pub fn values<'a>(
        &'a self,
        table: &'a MedalTable,
        col: Column,
    ) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.indices.iter().map(move |&row| table.value(row, col))
    }
}

/// Apply the [`MASK_COLUMNS`] selections as a conjunction.
///
/// A row passes a column when its value is in that column's selection.
/// Missing values are never selectable, so a row with a missing value in
/// any masked column never passes. An empty selection matches nothing.
pub fn apply_filters(table: &MedalTable, selections: &FilterSelections) -> FilteredView {
    let active: Vec<(Column, &BTreeSet<CellValue>)> = MASK_COLUMNS
        .into_iter()
        .map(|col| (col, selections.get(col).unwrap_or(&EMPTY)))
        .collect();

    if active.iter().any(|(_, set)| set.is_empty()) {
        return FilteredView::default();
    }

    let indices = (0..table.len())
        .filter(|&row| {
            active
                .iter()
                .all(|(col, set)| set.contains(table.value(row, *col)))
        })
        .collect();

    FilteredView { indices }
}

static EMPTY: BTreeSet<CellValue> = BTreeSet::new();
