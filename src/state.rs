use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::DashboardConfig;
use crate::data::filter::{FilterRegistry, FilterSelections};
use crate::data::loader::load_file;
use crate::data::model::{CellValue, Column, MedalTable};
use crate::data::view::{DashboardView, compute_view, export_json};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded table (None until a file loads successfully).
    pub table: Option<MedalTable>,

    /// Filter options, derived once from the full table.
    pub registry: FilterRegistry,

    /// Per-column filter selections.
    pub selections: FilterSelections,

    /// Result of the last refresh.
    pub view: Option<DashboardView>,

    /// Search text typed above each filter's option list.
    pub option_search: BTreeMap<Column, String>,

    /// File the current table came from.
    pub source_path: Option<PathBuf>,

    /// Fatal load error; replaces the dashboard while set.
    pub load_error: Option<String>,

    /// Non-fatal status message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            table: None,
            registry: FilterRegistry::default(),
            selections: FilterSelections::default(),
            view: None,
            option_search: BTreeMap::new(),
            source_path: None,
            load_error: None,
            status_message: None,
        }
    }

    /// Load a file, replacing the current table on success. On failure the
    /// dashboard is cleared and only the error is shown.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.column_names
                );
                self.source_path = Some(path.to_path_buf());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.table = None;
                self.view = None;
                self.registry = FilterRegistry::default();
                self.selections = FilterSelections::default();
                self.source_path = Some(path.to_path_buf());
                self.load_error = Some(format!("{e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table, initialise filters and compute the view.
    pub fn set_table(&mut self, table: MedalTable) {
        self.registry = FilterRegistry::from_table(&table);
        self.selections = self.registry.select_all();
        self.option_search.clear();
        self.table = Some(table);
        self.load_error = None;
        self.status_message = None;
        self.refresh();
    }

    /// Recompute the whole view after a selection change.
    pub fn refresh(&mut self) {
        self.view = self
            .table
            .as_ref()
            .map(|table| compute_view(table, &self.selections, self.config.top_n));
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: Column, value: &CellValue) {
        self.selections.toggle(column, value);
        self.refresh();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: Column) {
        let all = self.registry.options(column).to_vec();
        self.selections.set(column, all);
        self.refresh();
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: Column) {
        self.selections.clear(column);
        self.refresh();
    }

    /// Back to the unfiltered view.
    pub fn reset_filters(&mut self) {
        self.selections = self.registry.select_all();
        self.refresh();
    }

    /// `"<first> - <last>"` over the available years, if any.
    pub fn year_span(&self) -> Option<String> {
        let years = self.registry.options(Column::Year);
        match (years.first(), years.last()) {
            (Some(first), Some(last)) => Some(format!("{first} - {last}")),
            _ => None,
        }
    }

    pub fn export_view(&mut self, path: &Path) {
        let Some(view) = &self.view else {
            return;
        };
        match export_json(view, path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
