use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::aggregate::{self, GroupCount, Share};
use super::filter::{FilterSelections, FilteredView, apply_filters};
use super::metrics::SummaryMetrics;
use super::model::{Column, MedalTable};

/// Everything the dashboard shows for one set of filter selections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filtered: FilteredView,
    pub metrics: SummaryMetrics,
    pub top_countries: Vec<GroupCount>,
    pub medal_distribution: Vec<GroupCount>,
    pub sex_shares: Vec<Share>,
    pub medals_by_iso3: Vec<GroupCount>,
    pub top_athletes: Vec<GroupCount>,
}

/// Recompute the whole dashboard from scratch. Pure: same inputs, same output.
pub fn compute_view(table: &MedalTable, selections: &FilterSelections, top_n: usize) -> DashboardView {
    let filtered = apply_filters(table, selections);
    let metrics = SummaryMetrics::compute(table, &filtered);

    let view = DashboardView {
        top_countries: aggregate::top_n(table, &filtered, Column::Country, top_n),
        medal_distribution: aggregate::medal_distribution(table, &filtered),
        sex_shares: aggregate::sex_shares(table, &filtered),
        medals_by_iso3: aggregate::medals_by_iso3(table, &filtered),
        top_athletes: aggregate::top_n(table, &filtered, Column::Athlete, top_n),
        metrics,
        filtered,
    };

    let mapped: usize = view.medals_by_iso3.iter().map(|g| g.count).sum();
    log::debug!(
        "Refreshed view: {} of {} rows, {} without ISO3 code",
        view.filtered.len(),
        table.len(),
        view.filtered.len() - mapped
    );
    view
}

/// Write the view as pretty-printed JSON.
pub fn export_json(view: &DashboardView, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(view).context("serializing view")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterRegistry, MASK_COLUMNS};
    use crate::data::model::CellValue;
    use crate::data::model::tests::table;

    fn sample() -> MedalTable {
        table(&[
            (2000, "gold", "swimming", "free", "USA", "USA", "Sydney", "100m", "M", "A"),
            (2000, "silver", "swimming", "free", "USA", "USA", "Sydney", "100m", "M", "B"),
            (2004, "gold", "fencing", "epee", "FRA", "FRA", "Athens", "epee", "F", "C"),
            (2004, "bronze", "rowing", "pair", "EUN", "", "Athens", "pair", "F", "D"),
        ])
    }

    #[test]
    fn test_unfiltered_view_counts_every_row() {
        let t = sample();
        let selections = FilterRegistry::from_table(&t).select_all();
        let view = compute_view(&t, &selections, 10);

        assert_eq!(view.filtered.len(), t.len());
        assert_eq!(view.metrics.total_medals, 4);
        assert_eq!(view.metrics.distinct_countries, 3);
        assert_eq!(view.medal_distribution.iter().map(|g| g.count).sum::<usize>(), 4);
        assert!(view.medals_by_iso3.iter().map(|g| g.count).sum::<usize>() < 4);
        assert!(view.top_countries.len() <= 10);
        assert!(view.top_athletes.iter().all(|g| g.count <= view.filtered.len()));
    }

    #[test]
    fn test_compute_view_is_deterministic() {
        let t = sample();
        let mut selections = FilterRegistry::from_table(&t).select_all();
        selections.set(Column::City, [CellValue::from("Athens")]);
        assert_eq!(compute_view(&t, &selections, 10), compute_view(&t, &selections, 10));
    }

    #[test]
    fn test_empty_selection_produces_empty_dashboard() {
        let t = sample();
        let registry = FilterRegistry::from_table(&t);
        for col in MASK_COLUMNS {
            let mut selections = registry.select_all();
            selections.clear(col);
            let view = compute_view(&t, &selections, 10);
            assert!(view.filtered.is_empty());
            assert_eq!(view.metrics, SummaryMetrics::default());
            assert!(view.top_countries.is_empty());
            assert!(view.medal_distribution.is_empty());
            assert!(view.sex_shares.is_empty());
            assert!(view.medals_by_iso3.is_empty());
            assert!(view.top_athletes.is_empty());
        }
    }

    #[test]
    fn test_row_without_athlete_counts_in_totals() {
        let t = table(&[
            (2000, "gold", "rowing", "eight", "USA", "USA", "Sydney", "eight", "M", ""),
            (2000, "gold", "swimming", "free", "USA", "USA", "Sydney", "100m", "M", "A"),
        ]);
        let mut selections = FilterRegistry::from_table(&t).select_all();
        selections.set(Column::Athlete, [CellValue::from("nobody")]);
        let view = compute_view(&t, &selections, 10);

        assert_eq!(view.metrics.total_medals, 2);
        assert_eq!(view.metrics.top_athlete, Some(CellValue::from("A")));
        assert_eq!(view.medals_by_iso3[0].count, 2);
        assert_eq!(view.top_athletes.len(), 1);
    }

    #[test]
    fn test_export_writes_json() {
        let t = sample();
        let mut selections = FilterRegistry::from_table(&t).select_all();
        selections.set(Column::Year, [CellValue::Integer(2000)]);
        let view = compute_view(&t, &selections, 10);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        export_json(&view, &path).unwrap();

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["metrics"]["total_medals"], 2);
        assert_eq!(json["metrics"]["top_sport"], "swimming");
        assert_eq!(json["filtered"]["indices"], serde_json::json!([0, 1]));
        assert_eq!(json["top_countries"][0]["value"], "USA");
    }
}
