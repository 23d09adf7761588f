use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{CellValue, Column, MedalTable};

/// Headline numbers for the current filtered view.
///
/// Modes are `None` for an empty view (or a column with only missing values),
/// which the UI shows as the no-data sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_medals: usize,
    pub distinct_countries: usize,
    pub top_sport: Option<CellValue>,
    pub top_country: Option<CellValue>,
    pub top_athlete: Option<CellValue>,
}

impl SummaryMetrics {
    pub fn compute(table: &MedalTable, view: &FilteredView) -> Self {
        if view.is_empty() {
            return SummaryMetrics::default();
        }

        let distinct_countries = view
            .values(table, Column::Country)
            .filter(|v| !v.is_null())
            .collect::<BTreeSet<_>>()
            .len();

        SummaryMetrics {
            total_medals: view.len(),
            distinct_countries,
            top_sport: mode(view.values(table, Column::Sport)),
            top_country: mode(view.values(table, Column::Country)),
            top_athlete: mode(view.values(table, Column::Athlete)),
        }
    }
}

/// Most frequent non-missing value; ties go to the smallest value.
pub fn mode<'a>(values: impl Iterator<Item = &'a CellValue>) -> Option<CellValue> {
    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for v in values.filter(|v| !v.is_null()) {
        *counts.entry(v).or_default() += 1;
    }

    // BTreeMap iterates ascending; only a strictly larger count replaces the best.
    let mut best: Option<(&CellValue, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, n)) if n >= count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{FilterRegistry, apply_filters};
    use crate::data::model::tests::table;

    fn three_rows() -> MedalTable {
        table(&[
            (2000, "gold", "swimming", "free", "USA", "USA", "Sydney", "100m", "M", "A"),
            (2000, "silver", "swimming", "free", "USA", "USA", "Sydney", "100m", "M", "B"),
            (2004, "gold", "fencing", "epee", "FRA", "FRA", "Athens", "epee", "F", "C"),
        ])
    }

    #[test]
    fn test_metrics_for_year_2000() {
        let t = three_rows();
        let mut selections = FilterRegistry::from_table(&t).select_all();
        selections.set(Column::Year, [CellValue::Integer(2000)]);
        let view = apply_filters(&t, &selections);

        let m = SummaryMetrics::compute(&t, &view);
        assert_eq!(m.total_medals, 2);
        assert_eq!(m.distinct_countries, 1);
        assert_eq!(m.top_sport, Some(CellValue::from("swimming")));
        assert_eq!(m.top_country, Some(CellValue::from("USA")));
    }

    #[test]
    fn test_empty_view_yields_placeholders() {
        let t = three_rows();
        let mut selections = FilterRegistry::from_table(&t).select_all();
        selections.set(Column::Medal, [CellValue::from("bronze")]);
        let view = apply_filters(&t, &selections);

        let m = SummaryMetrics::compute(&t, &view);
        assert_eq!(m.total_medals, 0);
        assert_eq!(m.distinct_countries, 0);
        assert_eq!(m.top_sport, None);
        assert_eq!(m.top_country, None);
        assert_eq!(m.top_athlete, None);
    }

    #[test]
    fn test_mode_ties_go_to_smallest_value() {
        let values = [CellValue::from("b"), CellValue::from("a"), CellValue::from("b"), CellValue::from("a")];
        assert_eq!(mode(values.iter()), Some(CellValue::from("a")));
    }

    #[test]
    fn test_mode_prefers_higher_count() {
        let values = [CellValue::from("a"), CellValue::from("c"), CellValue::from("c")];
        assert_eq!(mode(values.iter()), Some(CellValue::from("c")));
    }

    #[test]
    fn test_mode_ignores_missing() {
        let values = [CellValue::Null, CellValue::Null, CellValue::from("x")];
        assert_eq!(mode(values.iter()), Some(CellValue::from("x")));
        assert_eq!(mode([CellValue::Null].iter()), None);
    }
}
