use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::{CellValue, MedalTable};

/// All columns of the filtered rows, in source order.
pub fn detail_table(ui: &mut Ui, table: &MedalTable, view: &FilteredView) {
    if view.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let row_height = ui.text_style_height(&eframe::egui::TextStyle::Body) + 4.0;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(400.0)
        .column(TableColumn::auto().at_least(48.0))
        .columns(TableColumn::auto().at_least(60.0), table.column_names.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in &table.column_names {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, view.len(), |mut row| {
                let source_row = view.indices()[row.index()];
                row.col(|ui| {
                    ui.label(source_row.to_string());
                });
                for cell in &table.rows[source_row] {
                    row.col(|ui| {
                        match cell {
                            CellValue::Null => ui.weak("None"),
                            other => ui.label(other.to_string()),
                        };
                    });
                }
            });
        });
}
