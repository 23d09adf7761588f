use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterGroup;
use crate::data::model::{CellValue, Column};
use crate::state::AppState;

/// A change requested by a filter widget, applied once the frame's borrows end.
enum FilterAction {
    SelectAll,
    SelectNone,
    Toggle(CellValue),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if ui.button("Reset all filters").clicked() {
        state.reset_filters();
    }
    ui.add_space(4.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for group in [FilterGroup::Primary, FilterGroup::Advanced] {
                egui::CollapsingHeader::new(RichText::new(group.title()).strong())
                    .id_salt(group.title())
                    .default_open(group == FilterGroup::Primary)
                    .show(ui, |ui: &mut Ui| {
                        for col in group.columns() {
                            filter_widget(ui, state, col);
                        }
                    });
            }
        });
}

/// Multi-select for one column: All / None, a search box, and one checkbox per option.
fn filter_widget(ui: &mut Ui, state: &mut AppState, col: Column) {
    let options = state.registry.options(col);

    // Show count of selected / total in the header
    let n_selected = state.selections.selected_count(col);
    let n_total = options.len();
    let header_text = format!("{}  ({n_selected}/{n_total})", col.label());

    let mut action = None;
    egui::CollapsingHeader::new(header_text)
        .id_salt(col.name())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(FilterAction::SelectAll);
                }
                if ui.small_button("None").clicked() {
                    action = Some(FilterAction::SelectNone);
                }
            });

            let search = state.option_search.entry(col).or_default();
            ui.add(egui::TextEdit::singleline(search).hint_text("Search…"));
            let needle = search.to_lowercase();

            let matching: Vec<&CellValue> = options
                .iter()
                .filter(|v| needle.is_empty() || v.to_string().to_lowercase().contains(&needle))
                .collect();

            let row_height = ui.spacing().interact_size.y;
            ScrollArea::vertical()
                .id_salt(col.name())
                .max_height(220.0)
                .show_rows(ui, row_height, matching.len(), |ui: &mut Ui, range| {
                    for val in &matching[range] {
                        let mut checked = state.selections.is_selected(col, val);
                        if ui.checkbox(&mut checked, val.to_string()).changed() {
                            action = Some(FilterAction::Toggle((*val).clone()));
                        }
                    }
                });
        });

    match action {
        Some(FilterAction::SelectAll) => state.select_all(col),
        Some(FilterAction::SelectNone) => state.select_none(col),
        Some(FilterAction::Toggle(val)) => state.toggle_filter_value(col, &val),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export view as JSON…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(table), Some(view)) = (&state.table, &state.view) {
            ui.label(format!(
                "{} medals loaded, {} visible",
                table.len(),
                view.filtered.len()
            ));
        }
        if let Some(path) = &state.source_path {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open medal data")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard view")
        .set_file_name("medal_view.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_view(&path);
    }
}
