use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered providers, or the upload prompt when nothing loaded.
pub fn results(ui: &mut Ui, state: &mut AppState) {
    let Some(roster) = state.roster().map(Arc::clone) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.vertical_centered(|ui: &mut Ui| {
                if state.load_failed {
                    ui.heading("Failed to load data. Please upload a valid file or check the source.");
                    if let Some(msg) = &state.status_message {
                        ui.label(RichText::new(msg).color(Color32::RED));
                    }
                } else {
                    ui.heading("Open a provider file to view the roster  (File → Upload…)");
                }
                if ui.button("Upload provider file…").clicked() {
                    panels::open_file_dialog(state);
                }
            });
        });
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "Showing {} of {} providers",
            state.visible_indices.len(),
            roster.len()
        ));
        if ui.button("Download Filtered Data").clicked() {
            panels::save_file_dialog(state);
        }
    });
    ui.separator();

    if state.visible_indices.is_empty() {
        ui.label(RichText::new("No matching providers found.").color(Color32::from_rgb(200, 120, 0)));
        return;
    }

    let employment_col = state.config().columns.employment_type.clone();
    let color_map = state.color_map.as_ref();
    let visible = &state.visible_indices;

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), roster.columns.len())
            .header(22.0, |mut header| {
                for col in &roster.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(20.0, visible.len(), |mut row| {
                    let record = &roster.records[visible[row.index()]];
                    for col in &roster.columns {
                        row.col(|ui: &mut Ui| {
                            let mut text = RichText::new(record.field(col).to_string());
                            if *col == employment_col {
                                if let Some(cm) = color_map {
                                    text = text.color(cm.color_for(&record.employment_type_clean));
                                }
                            }
                            ui.label(text);
                        });
                    }
                });
            });
    });
}
