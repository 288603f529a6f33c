use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use physician_roster::data::export::DEFAULT_EXPORT_NAME;
use physician_roster::data::source::SourceFormat;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – search and filter widgets
// ---------------------------------------------------------------------------

/// Render the left search/filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    // ---- Logo (centered, only when the file is there) ----
    let logo_path = &state.config().logo_path;
    if logo_path.exists() {
        let uri = format!("file://{}", logo_path.display());
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add(
                egui::Image::new(uri)
                    .max_width(ui.available_width() * 0.8)
                    .max_height(120.0),
            );
        });
        ui.add_space(4.0);
    }

    ui.heading(&state.config().title);
    ui.separator();

    ui.strong("Search by Provider Name");
    let search = ui.add(
        egui::TextEdit::singleline(&mut state.query.name_pattern)
            .hint_text("e.g. Smith")
            .desired_width(f32::INFINITY),
    );
    if search.changed() {
        state.refilter();
    }

    if ui.button("Clear filters").clicked() {
        state.clear_filters();
    }
    ui.separator();

    // Cheap clone of the Arc so the option lists can be walked while the
    // query is mutated.
    let Some(roster) = state.roster().map(Arc::clone) else {
        ui.label("No roster loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let n_selected = state.query.employment_types.len();
            let n_total = roster.employment_types.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Employment Type  ({n_selected}/{n_total})")).strong(),
            )
            .id_salt("employment_type")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for value in &roster.employment_types {
                    let mut text = RichText::new(value);
                    if let Some(cm) = &state.color_map {
                        text = text.color(cm.color_for(value));
                    }
                    let mut checked = state.query.employment_types.contains(value);
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_employment_type(value);
                    }
                }
            });

            let n_selected = state.query.subspecialties.len();
            let n_total = roster.subspecialties.len();
            egui::CollapsingHeader::new(
                RichText::new(format!("Subspecialty  ({n_selected}/{n_total})")).strong(),
            )
            .id_salt("subspecialty")
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                for value in &roster.subspecialties {
                    let mut checked = state.query.subspecialties.contains(value);
                    if ui.checkbox(&mut checked, value.as_str()).changed() {
                        state.toggle_subspecialty(value);
                    }
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload provider file…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload from source").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = state.roster().is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(roster) = state.roster() {
            ui.label(format!(
                "{} providers loaded, {} visible",
                roster.len(),
                state.visible_indices.len()
            ));
        }
        if let Some(source) = state.session.source() {
            ui.separator();
            ui.label(RichText::new(source.label()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload provider data")
        .add_filter("Provider files", &SourceFormat::EXTENSIONS)
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download filtered providers")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_csv(&path) {
            Ok(()) => state.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
