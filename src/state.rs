use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use physician_roster::config::RosterConfig;
use physician_roster::data::error::RosterError;
use physician_roster::data::export;
use physician_roster::data::filter::{filtered_indices, Query};
use physician_roster::data::model::Roster;
use physician_roster::data::Source;
use physician_roster::RosterSession;

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded roster and the means to reload it.
    pub session: RosterSession,

    /// Search text and selected filter options.
    pub query: Query,

    /// Indices of providers passing the current query (cached).
    pub visible_indices: Vec<usize>,

    /// Colours for the employment type options.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the last load attempt failed; the upload prompt is shown.
    pub load_failed: bool,
}

impl AppState {
    pub fn new(config: RosterConfig) -> Self {
        Self {
            session: RosterSession::new(config),
            query: Query::default(),
            visible_indices: Vec::new(),
            color_map: None,
            status_message: None,
            load_failed: false,
        }
    }

    pub fn config(&self) -> &RosterConfig {
        self.session.config()
    }

    pub fn roster(&self) -> Option<&Arc<Roster>> {
        self.session.roster()
    }

    /// Fetch the configured remote worksheet; without one, ask for a file.
    pub fn load_default(&mut self) {
        match self.session.load_default() {
            Some(result) => self.apply_load(result),
            None => {
                self.status_message =
                    Some("No remote source configured. Upload a provider file.".to_string());
                self.load_failed = true;
            }
        }
    }

    /// Refetch past the cache.
    pub fn reload(&mut self) {
        if let Some(result) = self.session.reload() {
            self.apply_load(result);
        }
    }

    /// Load a locally supplied file (the upload fallback).
    pub fn load_file(&mut self, path: &Path) {
        let result = self.session.load(Source::File(path.to_path_buf()));
        self.apply_load(result);
    }

    /// Install a fresh roster, or report why not. On failure the previous
    /// roster and its filtered view stay as they were.
    fn apply_load(&mut self, result: Result<Arc<Roster>, RosterError>) {
        match result {
            Ok(roster) => {
                self.query
                    .employment_types
                    .retain(|t| roster.employment_types.contains(t));
                self.query
                    .subspecialties
                    .retain(|t| roster.subspecialties.contains(t));
                self.color_map = Some(ColorMap::new(&roster.employment_types));
                self.status_message = None;
                self.load_failed = false;
                self.refilter();
            }
            Err(e) => {
                log::error!("Failed to load roster: {e:#}");
                self.status_message = Some(format!("Error: {e}"));
                self.load_failed = true;
            }
        }
    }

    /// Recompute `visible_indices` after a query change.
    pub fn refilter(&mut self) {
        self.visible_indices = match self.session.roster() {
            Some(roster) => filtered_indices(roster, &self.query),
            None => Vec::new(),
        };
    }

    pub fn toggle_employment_type(&mut self, value: &str) {
        toggle(&mut self.query.employment_types, value);
        self.refilter();
    }

    pub fn toggle_subspecialty(&mut self, value: &str) {
        toggle(&mut self.query.subspecialties, value);
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.query = Query::default();
        self.refilter();
    }

    /// Write the current view to `path` as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let roster = self.roster().context("no roster loaded")?;
        export::export_to_path(roster, &self.visible_indices, path)
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "MILV Radiologist/Extender,Employment Type,Subspecialty\n\
John Smith,Partner [2020],PET/CT\n\
Jane Doe,Employee,Neuro\n";

    fn offline() -> AppState {
        AppState::new(RosterConfig {
            source_url: None,
            ..RosterConfig::default()
        })
    }

    #[test]
    fn no_remote_source_prompts_for_upload() {
        let mut state = offline();
        state.load_default();
        assert!(state.load_failed);
        assert!(state.roster().is_none());
    }

    #[test]
    fn toggles_refilter_and_clear_restores_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut state = offline();
        state.load_file(&path);
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_subspecialty("PETCT");
        assert_eq!(state.visible_indices, vec![0]);
        state.toggle_subspecialty("PETCT");
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_employment_type("Employee");
        assert_eq!(state.visible_indices, vec![1]);
        state.clear_filters();
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn failed_upload_keeps_current_view() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("p.csv");
        std::fs::write(&good, CSV).unwrap();

        let mut state = offline();
        state.load_file(&good);
        state.toggle_employment_type("Partner");

        state.load_file(&dir.path().join("missing.csv"));
        assert!(state.load_failed);
        assert_eq!(state.visible_indices, vec![0]);
        assert_eq!(state.roster().map(|r| r.len()), Some(2));
    }

    #[test]
    fn stale_selections_are_dropped_on_new_roster() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        std::fs::write(&first, CSV).unwrap();
        std::fs::write(
            &second,
            "MILV Radiologist/Extender,Employment Type,Subspecialty\nPat Lee,Employee,MSK\n",
        )
        .unwrap();

        let mut state = offline();
        state.load_file(&first);
        state.toggle_subspecialty("PETCT");
        state.toggle_employment_type("Employee");
        state.load_file(&second);

        assert!(state.query.subspecialties.is_empty());
        assert!(state.query.employment_types.contains("Employee"));
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn export_writes_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut state = offline();
        state.load_file(&path);
        state.query.name_pattern = "doe".to_string();
        state.refilter();

        let out = dir.path().join("out.csv");
        state.export_csv(&out).unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert_eq!(
            text,
            "MILV Radiologist/Extender,Employment Type,Subspecialty\nJane Doe,Employee,Neuro\n"
        );
    }
}
