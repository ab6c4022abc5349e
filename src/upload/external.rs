// SPDX-License-Identifier: MPL-2.0
//! Picker state for importing files from an external dossier.
//!
//! Files are identified by their server path. Selection order is kept so the
//! import uploads them in the order the user picked them.

use super::form::UploadMode;
use crate::dossier::{DossierFile, ImportRequest, Rel};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalPicker {
    open: bool,
    highlighted: Option<String>,
    selected: Vec<String>,
    pub mode: UploadMode,
}

/// Stable key of a listing entry: its server path, or its name.
pub fn entry_key(file: &DossierFile) -> &str {
    file.path.as_deref().unwrap_or(&file.name)
}

impl ExternalPicker {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens with a fresh state, highlighting the first file.
    pub fn open(&mut self, files: &[DossierFile]) {
        *self = Self {
            open: true,
            highlighted: files.first().map(|file| entry_key(file).to_string()),
            ..Self::default()
        };
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn highlight(&mut self, file: &DossierFile) {
        self.highlighted = Some(entry_key(file).to_string());
    }

    pub fn highlighted<'a>(&self, files: &'a [DossierFile]) -> Option<&'a DossierFile> {
        let path = self.highlighted.as_deref()?;
        files.iter().find(|file| entry_key(file) == path)
    }

    /// One-based position of the highlighted file in the listing.
    pub fn highlighted_position(&self, files: &[DossierFile]) -> Option<usize> {
        let path = self.highlighted.as_deref()?;
        files.iter().position(|file| entry_key(file) == path).map(|i| i + 1)
    }

    /// Checks or unchecks a file and highlights it.
    pub fn toggle(&mut self, file: &DossierFile, checked: bool) {
        let path = entry_key(file).to_string();
        self.selected.retain(|selected| *selected != path);
        if checked {
            self.selected.push(path.clone());
        }
        self.highlighted = Some(path);
    }

    /// One-based selection number of a checked file.
    pub fn selection_number(&self, file: &DossierFile) -> Option<usize> {
        let path = entry_key(file);
        self.selected
            .iter()
            .position(|selected| selected == path)
            .map(|i| i + 1)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn can_import(&self, loading: bool) -> bool {
        !loading && !self.selected.is_empty()
    }

    /// Builds the import of the checked files' attachments into `target`.
    pub fn import_request(&self, target: &DossierFile, files: &[DossierFile]) -> Option<ImportRequest> {
        let urls: Vec<String> = self
            .selected
            .iter()
            .filter_map(|path| files.iter().find(|file| entry_key(file) == path))
            .filter_map(|file| file.link(&Rel::Attachment).map(String::from))
            .collect();
        if urls.is_empty() {
            return None;
        }
        Some(ImportRequest {
            file: target.clone(),
            urls,
            merge: self.mode.is_merge(),
        })
    }
}
