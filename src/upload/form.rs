// SPDX-License-Identifier: MPL-2.0
//! State of the upload form of the selected file slot.

use super::scanner::{ScanColor, ScanParams};
use crate::config::{DEFAULT_SCAN_DPI, MIN_SCAN_DPI};
use crate::dossier::{DossierFile, LocalFile, UploadRequest};

const MAX_DPI_DIGITS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadMode {
    /// Replace the current version.
    #[default]
    New,
    /// Merge into the current version.
    Merge,
}

impl UploadMode {
    pub fn is_merge(self) -> bool {
        self == UploadMode::Merge
    }
}

/// What the file button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    Empty,
    Single(&'a str),
    Several(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    files: Vec<LocalFile>,
    pub mode: UploadMode,
    pub scan_color: ScanColor,
    dpi_text: String,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new(ScanColor::default(), DEFAULT_SCAN_DPI)
    }
}

impl UploadForm {
    pub fn new(scan_color: ScanColor, dpi: u32) -> Self {
        Self {
            files: Vec::new(),
            mode: UploadMode::New,
            scan_color,
            dpi_text: dpi.to_string(),
        }
    }

    pub fn files(&self) -> &[LocalFile] {
        &self.files
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Replaces the chosen files; an empty pick keeps the previous choice.
    pub fn choose(&mut self, files: Vec<LocalFile>) {
        if !files.is_empty() {
            self.files = files;
        }
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn selection(&self) -> Selection<'_> {
        match self.files.as_slice() {
            [] => Selection::Empty,
            [single] => Selection::Single(&single.name),
            several => Selection::Several(several.len()),
        }
    }

    /// All chosen names, one per line.
    pub fn tooltip(&self) -> String {
        self.files
            .iter()
            .map(|file| file.name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn dpi_text(&self) -> &str {
        &self.dpi_text
    }

    /// Accepts up to three digits; anything else is dropped.
    pub fn edit_dpi(&mut self, text: &str) {
        self.dpi_text = text
            .chars()
            .filter(char::is_ascii_digit)
            .take(MAX_DPI_DIGITS)
            .collect();
    }

    /// Entered resolution, never below the scanner minimum.
    pub fn dpi(&self) -> u32 {
        self.dpi_text
            .parse::<u32>()
            .unwrap_or(MIN_SCAN_DPI)
            .max(MIN_SCAN_DPI)
    }

    pub fn scan_params(&self, file: &DossierFile) -> ScanParams {
        ScanParams::new(&file.file_id, self.scan_color, self.dpi())
    }

    pub fn upload_request(&self, file: &DossierFile) -> UploadRequest {
        UploadRequest {
            file: file.clone(),
            files: self.files.clone(),
            merge: self.mode.is_merge(),
        }
    }
}
