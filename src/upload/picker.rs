// SPDX-License-Identifier: MPL-2.0
//! Native file picker for local uploads.

use crate::dossier::{DossierFile, LocalFile};

/// File extensions matching an `accept` list of media types and `.ext` entries.
pub fn accept_extensions(accept: &str) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for entry in accept.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let found: Vec<String> = match entry.strip_prefix('.') {
            Some(ext) => vec![ext.to_ascii_lowercase()],
            None => mime_guess::get_mime_extensions_str(entry)
                .map(|exts| exts.iter().map(|ext| (*ext).to_string()).collect())
                .unwrap_or_default(),
        };
        for ext in found {
            if !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
    }
    extensions
}

/// Opens the picker for `file` and reads the chosen files.
///
/// Returns an empty list when the dialog is cancelled.
pub async fn pick_files(file: DossierFile, title: String) -> Vec<LocalFile> {
    let mut dialog = rfd::AsyncFileDialog::new().set_title(&title);
    if let Some(accept) = file.accept.as_deref() {
        let extensions = accept_extensions(accept);
        if !extensions.is_empty() {
            dialog = dialog.add_filter(&file.name, &extensions);
        }
    }

    let handles = if file.allowed_multiple {
        dialog.pick_files().await.unwrap_or_default()
    } else {
        dialog.pick_file().await.into_iter().collect()
    };

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        let bytes = handle.read().await;
        files.push(LocalFile::from_name(handle.file_name(), bytes));
    }
    files
}
