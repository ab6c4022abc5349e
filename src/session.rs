// SPDX-License-Identifier: MPL-2.0
//! Dossier session state: the loaded snapshot, the file selection and the
//! status of user actions.
//!
//! The session owns no I/O. The application starts fetches with a
//! [`LoadTicket`] and hands results back; results for an older generation or
//! different parameters are dropped.

use crate::action::ActionState;
use crate::dossier::client::inline_src;
use crate::dossier::url::page_src;
use crate::dossier::{
    ContainerIndex, Dossier, DossierClient, DossierFetch, DossierFile, DossierParams,
    ExternalListing, FileIdentity, FileKind, Rel,
};
use crate::error::Error;
use crate::upload::form::UploadForm;

/// Which dossier files are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilesFilter {
    /// Every file that is not hidden.
    #[default]
    All,
    /// Only the file with this code, hidden or not.
    Code(String),
    /// Only files whose code is in the list, hidden or not.
    Codes(Vec<String>),
}

impl FilesFilter {
    /// Builds a filter from a comma-separated list of codes.
    pub fn from_codes(list: &str) -> Self {
        let mut codes: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(String::from)
            .collect();
        match codes.len() {
            0 => FilesFilter::All,
            1 => FilesFilter::Code(codes.remove(0)),
            _ => FilesFilter::Codes(codes),
        }
    }

    pub fn admits(&self, file: &DossierFile) -> bool {
        match self {
            FilesFilter::All => !file.hidden,
            FilesFilter::Code(code) => file.code == *code,
            FilesFilter::Codes(codes) => codes.contains(&file.code),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileSort {
    #[default]
    Dossier,
    Name,
}

/// Proof that a fetch was started for some parameters and generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    params: DossierParams,
}

impl LoadTicket {
    pub fn params(&self) -> &DossierParams {
        &self.params
    }
}

/// How the selected file is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileView {
    /// No version of the file has been uploaded yet.
    Missing,
    Image { src: String },
    /// Page images listed by the container index at `container`.
    Paged { container: String },
    /// The container index lists no pages.
    EmptyContainer,
    Unrenderable,
}

/// Page index of the displayed file, keyed by the version it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerState {
    Loading,
    Loaded(ContainerIndex),
    Failed(Error),
}

/// Messages shown above the file area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    MissingParams,
    DossierError(String),
    ExternalError(String),
    ActionError {
        description: Option<String>,
        message: String,
    },
    NoFiles,
}

#[derive(Debug, Default)]
pub struct DossierSession {
    params: DossierParams,
    generation: u64,
    loading: bool,
    dossier: Option<Dossier>,
    external: Option<ExternalListing>,
    error: Option<Error>,
    pub action: ActionState,
    pub upload: UploadForm,
    selected: Option<String>,
    container: Option<(FileIdentity, ContainerState)>,
    filter: FilesFilter,
    sort: FileSort,
    read_only: bool,
}

impl DossierSession {
    pub fn new(params: DossierParams, filter: FilesFilter, read_only: bool) -> Self {
        Self {
            params,
            filter,
            read_only,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &DossierParams {
        &self.params
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn dossier(&self) -> Option<&Dossier> {
        self.dossier.as_ref()
    }

    pub fn external(&self) -> Option<&ExternalListing> {
        self.external.as_ref()
    }

    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn sort(&self) -> FileSort {
        self.sort
    }

    pub fn set_sort(&mut self, sort: FileSort) {
        self.sort = sort;
    }

    pub fn set_filter(&mut self, filter: FilesFilter) {
        self.filter = filter;
    }

    /// Replaces the parameters; returns `true` when they differ and a reload
    /// is needed.
    ///
    /// The desktop window takes its parameters from the command line once, so
    /// only code driving a session directly retargets it this way. Tickets
    /// issued for the old parameters are rejected by [`Self::apply_load`].
    pub fn set_params(&mut self, params: DossierParams) -> bool {
        if params == self.params {
            return false;
        }
        self.params = params;
        true
    }

    /// Starts a new fetch, invalidating every ticket issued before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
            params: self.params.clone(),
        }
    }

    /// Gives up on a fetch that will never be applied.
    pub fn abandon_load(&mut self, ticket: &LoadTicket) {
        if ticket.generation == self.generation {
            self.loading = false;
        }
    }

    /// Stores a fetch result. Returns `false` and keeps the current snapshot
    /// when the ticket is stale.
    pub fn apply_load(&mut self, ticket: &LoadTicket, fetch: DossierFetch) -> bool {
        if ticket.generation != self.generation || ticket.params != self.params {
            log::debug!(
                "dropping stale dossier load {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        self.error = fetch.error;
        if fetch.dossier.is_some() || self.error.is_some() {
            self.dossier = fetch.dossier;
        }
        self.external = fetch.external;
        self.ensure_selection();
        true
    }

    /// Files shown to the user after filtering and sorting.
    pub fn visible_files(&self) -> Vec<&DossierFile> {
        let Some(dossier) = &self.dossier else {
            return Vec::new();
        };
        let mut files: Vec<&DossierFile> = dossier
            .dossier_file
            .iter()
            .filter(|file| self.filter.admits(file))
            .collect();
        if self.sort == FileSort::Name {
            files.sort_by(|a, b| a.name.cmp(&b.name));
        }
        files
    }

    /// The selected file, falling back to the first visible one.
    pub fn selected_file(&self) -> Option<&DossierFile> {
        let files = self.visible_files();
        self.selected
            .as_deref()
            .and_then(|code| files.iter().find(|file| file.code == code).copied())
            .or_else(|| files.first().copied())
    }

    /// Selects a file by code; unknown codes are ignored.
    pub fn select(&mut self, code: &str) -> bool {
        if !self.visible_files().iter().any(|file| file.code == code) {
            return false;
        }
        if self.selected.as_deref() != Some(code) {
            self.selected = Some(code.to_string());
            self.upload.clear();
        }
        true
    }

    fn ensure_selection(&mut self) {
        let code = self.selected_file().map(|file| file.code.clone());
        self.selected = code;
    }

    /// Decides how `file` is rendered.
    pub fn view_of(&self, client: &DossierClient, file: &DossierFile) -> FileView {
        if !file.exists {
            return FileView::Missing;
        }
        if let Some(container) = file.link(&Rel::PdfContainer) {
            return match self.container_for(&file.identity()) {
                Some(ContainerState::Loaded(index)) if index.pages.is_empty() => {
                    FileView::EmptyContainer
                }
                Some(ContainerState::Loaded(_) | ContainerState::Loading | ContainerState::Failed(_))
                | None => FileView::Paged {
                    container: container.to_string(),
                },
            };
        }
        match file.kind {
            FileKind::Image => match inline_src(client, file) {
                Some(src) => FileView::Image { src },
                None => FileView::Unrenderable,
            },
            FileKind::Pdf | FileKind::Unknown => FileView::Unrenderable,
        }
    }

    /// Marks the container of `identity` as being fetched, forgetting any
    /// index of another version.
    pub fn begin_container(&mut self, identity: FileIdentity) {
        self.container = Some((identity, ContainerState::Loading));
    }

    /// Stores a container result if it still belongs to the displayed version.
    pub fn apply_container(
        &mut self,
        identity: &FileIdentity,
        result: Result<ContainerIndex, Error>,
    ) -> bool {
        match &self.container {
            Some((current, _)) if current == identity => {
                let state = match result {
                    Ok(index) => ContainerState::Loaded(index),
                    Err(error) => {
                        log::warn!("container of {} failed: {error}", identity.file_id);
                        ContainerState::Failed(error)
                    }
                };
                self.container = Some((identity.clone(), state));
                true
            }
            _ => {
                log::debug!("dropping stale container of {}", identity.file_id);
                false
            }
        }
    }

    pub fn container_for(&self, identity: &FileIdentity) -> Option<&ContainerState> {
        self.container
            .as_ref()
            .filter(|(current, _)| current == identity)
            .map(|(_, state)| state)
    }

    /// Page image sources of the selected file once its index has arrived.
    pub fn page_sources(&self, file: &DossierFile) -> Option<Vec<String>> {
        match self.container_for(&file.identity())? {
            ContainerState::Loaded(index) => Some(
                index
                    .pages
                    .iter()
                    .map(|page| page_src(&index.url, &page.name, file.last_modified.as_deref()))
                    .collect(),
            ),
            ContainerState::Loading | ContainerState::Failed(_) => None,
        }
    }

    /// Upload controls are offered unless the file or the session is read-only.
    pub fn can_upload(&self, file: &DossierFile) -> bool {
        !(file.readonly || self.read_only)
    }

    pub fn banners(&self) -> Vec<Banner> {
        let mut banners = Vec::new();
        if !self.params.is_complete() {
            banners.push(Banner::MissingParams);
        }
        if let Some(error) = &self.error {
            banners.push(Banner::DossierError(error.to_string()));
        }
        if let Some(error) = self.external.as_ref().and_then(|ext| ext.error.as_ref()) {
            banners.push(Banner::ExternalError(error.to_string()));
        }
        if let Some(message) = &self.action.error {
            banners.push(Banner::ActionError {
                description: self.action.description.clone(),
                message: message.clone(),
            });
        }
        if self.dossier.is_some() && self.visible_files().is_empty() {
            banners.push(Banner::NoFiles);
        }
        banners
    }
}
