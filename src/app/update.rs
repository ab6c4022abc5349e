// SPDX-License-Identifier: MPL-2.0
//! Update logic and message handlers for the application.
//!
//! Session and viewer state only change here. Every network call leaves as a
//! `Task` and comes back as a message carrying the ticket or identity it was
//! issued for, so stale answers can be dropped.

use super::{ActionKind, App, Message};
use crate::action::{ActionOutcome, ActionState, ActionWrapper};
use crate::dossier::{DossierClient, DossierFetch, DossierFile, FileIdentity};
use crate::error::Error;
use crate::session::{ContainerState, FileSort, FileView, LoadTicket};
use crate::transport::Response;
use crate::ui::notifications::Notification;
use crate::ui::{controls, external_picker, file_list, info_panel, upload_form};
use crate::upload::external::entry_key;
use crate::upload::{picker, NoScanner, ScanResult};
use crate::viewer::{self, Effect, LoadedPage, Viewer};
use iced::futures::channel::mpsc;
use iced::Task;
use std::future::Future;
use std::sync::Arc;

async fn load_page(client: DossierClient, src: String) -> Result<LoadedPage, Error> {
    let bytes = client.fetch_bytes(&src).await?;
    LoadedPage::measure(bytes)
}

impl App {
    pub(super) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DossierLoaded { ticket, fetch } => self.handle_dossier_loaded(&ticket, fetch),
            Message::ContainerLoaded { identity, result } => {
                if self.session.apply_container(&identity, result) {
                    self.sync_viewer()
                } else {
                    Task::none()
                }
            }
            Message::Viewer(message) | Message::Controls(controls::Message::Viewer(message)) => {
                self.handle_viewer_message(message)
            }
            Message::Controls(controls::Message::ToggleInfo) => {
                self.info_open = !self.info_open;
                Task::none()
            }
            Message::Files(message) => self.handle_file_list_message(message),
            Message::Upload(message) => self.handle_upload_message(message),
            Message::External(message) => self.handle_external_message(message),
            Message::Info(info_panel::Message::CopyLink(link)) => {
                self.notifications
                    .push(Notification::success("notification-link-copied"));
                iced::clipboard::write(link)
            }
            Message::Notification(message) => {
                self.notifications.handle_message(&message);
                Task::none()
            }
            Message::FilesPicked(files) => {
                if !files.is_empty() {
                    self.session.upload.choose(files);
                }
                Task::none()
            }
            Message::ScanFinished(result) => {
                self.handle_scan_finished(result);
                Task::none()
            }
            Message::ActionState(state) => {
                self.session.action = state;
                Task::none()
            }
            Message::ActionFinished {
                kind,
                code,
                ticket,
                error,
            } => self.handle_action_finished(kind, &code, &ticket, error),
            Message::Tick(_) => {
                self.notifications.tick();
                Task::none()
            }
        }
    }

    /// Fetches the dossier for the current parameters.
    pub(super) fn load_dossier(&mut self) -> Task<Message> {
        if !self.session.params().is_complete() {
            log::warn!("dossier parameters are incomplete, not loading");
            return Task::none();
        }
        let ticket = self.session.begin_load();
        let client = self.client.clone();
        Task::perform(
            async move {
                let fetch = client.fetch_dossier(ticket.params()).await;
                (ticket, fetch)
            },
            |(ticket, fetch)| Message::DossierLoaded { ticket, fetch },
        )
    }

    fn handle_dossier_loaded(&mut self, ticket: &LoadTicket, fetch: DossierFetch) -> Task<Message> {
        if !self.session.apply_load(ticket, fetch) {
            return Task::none();
        }
        let listing_empty = self
            .session
            .external()
            .is_none_or(|listing| listing.files.is_empty());
        if self.external.is_open() && listing_empty {
            self.external.close();
        }
        self.sync_viewer()
    }

    /// The file the viewer should show: the highlighted external entry while
    /// the picker is open, the selected dossier file otherwise.
    fn displayed_file(&self) -> Option<DossierFile> {
        if self.external.is_open() {
            return self.external.highlighted(self.external_files()).cloned();
        }
        self.session.selected_file().cloned()
    }

    fn external_files(&self) -> &[DossierFile] {
        self.session
            .external()
            .map(|listing| listing.files.as_slice())
            .unwrap_or_default()
    }

    fn external_file(&self, key: &str) -> Option<DossierFile> {
        self.external_files()
            .iter()
            .find(|file| entry_key(file) == key)
            .cloned()
    }

    /// Brings the viewer in line with the displayed file, mounting,
    /// switching or dropping it and starting the fetches it needs.
    pub(super) fn sync_viewer(&mut self) -> Task<Message> {
        let Some(file) = self.displayed_file() else {
            self.viewer = None;
            return Task::none();
        };

        match self.session.view_of(&self.client, &file) {
            FileView::Image { src } => self.show_pages(&file, vec![src]),
            FileView::Paged { .. } => match self.session.container_for(&file.identity()) {
                Some(ContainerState::Loaded(_)) => match self.session.page_sources(&file) {
                    Some(sources) => self.show_pages(&file, sources),
                    None => Task::none(),
                },
                Some(ContainerState::Loading) => {
                    if self
                        .viewer
                        .as_ref()
                        .is_some_and(|viewer| viewer.identity() != file.identity())
                    {
                        self.viewer = None;
                    }
                    Task::none()
                }
                Some(ContainerState::Failed(_)) => {
                    self.viewer = None;
                    Task::none()
                }
                None => {
                    self.viewer = None;
                    self.fetch_container(&file)
                }
            },
            FileView::Missing | FileView::EmptyContainer | FileView::Unrenderable => {
                self.viewer = None;
                Task::none()
            }
        }
    }

    fn fetch_container(&mut self, file: &DossierFile) -> Task<Message> {
        let identity = file.identity();
        self.session.begin_container(identity.clone());
        let client = self.client.clone();
        let file = file.clone();
        Task::perform(
            async move { client.fetch_container(&file).await },
            move |result| Message::ContainerLoaded { identity, result },
        )
    }

    fn show_pages(&mut self, file: &DossierFile, sources: Vec<String>) -> Task<Message> {
        let identity = file.identity();
        let scroll = match self.viewer.as_mut() {
            Some(viewer) => {
                let unchanged = viewer.identity() == identity
                    && viewer
                        .pages()
                        .iter()
                        .map(|page| page.src.as_str())
                        .eq(sources.iter().map(String::as_str));
                let scroll = viewer.show(file, sources.clone()).map(Message::Viewer);
                // Same version: the pages are already loading or loaded.
                if unchanged {
                    return scroll;
                }
                scroll
            }
            None => {
                self.viewer = Some(Viewer::mount(
                    &self.listeners,
                    file,
                    sources.clone(),
                    self.container_size,
                    self.config.viewer.initial_scale.into(),
                ));
                Task::none()
            }
        };
        Task::batch([scroll, self.fetch_pages(&identity, sources)])
    }

    /// Loads every page image, answering from the cache where possible.
    fn fetch_pages(&mut self, identity: &FileIdentity, sources: Vec<String>) -> Task<Message> {
        let mut tasks = Vec::with_capacity(sources.len());
        for (index, src) in sources.into_iter().enumerate() {
            let identity = identity.clone();
            if let Some(page) = self.page_cache.get(&src) {
                tasks.push(Task::done(Message::Viewer(viewer::Message::PageLoaded {
                    identity,
                    index,
                    result: Ok(page.clone()),
                })));
                continue;
            }
            tasks.push(Task::perform(
                load_page(self.client.clone(), src),
                move |result| {
                    Message::Viewer(viewer::Message::PageLoaded {
                        identity,
                        index,
                        result,
                    })
                },
            ));
        }
        Task::batch(tasks)
    }

    fn handle_viewer_message(&mut self, message: viewer::Message) -> Task<Message> {
        match &message {
            viewer::Message::ContainerResized(size)
            | viewer::Message::ViewportChanged { bounds: size, .. } => {
                self.container_size = Some(*size);
            }
            _ => {}
        }
        if let viewer::Message::PageLoaded {
            identity,
            index,
            result: Ok(page),
        } = &message
        {
            let src = self
                .viewer
                .as_ref()
                .filter(|viewer| viewer.identity() == *identity)
                .and_then(|viewer| viewer.pages().get(*index))
                .map(|slot| slot.src.clone());
            if let Some(src) = src {
                self.page_cache.put(src, page.clone());
            }
        }

        let Some(viewer) = self.viewer.as_mut() else {
            return Task::none();
        };
        let (effect, task) = viewer.handle(message);
        let task = task.map(Message::Viewer);

        match effect {
            Effect::None => task,
            Effect::PersistRotation { file, angle } => {
                let client = self.client.clone();
                let identity = file.identity();
                let save = Task::perform(
                    async move { client.save_rotation(&file, angle.degrees()).await },
                    move |result| Message::Viewer(viewer::Message::RotationSaved { identity, result }),
                );
                Task::batch([task, save])
            }
            Effect::ScaleFailed(error) => {
                log::error!("viewer scale rejected: {error}");
                self.notifications.push(Notification::from_error(&error));
                task
            }
        }
    }

    fn handle_file_list_message(&mut self, message: file_list::Message) -> Task<Message> {
        match message {
            file_list::Message::Select(code) => {
                if !self.session.select(&code) {
                    log::debug!("ignoring selection of unknown file {code}");
                    return Task::none();
                }
                self.external.close();
            }
            file_list::Message::SortByName(by_name) => {
                self.session.set_sort(if by_name {
                    FileSort::Name
                } else {
                    FileSort::Dossier
                });
            }
        }
        self.sync_viewer()
    }

    fn handle_upload_message(&mut self, message: upload_form::Message) -> Task<Message> {
        match message {
            upload_form::Message::PickFiles => {
                let Some(file) = self.session.selected_file().cloned() else {
                    return Task::none();
                };
                Task::perform(
                    picker::pick_files(file, self.i18n.tr("upload-dialog-title")),
                    Message::FilesPicked,
                )
            }
            upload_form::Message::ModeSelected(mode) => {
                self.session.upload.mode = mode;
                Task::none()
            }
            upload_form::Message::Submit => self.start_upload(),
            upload_form::Message::ScanColorSelected(color) => {
                self.session.upload.scan_color = color;
                Task::none()
            }
            upload_form::Message::DpiChanged(text) => {
                self.session.upload.edit_dpi(&text);
                Task::none()
            }
            upload_form::Message::Scan => {
                let Some(file) = self.session.selected_file() else {
                    return Task::none();
                };
                let params = self.session.upload.scan_params(file);
                let scanner = self
                    .scanner
                    .clone()
                    .filter(|scanner| scanner.is_available())
                    .unwrap_or_else(|| Arc::new(NoScanner));
                Task::perform(scanner.start(params), Message::ScanFinished)
            }
            upload_form::Message::OpenExternal => {
                let Some(listing) = self.session.external() else {
                    return Task::none();
                };
                self.external.open(&listing.files);
                self.sync_viewer()
            }
        }
    }

    fn handle_scan_finished(&mut self, result: Result<ScanResult, Error>) {
        match result {
            Ok(scan) => {
                log::info!("scanned {}", scan.file.name);
                self.session.upload.choose(vec![scan.file]);
            }
            Err(error) => {
                log::warn!("scan failed: {error}");
                self.notifications.push(Notification::from_error(&error));
            }
        }
    }

    fn start_upload(&mut self) -> Task<Message> {
        let Some(file) = self.session.selected_file().cloned() else {
            return Task::none();
        };
        if self.session.action.loading
            || !self.session.can_upload(&file)
            || !self.session.upload.has_files()
        {
            return Task::none();
        }
        let request = self.session.upload.upload_request(&file);
        let client = self.client.clone();
        self.run_action(ActionKind::Upload, file.code, async move {
            client.upload_files(request).await
        })
    }

    fn handle_external_message(&mut self, message: external_picker::Message) -> Task<Message> {
        match message {
            external_picker::Message::Highlight(key) => {
                if let Some(file) = self.external_file(&key) {
                    self.external.highlight(&file);
                }
                self.sync_viewer()
            }
            external_picker::Message::Toggle(key, checked) => {
                if let Some(file) = self.external_file(&key) {
                    self.external.toggle(&file, checked);
                }
                self.sync_viewer()
            }
            external_picker::Message::ModeSelected(mode) => {
                self.external.mode = mode;
                Task::none()
            }
            external_picker::Message::Import => self.start_import(),
            external_picker::Message::Close => {
                self.external.close();
                self.sync_viewer()
            }
        }
    }

    fn start_import(&mut self) -> Task<Message> {
        let Some(target) = self.session.selected_file().cloned() else {
            return Task::none();
        };
        if !self.external.can_import(self.session.action.loading) {
            return Task::none();
        }
        let Some(request) = self.external.import_request(&target, self.external_files()) else {
            log::warn!("none of the checked external files has a download link");
            return Task::none();
        };
        let client = self.client.clone();
        self.run_action(ActionKind::Import, target.code, async move {
            client.import_from_urls(request).await
        })
    }

    /// Runs `action` through an [`ActionWrapper`] whose refresh re-fetches the
    /// dossier. State updates, the refreshed dossier and the final outcome all
    /// arrive as messages, in that order.
    fn run_action<F>(&mut self, kind: ActionKind, code: String, action: F) -> Task<Message>
    where
        F: Future<Output = Response> + Send + 'static,
    {
        let ticket = self.session.begin_load();
        let (sender, receiver) = mpsc::unbounded::<Message>();

        let refresh_client = self.client.clone();
        let refresh_sender = sender.clone();
        let refresh_ticket = ticket.clone();
        let wrapper = ActionWrapper::new(kind.description_key()).with_refresh(move || {
            let client = refresh_client.clone();
            let sender = refresh_sender.clone();
            let ticket = refresh_ticket.clone();
            async move {
                let fetch = client.fetch_dossier(ticket.params()).await;
                let _ = sender.unbounded_send(Message::DossierLoaded { ticket, fetch });
            }
        });

        let state_sender = sender.clone();
        let sink = move |state: ActionState| {
            let _ = state_sender.unbounded_send(Message::ActionState(state));
        };

        let work = async move {
            let outcome = wrapper.run(&sink, action).await;
            let _ = sender.unbounded_send(Message::ActionFinished {
                kind,
                code,
                ticket,
                error: outcome.error_message(),
            });
        };

        Task::batch([Task::stream(receiver), Task::future(work).discard()])
    }

    fn handle_action_finished(
        &mut self,
        kind: ActionKind,
        code: &str,
        ticket: &LoadTicket,
        error: Option<String>,
    ) -> Task<Message> {
        if let Some(error) = error {
            log::warn!("{} failed: {error}", kind.description_key());
            self.session.abandon_load(ticket);
            return Task::none();
        }

        match kind {
            ActionKind::Upload => self.session.upload.clear(),
            ActionKind::Import => self.external.close(),
        }
        self.session.select(code);
        self.notifications
            .push(Notification::success(kind.success_key()));
        self.notifications.clear_prefixed("error-");
        self.sync_viewer()
    }
}
