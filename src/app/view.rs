// SPDX-License-Identifier: MPL-2.0
//! View rendering for the application.
//!
//! Layout, left to right: file list or external picker, the file area with
//! its upload controls, and the optional info panel. Banners sit on top and
//! toasts float above everything.

use super::{App, Message};
use crate::dossier::DossierFile;
use crate::session::{ContainerState, FileSort, FileView};
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::notifications::Toast;
use crate::ui::{
    banners, controls, external_picker, file_list, info_panel, upload_form, viewer_pane,
};
use iced::{
    alignment::{Horizontal, Vertical},
    widget::{Column, Container, Row, Stack, Text},
    Element, Length,
};

/// Renders the whole window.
pub fn view(app: &App) -> Element<'_, Message> {
    let i18n = &app.i18n;

    let mut column = Column::new()
        .spacing(spacing::XS)
        .padding(spacing::XS)
        .push(banners::view(&app.session.banners(), i18n));
    if app.session.is_loading() {
        column = column.push(Text::new(i18n.tr("dossier-loading")).size(typography::BODY_SM));
    }

    let mut body = Row::new().spacing(spacing::XS).height(Length::Fill);
    if let Some(side) = side_pane(app) {
        body = body.push(side);
    }
    body = body.push(center(app));
    if app.info_open {
        if let Some(file) = app.session.selected_file() {
            body = body.push(
                info_panel::view(info_panel::ViewContext {
                    file,
                    client: &app.client,
                    i18n,
                })
                .map(Message::Info),
            );
        }
    }
    column = column.push(body);

    let content = Container::new(column)
        .width(Length::Fill)
        .height(Length::Fill);

    Stack::new()
        .push(content)
        .push(Toast::view_overlay(&app.notifications, i18n).map(Message::Notification))
        .into()
}

fn side_pane(app: &App) -> Option<Element<'_, Message>> {
    let i18n = &app.i18n;

    if app.external.is_open() {
        let files = app
            .session
            .external()
            .map(|listing| listing.files.as_slice())
            .unwrap_or_default();
        let allow_merge = app.session.selected_file().is_some_and(|file| file.exists);
        return Some(
            external_picker::view(external_picker::ViewContext {
                picker: &app.external,
                files,
                allow_merge,
                loading: app.session.action.loading,
                i18n,
            })
            .map(Message::External),
        );
    }

    let files = app.session.visible_files();
    if files.len() < 2 {
        return None;
    }
    Some(
        file_list::view(file_list::ViewContext {
            files,
            selected: app.session.selected_file().map(|file| file.code.as_str()),
            sort_by_name: app.session.sort() == FileSort::Name,
            i18n,
        })
        .map(Message::Files),
    )
}

fn center(app: &App) -> Element<'_, Message> {
    let mut column = Column::new()
        .spacing(spacing::XS)
        .width(Length::Fill)
        .height(Length::Fill);

    if let Some(file) = app.session.selected_file() {
        let show_form =
            app.session.can_upload(file) && !app.external.is_open() && !app.session.is_read_only();
        if show_form {
            let external_available = app
                .session
                .external()
                .is_some_and(|listing| !listing.files.is_empty());
            column = column.push(
                upload_form::view(upload_form::ViewContext {
                    form: &app.session.upload,
                    file,
                    loading: app.session.action.loading,
                    external_available,
                    scanner_available: app.scanner_available(),
                    i18n: &app.i18n,
                })
                .map(Message::Upload),
            );
        }
    }

    column.push(file_area(app)).into()
}

fn placeholder<'a>(text: String) -> Element<'a, Message> {
    Container::new(Text::new(text).size(typography::BODY))
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
}

fn displayed<'a>(app: &'a App) -> Option<&'a DossierFile> {
    if app.external.is_open() {
        let files = app.session.external()?.files.as_slice();
        return app.external.highlighted(files);
    }
    app.session.selected_file()
}

fn file_area(app: &App) -> Element<'_, Message> {
    let i18n = &app.i18n;
    let Some(file) = displayed(app) else {
        return Column::new().into();
    };

    match app.session.view_of(&app.client, file) {
        FileView::Missing => return placeholder(i18n.tr("viewer-missing")),
        FileView::Unrenderable => return placeholder(i18n.tr("viewer-unrenderable")),
        FileView::EmptyContainer => return placeholder(i18n.tr("viewer-empty-container")),
        FileView::Image { .. } | FileView::Paged { .. } => {}
    }

    match &app.viewer {
        Some(viewer) if viewer.identity() == file.identity() => Column::new()
            .spacing(spacing::XXS)
            .height(Length::Fill)
            .push(
                controls::view(controls::ViewContext {
                    viewer,
                    i18n,
                    info_open: app.info_open,
                })
                .map(Message::Controls),
            )
            .push(viewer_pane::view(viewer_pane::ViewContext { viewer, i18n }).map(Message::Viewer))
            .into(),
        _ => match app.session.container_for(&file.identity()) {
            Some(ContainerState::Failed(error)) => placeholder(
                i18n.tr_with_args("viewer-container-error", &[("error", &error.to_string())]),
            ),
            Some(ContainerState::Loading | ContainerState::Loaded(_)) | None => {
                placeholder(i18n.tr("viewer-loading"))
            }
        },
    }
}
