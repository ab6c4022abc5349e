// SPDX-License-Identifier: MPL-2.0
//! Details of the displayed file: name, upload time and download link.

use crate::dossier::client::download_link;
use crate::dossier::{DossierClient, DossierFile};
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use chrono::{DateTime, Local};
use iced::{
    widget::{button, Column, Container, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub file: &'a DossierFile,
    pub client: &'a DossierClient,
    pub i18n: &'a I18n,
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Copy the resolved download link to the clipboard.
    CopyLink(String),
}

/// Renders an RFC 3339 timestamp in local time, or returns it unchanged.
pub fn format_uploaded(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

fn field<'a>(label: String, value: String) -> Column<'a, Message> {
    Column::new()
        .spacing(spacing::XXS)
        .push(Text::new(label).size(typography::CAPTION))
        .push(Text::new(value).size(typography::BODY))
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let file = ctx.file;

    let uploaded = file
        .last_modified
        .as_deref()
        .map_or_else(|| i18n.tr("info-not-uploaded"), format_uploaded);

    let mut column = Column::new()
        .spacing(spacing::SM)
        .push(Text::new(i18n.tr("info-title")).size(typography::TITLE_SM))
        .push(field(i18n.tr("info-name"), file.name.clone()))
        .push(field(i18n.tr("info-uploaded"), uploaded));

    if let Some(media_type) = &file.media_type {
        column = column.push(field(i18n.tr("info-media-type"), media_type.clone()));
    }

    if let Some(resolved) = download_link(ctx.client, file) {
        column = column.push(
            button(Text::new(i18n.tr("info-copy-link")).size(typography::BODY))
                .on_press(Message::CopyLink(resolved))
                .padding([spacing::XXS, spacing::SM]),
        );
    }

    Container::new(column)
        .width(Length::Fixed(sizing::INFO_PANEL_WIDTH))
        .height(Length::Fill)
        .padding(spacing::SM)
        .style(styles::container::panel)
        .into()
}
