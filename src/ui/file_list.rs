// SPDX-License-Identifier: MPL-2.0
//! Selector for the visible files of the dossier.

use crate::dossier::DossierFile;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use iced::{
    widget::{button, checkbox, scrollable, Column, Container, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub files: Vec<&'a DossierFile>,
    pub selected: Option<&'a str>,
    pub sort_by_name: bool,
    pub i18n: &'a I18n,
}

#[derive(Debug, Clone)]
pub enum Message {
    Select(String),
    SortByName(bool),
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;

    let entries = ctx.files.iter().fold(
        Column::new().spacing(spacing::XXS),
        |column, file| {
            let label = if file.exists {
                file.name.clone()
            } else {
                i18n.tr_with_args("files-not-uploaded", &[("name", file.name.as_str())])
            };
            let is_selected = ctx.selected == Some(file.code.as_str());
            column.push(
                button(Text::new(label).size(typography::BODY))
                    .on_press(Message::Select(file.code.clone()))
                    .width(Length::Fill)
                    .padding([spacing::XXS, spacing::XS])
                    .style(styles::button::toggle(is_selected)),
            )
        },
    );

    let sort = checkbox(ctx.sort_by_name)
        .label(i18n.tr("files-sort-by-name"))
        .on_toggle(Message::SortByName)
        .text_size(typography::BODY_SM);

    Container::new(
        Column::new()
            .spacing(spacing::XS)
            .push(Text::new(i18n.tr("files-title")).size(typography::TITLE_SM))
            .push(sort)
            .push(scrollable(entries).height(Length::Fill)),
    )
    .width(Length::Fixed(sizing::FILE_LIST_WIDTH))
    .height(Length::Fill)
    .padding(spacing::XS)
    .style(styles::container::panel)
    .into()
}
