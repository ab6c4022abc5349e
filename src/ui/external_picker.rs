// SPDX-License-Identifier: MPL-2.0
//! List of files offered by the external dossier, with multi-select.
//!
//! The highlighted entry is previewed by the page viewer next to the list.

use crate::dossier::DossierFile;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use crate::upload::external::entry_key;
use crate::upload::{ExternalPicker, UploadMode};
use iced::{
    alignment::Vertical,
    widget::{button, checkbox, radio, scrollable, Column, Container, Row, Space, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub picker: &'a ExternalPicker,
    pub files: &'a [DossierFile],
    pub allow_merge: bool,
    pub loading: bool,
    pub i18n: &'a I18n,
}

#[derive(Debug, Clone)]
pub enum Message {
    Highlight(String),
    Toggle(String, bool),
    ModeSelected(UploadMode),
    Import,
    Close,
}

fn entry<'a>(picker: &ExternalPicker, file: &'a DossierFile, highlighted: bool) -> Row<'a, Message> {
    let key = entry_key(file).to_string();
    let number = picker
        .selection_number(file)
        .map_or_else(String::new, |n| n.to_string());

    let toggle_key = key.clone();
    let check = checkbox(picker.selection_number(file).is_some())
        .on_toggle(move |checked| Message::Toggle(toggle_key.clone(), checked));

    let name = button(Text::new(file.name.as_str()).size(typography::BODY))
        .on_press(Message::Highlight(key))
        .width(Length::Fill)
        .padding([spacing::XXS, spacing::XS])
        .style(styles::button::toggle(highlighted));

    Row::new()
        .spacing(spacing::XXS)
        .align_y(Vertical::Center)
        .push(check)
        .push(
            Container::new(Text::new(number).size(typography::CAPTION))
                .width(Length::Fixed(spacing::MD)),
        )
        .push(name)
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let picker = ctx.picker;
    let highlighted = picker.highlighted(ctx.files).map(entry_key);

    let list = ctx.files.iter().fold(
        Column::new().spacing(spacing::XXS),
        |column, file| column.push(entry(picker, file, highlighted == Some(entry_key(file)))),
    );

    let position = picker.highlighted_position(ctx.files).unwrap_or(0);
    let counter = Text::new(i18n.tr_with_args(
        "external-position",
        &[
            ("position", &position.to_string()),
            ("count", &ctx.files.len().to_string()),
        ],
    ))
    .size(typography::CAPTION);

    let mut modes = Row::new().spacing(spacing::SM).push(radio(
        i18n.tr("upload-mode-new"),
        UploadMode::New,
        Some(picker.mode),
        Message::ModeSelected,
    ));
    if ctx.allow_merge {
        modes = modes.push(radio(
            i18n.tr("upload-mode-merge"),
            UploadMode::Merge,
            Some(picker.mode),
            Message::ModeSelected,
        ));
    }

    let import_label = i18n.tr_with_args(
        "external-import-button",
        &[("count", &picker.selected_count().to_string())],
    );
    let actions = Row::new()
        .spacing(spacing::XS)
        .push(
            button(Text::new(import_label).size(typography::BODY))
                .on_press_maybe(picker.can_import(ctx.loading).then_some(Message::Import))
                .padding([spacing::XXS, spacing::SM])
                .style(styles::button::primary),
        )
        .push(Space::new().width(Length::Fill))
        .push(
            button(Text::new(i18n.tr("external-close-button")).size(typography::BODY))
                .on_press(Message::Close)
                .padding([spacing::XXS, spacing::SM]),
        );

    Container::new(
        Column::new()
            .spacing(spacing::XS)
            .push(Text::new(i18n.tr("external-title")).size(typography::TITLE_SM))
            .push(counter)
            .push(scrollable(list).height(Length::Fill))
            .push(modes)
            .push(actions),
    )
    .width(Length::Fixed(sizing::EXTERNAL_LIST_WIDTH))
    .height(Length::Fill)
    .padding(spacing::XS)
    .style(styles::container::panel)
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_picker_renders() {
        let i18n = I18n::default();
        let files = vec![
            DossierFile {
                name: "scan-1.pdf".into(),
                path: Some("/ext/scan-1.pdf".into()),
                external: true,
                ..DossierFile::default()
            },
            DossierFile {
                name: "scan-2.pdf".into(),
                path: Some("/ext/scan-2.pdf".into()),
                external: true,
                ..DossierFile::default()
            },
        ];
        let mut picker = ExternalPicker::default();
        picker.open(&files);
        picker.toggle(&files[1], true);

        let _element = view(ViewContext {
            picker: &picker,
            files: &files,
            allow_merge: false,
            loading: false,
            i18n: &i18n,
        });
    }
}
