// SPDX-License-Identifier: MPL-2.0
//! Upload controls of the selected file slot.

use crate::dossier::DossierFile;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use crate::upload::{ScanColor, Selection, UploadForm, UploadMode};
use iced::{
    alignment::Vertical,
    widget::{button, container, radio, text_input, tooltip, Column, Row, Text},
    Element, Length,
};

pub struct ViewContext<'a> {
    pub form: &'a UploadForm,
    pub file: &'a DossierFile,
    pub loading: bool,
    pub external_available: bool,
    /// Scan controls are only offered when the bridge can run.
    pub scanner_available: bool,
    pub i18n: &'a I18n,
}

impl ViewContext<'_> {
    fn can_scan(&self) -> bool {
        self.scanner_available && !self.loading
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    PickFiles,
    ModeSelected(UploadMode),
    Submit,
    ScanColorSelected(ScanColor),
    DpiChanged(String),
    Scan,
    OpenExternal,
}

fn selection_label(form: &UploadForm, i18n: &I18n) -> String {
    match form.selection() {
        Selection::Empty => i18n.tr("upload-no-files"),
        Selection::Single(name) => name.to_string(),
        Selection::Several(count) => {
            i18n.tr_with_args("upload-files-selected", &[("count", &count.to_string())])
        }
    }
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let i18n = ctx.i18n;
    let form = ctx.form;

    let pick = button(Text::new(i18n.tr("upload-choose-files")).size(typography::BODY))
        .on_press_maybe((!ctx.loading).then_some(Message::PickFiles))
        .padding([spacing::XXS, spacing::SM]);

    let chosen: Element<'_, Message> = {
        let label = Text::new(selection_label(form, i18n)).size(typography::BODY_SM);
        if form.has_files() {
            tooltip(
                label,
                container(Text::new(form.tooltip()).size(typography::CAPTION))
                    .padding(spacing::XS)
                    .style(container::rounded_box),
                tooltip::Position::Bottom,
            )
            .gap(spacing::XXS)
            .into()
        } else {
            label.into()
        }
    };

    let mut modes = Row::new()
        .spacing(spacing::SM)
        .push(radio(
            i18n.tr("upload-mode-new"),
            UploadMode::New,
            Some(form.mode),
            Message::ModeSelected,
        ));
    // Merging needs a version to merge into.
    if ctx.file.exists {
        modes = modes.push(radio(
            i18n.tr("upload-mode-merge"),
            UploadMode::Merge,
            Some(form.mode),
            Message::ModeSelected,
        ));
    }

    let submit = button(Text::new(i18n.tr("upload-button")).size(typography::BODY))
        .on_press_maybe((form.has_files() && !ctx.loading).then_some(Message::Submit))
        .padding([spacing::XXS, spacing::SM])
        .style(styles::button::primary);

    let mut column = Column::new()
        .spacing(spacing::XS)
        .push(
            Row::new()
                .spacing(spacing::XS)
                .align_y(Vertical::Center)
                .push(pick)
                .push(chosen),
        )
        .push(modes)
        .push(submit);

    if ctx.scanner_available {
        column = column.push(scan_row(form, ctx.can_scan(), i18n));
    }

    if ctx.external_available {
        column = column.push(
            button(Text::new(i18n.tr("upload-from-external")).size(typography::BODY))
                .on_press_maybe((!ctx.loading).then_some(Message::OpenExternal))
                .padding([spacing::XXS, spacing::SM]),
        );
    }

    column.into()
}

fn scan_row<'a>(form: &'a UploadForm, can_scan: bool, i18n: &'a I18n) -> Element<'a, Message> {
    let colors = Row::new()
        .spacing(spacing::SM)
        .push(radio(
            i18n.tr("scan-color"),
            ScanColor::Color,
            Some(form.scan_color),
            Message::ScanColorSelected,
        ))
        .push(radio(
            i18n.tr("scan-black-white"),
            ScanColor::BlackWhite,
            Some(form.scan_color),
            Message::ScanColorSelected,
        ));

    let dpi = text_input("", form.dpi_text())
        .on_input(Message::DpiChanged)
        .padding(spacing::XXS)
        .size(typography::BODY)
        .width(Length::Fixed(sizing::PAGE_INPUT_WIDTH));

    let scan = button(Text::new(i18n.tr("scan-button")).size(typography::BODY))
        .on_press_maybe(can_scan.then_some(Message::Scan))
        .padding([spacing::XXS, spacing::SM]);

    Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(colors)
        .push(Text::new(i18n.tr("scan-dpi")).size(typography::BODY_SM))
        .push(dpi)
        .push(scan)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dossier::LocalFile;

    #[test]
    fn selection_label_counts_several_files() {
        let i18n = I18n::new(Some("en-US".into()), &crate::config::Config::default());
        let mut form = UploadForm::default();
        assert_eq!(selection_label(&form, &i18n), i18n.tr("upload-no-files"));

        form.choose(vec![LocalFile::from_name("a.pdf", vec![1])]);
        assert_eq!(selection_label(&form, &i18n), "a.pdf");

        form.choose(vec![
            LocalFile::from_name("a.pdf", vec![1]),
            LocalFile::from_name("b.pdf", vec![2]),
            LocalFile::from_name("c.pdf", vec![3]),
        ]);
        assert_eq!(selection_label(&form, &i18n), "3 files selected");
    }

    #[test]
    fn upload_form_renders() {
        let i18n = I18n::default();
        let form = UploadForm::default();
        let file = DossierFile {
            exists: true,
            ..DossierFile::default()
        };
        let _element = view(ViewContext {
            form: &form,
            file: &file,
            loading: false,
            external_available: true,
            scanner_available: true,
            i18n: &i18n,
        });
    }

    #[test]
    fn scanning_needs_an_available_idle_bridge() {
        let i18n = I18n::default();
        let form = UploadForm::default();
        let file = DossierFile::default();
        let ctx = |scanner_available, loading| ViewContext {
            form: &form,
            file: &file,
            loading,
            external_available: false,
            scanner_available,
            i18n: &i18n,
        };

        assert!(ctx(true, false).can_scan());
        assert!(!ctx(true, true).can_scan());
        assert!(!ctx(false, false).can_scan());
        let _element = view(ctx(false, false));
    }
}
