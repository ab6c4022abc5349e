// SPDX-License-Identifier: MPL-2.0
//! Inline messages shown above the file area.

use crate::i18n::fluent::I18n;
use crate::session::Banner;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use iced::widget::{Column, Container, Text};
use iced::{Color, Element, Length};

fn text_of(banner: &Banner, i18n: &I18n) -> (String, Color) {
    match banner {
        Banner::MissingParams => (i18n.tr("banner-missing-params"), palette::WARNING_500),
        Banner::DossierError(message) => (
            i18n.tr_with_args("banner-dossier-error", &[("error", message)]),
            palette::ERROR_500,
        ),
        Banner::ExternalError(message) => (
            i18n.tr_with_args("banner-external-error", &[("error", message)]),
            palette::ERROR_500,
        ),
        Banner::ActionError {
            description: Some(description),
            message,
        } => (
            i18n.tr_with_args(
                "banner-action-error",
                &[("action", &i18n.tr(description)), ("error", message)],
            ),
            palette::ERROR_500,
        ),
        Banner::ActionError {
            description: None,
            message,
        } => (message.clone(), palette::ERROR_500),
        Banner::NoFiles => (i18n.tr("banner-no-files"), palette::INFO_500),
    }
}

pub fn view<'a, M: 'a>(banners: &[Banner], i18n: &I18n) -> Element<'a, M> {
    banners
        .iter()
        .fold(Column::new().spacing(spacing::XXS), |column, banner| {
            let (message, accent) = text_of(banner, i18n);
            column.push(
                Container::new(Text::new(message).size(typography::BODY))
                    .width(Length::Fill)
                    .padding([spacing::XS, spacing::SM])
                    .style(styles::container::banner(accent)),
            )
        })
        .into()
}
