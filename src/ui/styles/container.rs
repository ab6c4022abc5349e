// SPDX-License-Identifier: MPL-2.0
//! Container styles.

use crate::ui::design_tokens::{border, opacity, radius};
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

/// Side panels and dialogs, derived from the theme background.
pub fn panel(theme: &Theme) -> container::Style {
    let base = theme.extended_palette().background.base.color;

    container::Style {
        background: Some(Background::Color(Color {
            a: opacity::SURFACE,
            ..base
        })),
        border: Border {
            radius: radius::LG.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Backdrop behind the page images.
pub fn pages(theme: &Theme) -> container::Style {
    let weak = theme.extended_palette().background.weak.color;
    container::Style {
        background: Some(Background::Color(weak)),
        ..Default::default()
    }
}

/// Message strip with a colored accent.
pub fn banner(accent: Color) -> impl Fn(&Theme) -> container::Style {
    move |theme: &Theme| container::Style {
        background: Some(Background::Color(Color {
            a: opacity::OVERLAY_SUBTLE,
            ..accent
        })),
        border: Border {
            color: accent,
            width: border::WIDTH_SM,
            radius: radius::SM.into(),
        },
        text_color: Some(theme.palette().text),
        ..Default::default()
    }
}
