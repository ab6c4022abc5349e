// SPDX-License-Identifier: MPL-2.0
//! Viewer toolbar: page navigation, zoom, scale selection and rotation.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{sizing, spacing, typography};
use crate::ui::styles;
use crate::viewer::rotation::RotateDirection;
use crate::viewer::zoom::{percent_label, ScaleMode};
use crate::viewer::{self, Viewer};
use iced::{
    alignment::Vertical,
    widget::{button, pick_list, text_input, Row, Space, Text},
    Element, Length,
};
use std::fmt;

pub struct ViewContext<'a> {
    pub viewer: &'a Viewer,
    pub i18n: &'a I18n,
    pub info_open: bool,
}

#[derive(Debug, Clone)]
pub enum Message {
    Viewer(viewer::Message),
    ToggleInfo,
}

/// Entry of the scale selector.
#[derive(Debug, Clone)]
pub struct ScaleChoice {
    pub mode: ScaleMode,
    label: String,
}

impl PartialEq for ScaleChoice {
    fn eq(&self, other: &Self) -> bool {
        self.mode == other.mode
    }
}

impl fmt::Display for ScaleChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl ScaleChoice {
    fn new(mode: ScaleMode, i18n: &I18n) -> Self {
        let label = match mode {
            ScaleMode::Actual => i18n.tr("viewer-scale-actual"),
            ScaleMode::FitWidth => i18n.tr("viewer-scale-fit-width"),
            ScaleMode::FitPage => i18n.tr("viewer-scale-fit-page"),
            ScaleMode::Rotated => i18n.tr("viewer-scale-fit-width"),
            ScaleMode::Factor(factor) => percent_label(factor),
        };
        Self { mode, label }
    }

    /// The entry shown for the current mode; free factors show the computed
    /// scale.
    fn current(viewer: &Viewer, i18n: &I18n) -> Self {
        match (viewer.scale_mode(), viewer.scale()) {
            (ScaleMode::Factor(_) | ScaleMode::Rotated, Some(scale)) => Self {
                mode: viewer.scale_mode(),
                label: percent_label(scale),
            },
            (mode, _) => Self::new(mode, i18n),
        }
    }
}

pub fn scale_choices(i18n: &I18n) -> Vec<ScaleChoice> {
    ScaleMode::options()
        .into_iter()
        .map(|mode| ScaleChoice::new(mode, i18n))
        .collect()
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let viewer = ctx.viewer;
    let i18n = ctx.i18n;
    let page = viewer.current_page();
    let count = viewer.page_count();

    let previous = button(Text::new("‹"))
        .on_press_maybe((page > 1).then_some(Message::Viewer(viewer::Message::PreviousPage)))
        .padding([spacing::XXS, spacing::XS]);
    let next = button(Text::new("›"))
        .on_press_maybe((page < count).then_some(Message::Viewer(viewer::Message::NextPage)))
        .padding([spacing::XXS, spacing::XS]);

    let page_input = text_input("", viewer.page_text())
        .on_input(|text| Message::Viewer(viewer::Message::PageTextChanged(text)))
        .on_submit(Message::Viewer(viewer::Message::PageTextSubmitted))
        .padding(spacing::XXS)
        .size(typography::BODY)
        .width(Length::Fixed(sizing::PAGE_INPUT_WIDTH));

    let page_total = Text::new(i18n.tr_with_args("viewer-page-of", &[("count", &count.to_string())]))
        .size(typography::BODY);

    let zoom_out = button(Text::new("−"))
        .on_press_maybe(
            viewer
                .can_zoom_out()
                .then_some(Message::Viewer(viewer::Message::ZoomOut)),
        )
        .padding([spacing::XXS, spacing::XS]);
    let zoom_in = button(Text::new("+"))
        .on_press_maybe(
            viewer
                .can_zoom_in()
                .then_some(Message::Viewer(viewer::Message::ZoomIn)),
        )
        .padding([spacing::XXS, spacing::XS]);

    let scale_picker = pick_list(
        scale_choices(i18n),
        Some(ScaleChoice::current(viewer, i18n)),
        |choice: ScaleChoice| Message::Viewer(viewer::Message::ScaleSelected(choice.mode)),
    )
    .padding(spacing::XXS)
    .text_size(typography::BODY)
    .width(Length::Fixed(sizing::SCALE_PICKER_WIDTH));

    let idle = viewer.rotating().is_none();
    let rotate = |glyph: &'static str, direction: RotateDirection| {
        button(Text::new(glyph))
            .on_press_maybe(idle.then_some(Message::Viewer(viewer::Message::Rotate(direction))))
            .padding([spacing::XXS, spacing::XS])
    };

    let info = button(Text::new(i18n.tr("viewer-info-button")).size(typography::BODY))
        .on_press(Message::ToggleInfo)
        .padding([spacing::XXS, spacing::XS])
        .style(styles::button::toggle(ctx.info_open));

    Row::new()
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
        .push(previous)
        .push(page_input)
        .push(page_total)
        .push(next)
        .push(Space::new().width(Length::Fixed(spacing::MD)))
        .push(zoom_out)
        .push(scale_picker)
        .push(zoom_in)
        .push(Space::new().width(Length::Fixed(spacing::MD)))
        .push(rotate("↺", RotateDirection::CounterClockwise))
        .push(rotate("↻", RotateDirection::Clockwise))
        .push(Space::new().width(Length::Fill))
        .push(info)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dossier::DossierFile;
    use crate::viewer::listeners::ListenerRegistry;
    use iced::Size;

    #[test]
    fn choices_list_fit_modes_before_presets() {
        let i18n = I18n::default();
        let choices = scale_choices(&i18n);
        assert_eq!(choices[0].mode, ScaleMode::Actual);
        assert_eq!(choices[1].mode, ScaleMode::FitWidth);
        assert_eq!(choices[2].mode, ScaleMode::FitPage);
        assert_eq!(choices[3].to_string(), "50%");
        assert_eq!(choices.last().map(ToString::to_string).as_deref(), Some("400%"));
    }

    #[test]
    fn controls_view_renders() {
        let i18n = I18n::default();
        let listeners = ListenerRegistry::new();
        let viewer = Viewer::mount(
            &listeners,
            &DossierFile::default(),
            vec!["https://svc/p1.png".into()],
            Some(Size::new(800.0, 600.0)),
            ScaleMode::FitWidth,
        );
        let _element = view(ViewContext {
            viewer: &viewer,
            i18n: &i18n,
            info_open: false,
        });
    }
}
