// SPDX-License-Identifier: MPL-2.0
//! Scrollable stack of page images.
//!
//! Each page occupies a slot sized by the viewer's geometry, so the scroll
//! offsets reported back through `on_scroll` match the extents the viewer uses
//! for current-page tracking and jumps.
//!
//! `on_scroll` only fires once the content overflows, so the viewport size
//! comes from a sensor around the scrollable instead. It reports on the first
//! layout and on every resize.

use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{palette, spacing, typography};
use crate::ui::styles;
use crate::ui::widgets::page_viewport;
use crate::viewer::layout::PAGE_SPACING;
use crate::viewer::rotation::RotationAngle;
use crate::viewer::{Message, PageImage, Viewer, SCROLLABLE_ID};
use iced::alignment::{Horizontal, Vertical};
use iced::widget::scrollable::{Direction, Scrollbar, Viewport};
use iced::widget::{image, mouse_area, sensor, text, Column, Container, Id, Scrollable, Text};
use iced::{ContentFit, Element, Length, Radians, Rotation, Size, Theme};

pub struct ViewContext<'a> {
    pub viewer: &'a Viewer,
    pub i18n: &'a I18n,
}

pub fn view(ctx: ViewContext<'_>) -> Element<'_, Message> {
    let viewer = ctx.viewer;

    let pages = viewer
        .pages()
        .iter()
        .zip(viewer.slot_sizes())
        .enumerate()
        .fold(
            Column::new().spacing(PAGE_SPACING),
            |column, (index, (page, slot))| {
                column.push(page_slot(page, slot, viewer.rotation(index), ctx.i18n))
            },
        );

    let scrollable = Scrollable::new(pages)
        .id(Id::new(SCROLLABLE_ID))
        .width(Length::Fill)
        .height(Length::Fill)
        .direction(Direction::Both {
            vertical: Scrollbar::default(),
            horizontal: Scrollbar::default(),
        })
        .on_scroll(|viewport: Viewport| Message::ViewportChanged {
            bounds: viewport.bounds().size(),
            offset: viewport.absolute_offset(),
        });

    let measured = sensor(scrollable).on_resize(Message::ContainerResized);

    let surface = page_viewport(mouse_area(measured).on_press(Message::DragStarted))
        .block_wheel(viewer.wheel_zooms())
        .dragging(viewer.is_dragging());

    Container::new(surface)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(styles::container::pages)
        .into()
}

fn page_slot<'a>(
    page: &'a PageImage,
    slot: Size,
    rotation: RotationAngle,
    i18n: &I18n,
) -> Element<'a, Message> {
    let content: Element<'a, Message> = match (&page.handle, &page.error) {
        (Some(handle), _) => image(handle.clone())
            .width(Length::Fixed(slot.width))
            .height(Length::Fixed(slot.height))
            .content_fit(ContentFit::Contain)
            .rotation(Rotation::Solid(Radians(rotation.radians())))
            .into(),
        (None, Some(_)) => Text::new(i18n.tr("viewer-page-error"))
            .size(typography::BODY)
            .style(|_theme: &Theme| text::Style {
                color: Some(palette::ERROR_500),
            })
            .into(),
        (None, None) => Text::new(i18n.tr("viewer-page-loading"))
            .size(typography::BODY)
            .into(),
    };

    Container::new(content)
        .width(Length::Fixed(slot.width))
        .height(Length::Fixed(slot.height))
        .padding(if page.handle.is_some() { 0.0 } else { spacing::MD })
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .into()
}
