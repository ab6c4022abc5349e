// SPDX-License-Identifier: MPL-2.0
//! Wrapper around the page scrollable.
//!
//! While Ctrl is held the wheel belongs to zooming, so wheel events are kept
//! away from the scrollable. The pointer shows a grab hand over the pages and
//! a closed hand while a drag is in progress.

use iced::advanced::layout::{self, Layout};
use iced::advanced::mouse;
use iced::advanced::overlay;
use iced::advanced::renderer;
use iced::advanced::widget::{self, Widget};
use iced::advanced::{Clipboard, Shell};
use iced::{Element, Event, Length, Rectangle, Size};

pub struct PageViewport<'a, Message, Theme, Renderer> {
    content: Element<'a, Message, Theme, Renderer>,
    block_wheel: bool,
    dragging: bool,
}

impl<'a, Message, Theme, Renderer> PageViewport<'a, Message, Theme, Renderer> {
    pub fn new(content: impl Into<Element<'a, Message, Theme, Renderer>>) -> Self {
        Self {
            content: content.into(),
            block_wheel: false,
            dragging: false,
        }
    }

    /// Keeps wheel events from the content while `block` is set.
    #[must_use]
    pub fn block_wheel(mut self, block: bool) -> Self {
        self.block_wheel = block;
        self
    }

    #[must_use]
    pub fn dragging(mut self, dragging: bool) -> Self {
        self.dragging = dragging;
        self
    }
}

impl<Message, Theme, Renderer> Widget<Message, Theme, Renderer>
    for PageViewport<'_, Message, Theme, Renderer>
where
    Renderer: renderer::Renderer,
{
    fn size(&self) -> Size<Length> {
        self.content.as_widget().size()
    }

    fn layout(
        &mut self,
        tree: &mut widget::Tree,
        renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        self.content
            .as_widget_mut()
            .layout(&mut tree.children[0], renderer, limits)
    }

    fn children(&self) -> Vec<widget::Tree> {
        vec![widget::Tree::new(&self.content)]
    }

    fn diff(&self, tree: &mut widget::Tree) {
        tree.diff_children(&[&self.content]);
    }

    fn draw(
        &self,
        tree: &widget::Tree,
        renderer: &mut Renderer,
        theme: &Theme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        self.content.as_widget().draw(
            &tree.children[0],
            renderer,
            theme,
            style,
            layout,
            cursor,
            viewport,
        );
    }

    fn update(
        &mut self,
        tree: &mut widget::Tree,
        event: &Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &Renderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) {
        if blocks(self.block_wheel, event) {
            return;
        }

        self.content.as_widget_mut().update(
            &mut tree.children[0],
            event,
            layout,
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        );
    }

    fn mouse_interaction(
        &self,
        tree: &widget::Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &Renderer,
    ) -> mouse::Interaction {
        let inner = self.content.as_widget().mouse_interaction(
            &tree.children[0],
            layout,
            cursor,
            viewport,
            renderer,
        );
        if self.dragging {
            return mouse::Interaction::Grabbing;
        }
        match inner {
            // Scrollbars and controls keep their own pointer.
            mouse::Interaction::None | mouse::Interaction::Idle
                if cursor.is_over(layout.bounds()) =>
            {
                mouse::Interaction::Grab
            }
            other => other,
        }
    }

    fn operate(
        &mut self,
        tree: &mut widget::Tree,
        layout: Layout<'_>,
        renderer: &Renderer,
        operation: &mut dyn widget::Operation,
    ) {
        self.content
            .as_widget_mut()
            .operate(&mut tree.children[0], layout, renderer, operation);
    }

    fn overlay<'b>(
        &'b mut self,
        tree: &'b mut widget::Tree,
        layout: Layout<'b>,
        renderer: &Renderer,
        viewport: &Rectangle,
        translation: iced::Vector,
    ) -> Option<overlay::Element<'b, Message, Theme, Renderer>> {
        self.content.as_widget_mut().overlay(
            &mut tree.children[0],
            layout,
            renderer,
            viewport,
            translation,
        )
    }
}

impl<'a, Message, Theme, Renderer> From<PageViewport<'a, Message, Theme, Renderer>>
    for Element<'a, Message, Theme, Renderer>
where
    Message: 'a,
    Theme: 'a,
    Renderer: renderer::Renderer + 'a,
{
    fn from(wrapper: PageViewport<'a, Message, Theme, Renderer>) -> Self {
        Self::new(wrapper)
    }
}

pub fn page_viewport<'a, Message, Theme, Renderer>(
    content: impl Into<Element<'a, Message, Theme, Renderer>>,
) -> PageViewport<'a, Message, Theme, Renderer>
where
    Renderer: renderer::Renderer,
{
    PageViewport::new(content)
}

fn blocks(block_wheel: bool, event: &Event) -> bool {
    block_wheel && matches!(event, Event::Mouse(mouse::Event::WheelScrolled { .. }))
}
