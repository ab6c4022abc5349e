// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.
//!
//! Pointer, wheel and modifier events only reach the viewer while it holds
//! the viewport listeners. Keyboard and scroll input captured by a widget
//! (the page text field, the scrollable) is not forwarded again, except for
//! wheel events which the viewer needs for ctrl+wheel zoom.

use super::Message;
use crate::viewer;
use iced::{event, keyboard, mouse, time, Subscription};
use std::time::Duration;

fn route_viewport_event(
    event: event::Event,
    status: event::Status,
    _window: iced::window::Id,
) -> Option<Message> {
    let message = match event {
        event::Event::Mouse(mouse::Event::CursorMoved { position }) => {
            viewer::Message::CursorMoved(position)
        }
        event::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            viewer::Message::DragEnded
        }
        event::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
            viewer::Message::WheelScrolled(delta)
        }
        event::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            viewer::Message::ModifiersChanged(modifiers)
        }
        _ => return None,
    };
    if status == event::Status::Captured
        && !matches!(
            message,
            viewer::Message::WheelScrolled(_)
                | viewer::Message::DragEnded
                | viewer::Message::ModifiersChanged(_)
        )
    {
        return None;
    }
    Some(Message::Viewer(message))
}

/// Subscribes to viewport input while a viewer holds the listeners.
pub fn create_viewport_subscription(attached: bool) -> Subscription<Message> {
    if attached {
        event::listen_with(route_viewport_event)
    } else {
        Subscription::none()
    }
}

/// Creates a periodic tick subscription for notification auto-dismiss.
pub fn create_tick_subscription(has_notifications: bool) -> Subscription<Message> {
    if has_notifications {
        time::every(Duration::from_millis(100)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::Point;

    #[test]
    fn cursor_moves_reach_the_viewer_unless_captured() {
        let moved = event::Event::Mouse(mouse::Event::CursorMoved {
            position: Point::new(3.0, 4.0),
        });
        let window = iced::window::Id::unique();

        assert!(matches!(
            route_viewport_event(moved.clone(), event::Status::Ignored, window),
            Some(Message::Viewer(viewer::Message::CursorMoved(_)))
        ));
        assert!(route_viewport_event(moved, event::Status::Captured, window).is_none());
    }

    #[test]
    fn captured_wheel_still_reaches_the_viewer() {
        let wheel = event::Event::Mouse(mouse::Event::WheelScrolled {
            delta: mouse::ScrollDelta::Lines { x: 0.0, y: 1.0 },
        });
        assert!(matches!(
            route_viewport_event(wheel, event::Status::Captured, iced::window::Id::unique()),
            Some(Message::Viewer(viewer::Message::WheelScrolled(_)))
        ));
    }
}
