// SPDX-License-Identifier: MPL-2.0
//! Grab-and-drag panning of the page view.

use iced::widget::scrollable::AbsoluteOffset;
use iced::Point;

/// Pointer position and scroll offset captured when a drag begins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragPan {
    origin: Option<(Point, AbsoluteOffset)>,
}

impl DragPan {
    pub fn begin(&mut self, position: Point, offset: AbsoluteOffset) {
        self.origin = Some((position, offset));
    }

    pub fn end(&mut self) {
        self.origin = None;
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Offset that keeps the content under the pointer, never negative.
    #[must_use]
    pub fn offset_at(&self, position: Point) -> Option<AbsoluteOffset> {
        let (start, offset) = self.origin?;
        Some(AbsoluteOffset {
            x: (offset.x - (position.x - start.x)).max(0.0),
            y: (offset.y - (position.y - start.y)).max(0.0),
        })
    }
}
