// SPDX-License-Identifier: MPL-2.0
//! Vertical page stacking and visible-page detection.

use super::rotation::RotationAngle;
use iced::Size;

/// Vertical gap between stacked pages.
pub const PAGE_SPACING: f32 = 8.0;

/// Vertical span of one page slot inside the scrolled content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageExtent {
    pub top: f32,
    pub height: f32,
}

impl PageExtent {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Size of the box a page occupies once scaled and rotated.
pub fn slot_size(natural: Size, scale: f32, rotation: RotationAngle) -> Size {
    let scaled = Size::new(natural.width * scale, natural.height * scale);
    if rotation.swaps_dimensions() {
        Size::new(scaled.height, scaled.width)
    } else {
        scaled
    }
}

/// Stacks slots top to bottom separated by `spacing`.
pub fn stack(slots: &[Size], spacing: f32) -> Vec<PageExtent> {
    let mut top = 0.0;
    slots
        .iter()
        .map(|slot| {
            let extent = PageExtent {
                top,
                height: slot.height,
            };
            top += slot.height + spacing;
            extent
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Visible {
    index: usize,
    percent: u32,
}

/// Returns the zero-based index of the page considered current, or `None`
/// when no page overlaps the view.
///
/// Pages are walked in order. The bottom of the first page reaching past the
/// view bottom bounds the walk; later pages starting below it are not
/// considered. The first visible page wins unless the next visible one shows
/// a strictly larger share of its height.
pub fn active_page(extents: &[PageExtent], view_top: f32, view_bottom: f32) -> Option<usize> {
    let mut visible: Vec<Visible> = Vec::with_capacity(2);
    let mut last_edge: Option<f32> = None;

    for (index, extent) in extents.iter().enumerate() {
        let top = extent.top;
        let bottom = extent.bottom();

        match last_edge {
            None if bottom >= view_bottom => last_edge = Some(bottom),
            Some(edge) if top > edge => break,
            _ => {}
        }

        if bottom <= view_top || top >= view_bottom || extent.height <= 0.0 {
            continue;
        }

        let hidden = (view_top - top).max(0.0) + (bottom - view_bottom).max(0.0);
        let percent = ((extent.height - hidden) * 100.0 / extent.height).floor() as u32;
        visible.push(Visible { index, percent });
    }

    let first = visible.first()?;
    match visible.get(1) {
        Some(second) if second.percent > first.percent => Some(first.index + 1),
        _ => Some(first.index),
    }
}

/// Scroll offset putting the top of `index` at the top of the view.
pub fn page_offset(extents: &[PageExtent], index: usize) -> Option<f32> {
    extents.get(index).map(|extent| extent.top)
}

/// Total height of the stacked content.
pub fn content_height(extents: &[PageExtent]) -> f32 {
    extents.last().map_or(0.0, PageExtent::bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    fn pages(heights: &[f32]) -> Vec<PageExtent> {
        let slots: Vec<Size> = heights.iter().map(|h| Size::new(100.0, *h)).collect();
        stack(&slots, 0.0)
    }

    #[test]
    fn stack_accumulates_spacing() {
        let extents = stack(&[Size::new(10.0, 100.0), Size::new(10.0, 50.0)], 8.0);
        assert_abs_diff_eq!(extents[1].top, 108.0);
        assert_abs_diff_eq!(content_height(&extents), 158.0);
    }

    #[test]
    fn rotated_slot_uses_scaled_width_as_height() {
        let slot = slot_size(Size::new(200.0, 100.0), 2.0, RotationAngle::new(90));
        assert_abs_diff_eq!(slot.height, 400.0);
        assert_abs_diff_eq!(slot.width, 200.0);
        let slot = slot_size(Size::new(200.0, 100.0), 2.0, RotationAngle::new(180));
        assert_abs_diff_eq!(slot.height, 200.0);
    }

    #[test]
    fn larger_second_page_wins() {
        // Page 1 shows 40%, page 2 shows 60% of a 500px view.
        let extents = pages(&[500.0, 500.0]);
        assert_eq!(active_page(&extents, 300.0, 800.0), Some(1));
    }

    #[test]
    fn first_page_kept_when_it_shows_more() {
        let extents = pages(&[500.0, 500.0]);
        assert_eq!(active_page(&extents, 100.0, 600.0), Some(0));
    }

    #[test]
    fn first_page_reaching_past_view_bottom_bounds_the_walk() {
        // Page 1 spans the whole view; page 2 starts below it.
        let extents = pages(&[1000.0, 500.0]);
        assert_eq!(active_page(&extents, 200.0, 700.0), Some(0));
    }

    #[test]
    fn equal_shares_keep_first_page() {
        let extents = pages(&[400.0, 400.0]);
        assert_eq!(active_page(&extents, 200.0, 600.0), Some(0));
    }

    #[test]
    fn nothing_visible_is_none() {
        let extents = pages(&[100.0]);
        assert_eq!(active_page(&extents, 200.0, 300.0), None);
        assert_eq!(active_page(&[], 0.0, 300.0), None);
    }

    #[test]
    fn page_offset_is_slot_top() {
        let extents = pages(&[100.0, 200.0, 300.0]);
        assert_eq!(page_offset(&extents, 2), Some(300.0));
        assert_eq!(page_offset(&extents, 3), None);
    }
}
