// SPDX-License-Identifier: MPL-2.0
//! Page viewer controller.
//!
//! Keeps the current page, the scale and the per-page rotation of one
//! displayed file consistent while the user scrolls, drags, zooms, jumps to a
//! page or rotates, and while page images arrive asynchronously.
//!
//! The viewer computes its own page geometry from the natural page sizes and
//! the container size reported by a size sensor around the scrollable, so
//! every transition can be checked without a renderer.

pub mod drag;
pub mod layout;
pub mod listeners;
pub mod page_input;
pub mod rotation;
pub mod zoom;

use crate::config::{MAX_SCALE, MIN_SCALE, SCROLLBAR_ALLOWANCE};
use crate::dossier::{DossierFile, FileIdentity};
use crate::error::Error;
use drag::DragPan;
use iced::widget::image;
use iced::widget::scrollable::{AbsoluteOffset, RelativeOffset};
use iced::widget::{operation, Id};
use iced::{keyboard, mouse, Point, Size, Task};
use layout::{PageExtent, PAGE_SPACING};
use listeners::{ListenerGuard, ListenerRegistry};
use page_input::{PageCommit, PageInput};
use rotation::{PageRotations, RotateDirection, RotationAngle};
use zoom::ScaleMode;

/// Identifier of the page scrollable.
pub const SCROLLABLE_ID: &str = "dossier-page-scrollable";

/// Width-to-height ratio assumed for pages whose image has not arrived yet.
const PLACEHOLDER_ASPECT: f32 = 1.414;

/// Placeholder width used until the container size is known.
const PLACEHOLDER_WIDTH: f32 = 600.0;

/// One page image slot.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub src: String,
    pub natural: Option<Size>,
    pub handle: Option<image::Handle>,
    pub error: Option<String>,
}

impl PageImage {
    fn pending(src: String) -> Self {
        Self {
            src,
            natural: None,
            handle: None,
            error: None,
        }
    }
}

/// Downloaded page image with its measured size.
#[derive(Debug, Clone)]
pub struct LoadedPage {
    pub bytes: Vec<u8>,
    pub natural: Size,
}

impl LoadedPage {
    /// Measures an encoded image without decoding its pixels.
    pub fn measure(bytes: Vec<u8>) -> Result<Self, Error> {
        let (width, height) = image_rs::ImageReader::new(std::io::Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| Error::Parse(e.to_string()))?;
        if width == 0 || height == 0 {
            return Err(Error::Parse(format!("empty {width}x{height} image")));
        }
        Ok(Self {
            bytes,
            natural: Size::new(width as f32, height as f32),
        })
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    /// The page area was laid out at a new size.
    ContainerResized(Size),
    ViewportChanged {
        bounds: Size,
        offset: AbsoluteOffset,
    },
    PageLoaded {
        identity: FileIdentity,
        index: usize,
        result: Result<LoadedPage, Error>,
    },
    ZoomIn,
    ZoomOut,
    ScaleSelected(ScaleMode),
    Rotate(RotateDirection),
    RotationSaved {
        identity: FileIdentity,
        result: Result<(), Error>,
    },
    PreviousPage,
    NextPage,
    GoToPage(usize),
    PageTextChanged(String),
    PageTextSubmitted,
    DragStarted,
    CursorMoved(Point),
    DragEnded,
    WheelScrolled(mouse::ScrollDelta),
    ModifiersChanged(keyboard::Modifiers),
}

/// Side effects the application performs for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Save the new rotation of a page of `file`.
    PersistRotation {
        file: Box<DossierFile>,
        angle: RotationAngle,
    },
    /// A scale computation produced an unusable value.
    ScaleFailed(Error),
}

#[derive(Debug)]
pub struct Viewer {
    file: DossierFile,
    pages: Vec<PageImage>,
    current_page: usize,
    page_input: PageInput,
    initial_mode: ScaleMode,
    scale_mode: ScaleMode,
    scales: Vec<Option<f32>>,
    rotations: PageRotations,
    rotating: Option<RotateDirection>,
    drag: DragPan,
    cursor: Option<Point>,
    container: Option<Size>,
    offset: AbsoluteOffset,
    ctrl_held: bool,
    scale_error: Option<Error>,
    guard: ListenerGuard,
}

impl Viewer {
    /// Takes the viewport listeners and shows `sources` as the pages of `file`.
    ///
    /// `container` is the last known viewport size, if any.
    pub fn mount(
        listeners: &ListenerRegistry,
        file: &DossierFile,
        sources: Vec<String>,
        container: Option<Size>,
        initial_mode: ScaleMode,
    ) -> Self {
        let page_count = sources.len();
        Self {
            file: file.clone(),
            pages: sources.into_iter().map(PageImage::pending).collect(),
            current_page: 1,
            page_input: PageInput::default(),
            initial_mode,
            scale_mode: initial_mode,
            scales: vec![None; page_count],
            rotations: PageRotations::new(page_count),
            rotating: None,
            drag: DragPan::default(),
            cursor: None,
            container,
            offset: AbsoluteOffset { x: 0.0, y: 0.0 },
            ctrl_held: false,
            scale_error: None,
            guard: listeners.acquire(),
        }
    }

    /// Switches to another file or version, resetting all view state when the
    /// identity differs. Returns the scroll reset to perform.
    pub fn show(&mut self, file: &DossierFile, sources: Vec<String>) -> Task<Message> {
        let same_identity = file.identity() == self.identity();
        let same_pages = self
            .pages
            .iter()
            .map(|page| page.src.as_str())
            .eq(sources.iter().map(String::as_str));
        if same_identity && same_pages {
            self.file = file.clone();
            return Task::none();
        }

        let page_count = sources.len();
        self.file = file.clone();
        self.pages = sources.into_iter().map(PageImage::pending).collect();
        self.current_page = 1;
        self.page_input = PageInput::default();
        self.scale_mode = self.initial_mode;
        self.scales = vec![None; page_count];
        self.rotations.reset(page_count);
        self.rotating = None;
        self.drag.end();
        self.offset = AbsoluteOffset { x: 0.0, y: 0.0 };
        self.scale_error = None;

        operation::snap_to(Id::new(SCROLLABLE_ID), RelativeOffset { x: 0.0, y: 0.0 })
    }

    pub fn file(&self) -> &DossierFile {
        &self.file
    }

    pub fn identity(&self) -> FileIdentity {
        self.file.identity()
    }

    pub fn pages(&self) -> &[PageImage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// One-based current page.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_text(&self) -> &str {
        self.page_input.text()
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// The displayed scale: the one computed for the first page.
    pub fn scale(&self) -> Option<f32> {
        self.scales.first().copied().flatten()
    }

    pub fn rotation(&self, index: usize) -> RotationAngle {
        self.rotations.get(index)
    }

    pub fn rotating(&self) -> Option<RotateDirection> {
        self.rotating
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// True while Ctrl is held, so the wheel zooms instead of scrolling.
    pub fn wheel_zooms(&self) -> bool {
        self.ctrl_held
    }

    pub fn scale_error(&self) -> Option<&Error> {
        self.scale_error.as_ref()
    }

    /// True while this viewer owns the viewport listeners.
    pub fn listening(&self) -> bool {
        self.guard.is_active()
    }

    pub fn can_zoom_in(&self) -> bool {
        self.scale().is_some_and(|scale| scale < MAX_SCALE)
    }

    pub fn can_zoom_out(&self) -> bool {
        self.scale().is_some_and(|scale| scale > MIN_SCALE)
    }

    /// Displayed box of each page after scaling and rotation.
    pub fn slot_sizes(&self) -> Vec<Size> {
        let fallback_width = self
            .container
            .map_or(PLACEHOLDER_WIDTH, |c| (c.width - SCROLLBAR_ALLOWANCE).max(0.0));

        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| match (page.natural, self.scales[index]) {
                (Some(natural), Some(scale)) => {
                    layout::slot_size(natural, scale, self.rotations.get(index))
                }
                _ => Size::new(fallback_width, fallback_width * PLACEHOLDER_ASPECT),
            })
            .collect()
    }

    pub fn extents(&self) -> Vec<PageExtent> {
        layout::stack(&self.slot_sizes(), PAGE_SPACING)
    }

    pub fn handle(&mut self, message: Message) -> (Effect, Task<Message>) {
        match message {
            Message::ContainerResized(size) => {
                if self.container == Some(size) {
                    return (Effect::None, Task::none());
                }
                self.container = Some(size);
                let effect = self.recompute_scales();
                self.update_current_page();
                (effect, Task::none())
            }
            Message::ViewportChanged { bounds, offset } => {
                self.offset = offset;
                let resized = self.container != Some(bounds);
                self.container = Some(bounds);
                let effect = if resized {
                    self.recompute_scales()
                } else {
                    Effect::None
                };
                self.update_current_page();
                (effect, Task::none())
            }
            Message::PageLoaded {
                identity,
                index,
                result,
            } => {
                if identity != self.identity() {
                    log::debug!("dropping page {index} of stale file {}", identity.file_id);
                    return (Effect::None, Task::none());
                }
                let Some(page) = self.pages.get_mut(index) else {
                    return (Effect::None, Task::none());
                };
                match result {
                    Ok(loaded) => {
                        page.natural = Some(loaded.natural);
                        page.handle = Some(image::Handle::from_bytes(loaded.bytes));
                        page.error = None;
                        (self.recompute_scales(), Task::none())
                    }
                    Err(error) => {
                        log::warn!("page {} of {} failed: {error}", index + 1, identity.file_id);
                        page.error = Some(error.to_string());
                        (Effect::None, Task::none())
                    }
                }
            }
            Message::ZoomIn => match self.scale() {
                Some(scale) => self.set_scale_mode(ScaleMode::Factor(zoom::zoom_in_scale(scale))),
                None => (Effect::None, Task::none()),
            },
            Message::ZoomOut => match self.scale() {
                Some(scale) => {
                    self.set_scale_mode(ScaleMode::Factor(zoom::zoom_out_scale(scale)))
                }
                None => (Effect::None, Task::none()),
            },
            Message::ScaleSelected(mode) => self.set_scale_mode(mode),
            Message::WheelScrolled(delta) => {
                if !self.ctrl_held {
                    return (Effect::None, Task::none());
                }
                // Positive y scrolls content up; a wheel pulled toward the user zooms out.
                let toward_user = -match delta {
                    mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => y,
                };
                match self.scale() {
                    Some(scale) if toward_user != 0.0 => self.set_scale_mode(ScaleMode::Factor(
                        zoom::wheel_scale(scale, toward_user),
                    )),
                    _ => (Effect::None, Task::none()),
                }
            }
            Message::ModifiersChanged(modifiers) => {
                self.ctrl_held = modifiers.control();
                (Effect::None, Task::none())
            }
            Message::Rotate(direction) => self.rotate(direction),
            Message::RotationSaved { identity, result } => {
                if let Err(error) = result {
                    log::warn!("rotation of {} not saved: {error}", identity.file_id);
                }
                if identity == self.identity() {
                    self.rotating = None;
                }
                (Effect::None, Task::none())
            }
            Message::PreviousPage => self.go_to_page(self.current_page.saturating_sub(1)),
            Message::NextPage => self.go_to_page(self.current_page + 1),
            Message::GoToPage(page) => self.go_to_page(page),
            Message::PageTextChanged(text) => {
                self.page_input.edit(&text);
                (Effect::None, Task::none())
            }
            Message::PageTextSubmitted => match self.page_input.submit() {
                PageCommit::Jump(page) => self.go_to_page(page),
                PageCommit::Ignore => (Effect::None, Task::none()),
            },
            Message::DragStarted => {
                if let Some(position) = self.cursor {
                    self.drag.begin(position, self.offset);
                }
                self.page_input.blur(self.current_page);
                (Effect::None, Task::none())
            }
            Message::CursorMoved(position) => {
                self.cursor = Some(position);
                match self.drag.offset_at(position) {
                    Some(offset) => (Effect::None, self.scroll_to(offset)),
                    None => (Effect::None, Task::none()),
                }
            }
            Message::DragEnded => {
                self.drag.end();
                (Effect::None, Task::none())
            }
        }
    }

    fn set_scale_mode(&mut self, mode: ScaleMode) -> (Effect, Task<Message>) {
        self.scale_mode = mode;
        let effect = self.recompute_scales();
        self.update_current_page();
        (effect, Task::none())
    }

    /// Recomputes the scale of every measured page against the container.
    ///
    /// Fit modes wait for a non-empty container; fixed scales do not need one.
    fn recompute_scales(&mut self) -> Effect {
        let container = match self.container.filter(|c| c.width > 0.0 && c.height > 0.0) {
            Some(container) => container,
            None if self.scale_mode.is_fit() => return Effect::None,
            None => Size::ZERO,
        };
        let page_count = self.pages.len();
        let mut failure = None;

        for (index, page) in self.pages.iter().enumerate() {
            let Some(natural) = page.natural else {
                continue;
            };
            match zoom::calc_scale(
                self.scale_mode,
                container,
                natural,
                self.rotations.get(index),
                page_count,
            ) {
                Ok(scale) => self.scales[index] = Some(scale),
                Err(error) => failure = Some(error),
            }
        }

        match failure {
            Some(error) => {
                self.scale_error = Some(error.clone());
                Effect::ScaleFailed(error)
            }
            None => {
                self.scale_error = None;
                Effect::None
            }
        }
    }

    fn update_current_page(&mut self) {
        let Some(container) = self.container else {
            return;
        };
        let extents = self.extents();
        let top = self.offset.y;
        if let Some(index) = layout::active_page(&extents, top, top + container.height) {
            let page = index + 1;
            if page != self.current_page {
                self.current_page = page;
                self.page_input.show(page);
            }
        }
    }

    fn go_to_page(&mut self, page: usize) -> (Effect, Task<Message>) {
        if page == 0 || page > self.pages.len() {
            self.page_input.blur(self.current_page);
            return (Effect::None, Task::none());
        }

        let extents = self.extents();
        let Some(top) = layout::page_offset(&extents, page - 1) else {
            return (Effect::None, Task::none());
        };
        self.current_page = page;
        self.page_input.show(page);

        let task = self.scroll_to(AbsoluteOffset {
            x: self.offset.x,
            y: top,
        });
        (Effect::None, task)
    }

    fn rotate(&mut self, direction: RotateDirection) -> (Effect, Task<Message>) {
        if self.rotating.is_some() {
            return (Effect::None, Task::none());
        }
        let index = if self.pages.len() > 1 {
            self.current_page - 1
        } else {
            0
        };
        let Some(angle) = self.rotations.rotate(index, direction) else {
            return (Effect::None, Task::none());
        };

        self.rotating = Some(direction);
        self.scale_mode = ScaleMode::Rotated;
        let scale_effect = self.recompute_scales();
        if let Effect::ScaleFailed(_) = scale_effect {
            self.rotating = None;
            return (scale_effect, Task::none());
        }

        (
            Effect::PersistRotation {
                file: Box::new(self.file.clone()),
                angle,
            },
            Task::none(),
        )
    }

    /// Clamps `offset` to the scrollable range and mirrors it to the widget.
    fn scroll_to(&mut self, offset: AbsoluteOffset) -> Task<Message> {
        let Some(container) = self.container else {
            self.offset = offset;
            return Task::none();
        };
        let slots = self.slot_sizes();
        let content_width = slots.iter().map(|s| s.width).fold(0.0, f32::max);
        let content_height = layout::content_height(&layout::stack(&slots, PAGE_SPACING));

        let max_x = (content_width - container.width).max(0.0);
        let max_y = (content_height - container.height).max(0.0);
        self.offset = AbsoluteOffset {
            x: offset.x.clamp(0.0, max_x),
            y: offset.y.clamp(0.0, max_y),
        };

        let relative = RelativeOffset {
            x: if max_x > 0.0 { self.offset.x / max_x } else { 0.0 },
            y: if max_y > 0.0 { self.offset.y / max_y } else { 0.0 },
        };
        operation::snap_to(Id::new(SCROLLABLE_ID), relative)
    }
}
