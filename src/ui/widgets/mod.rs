// SPDX-License-Identifier: MPL-2.0
pub mod page_viewport;

pub use page_viewport::{page_viewport, PageViewport};
