// SPDX-License-Identifier: MPL-2.0
//! User interface components.
//!
//! Components follow the Elm-style "state down, messages up" pattern: each
//! takes a `ViewContext` borrowing the state it renders and returns an element
//! producing its own `Message`, which the application maps into its own.
//!
//! # Surfaces
//!
//! - [`viewer_pane`] - Scrollable page images
//! - [`controls`] - Page navigation, zoom, scale and rotation toolbar
//! - [`file_list`] - File slot selector
//! - [`upload_form`] - Local file, scanner and external upload controls
//! - [`external_picker`] - External dossier listing with multi-select
//! - [`info_panel`] - Name, upload time and download link of a file
//! - [`banners`] - Dossier, action and parameter errors
//! - [`notifications`] - Toast notifications
//!
//! # Shared Infrastructure
//!
//! - [`widgets`] - Custom Iced widgets
//! - [`styles`] - Button and container styles
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)

pub mod banners;
pub mod controls;
pub mod design_tokens;
pub mod external_picker;
pub mod file_list;
pub mod info_panel;
pub mod notifications;
pub mod styles;
pub mod upload_form;
pub mod viewer_pane;
pub mod widgets;
