// SPDX-License-Identifier: MPL-2.0
//! `dossier_lens` is a dossier viewer and uploader built with the Iced GUI
//! framework.
//!
//! It fetches the files of a case record from a file service, shows images
//! and paged documents in a zoomable, rotatable page viewer, and replaces or
//! merges file versions from local files, a scanner bridge or an external
//! dossier.

#![doc(html_root_url = "https://docs.rs/dossier_lens/0.1.0")]

pub mod action;
pub mod app;
pub mod config;
pub mod dossier;
pub mod error;
pub mod i18n;
pub mod session;
pub mod transport;
pub mod ui;
pub mod upload;
pub mod viewer;

#[cfg(test)]
mod test_utils;
