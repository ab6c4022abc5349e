// SPDX-License-Identifier: MPL-2.0
//! Local upload, scanning and external import.

pub mod external;
pub mod form;
pub mod picker;
pub mod scanner;

pub use external::ExternalPicker;
pub use form::{Selection, UploadForm, UploadMode};
pub use scanner::{CommandScanner, NoScanner, ScanColor, ScanParams, ScanResult, Scanner};
