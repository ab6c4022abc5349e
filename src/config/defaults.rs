// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Service**: File service location and request behaviour
//! - **Zoom**: Scale bounds, step factor and presets
//! - **Layout**: Scrollbar allowance used by fit calculations
//! - **Scanner**: Default scan parameters

// ==========================================================================
// Service Defaults
// ==========================================================================

/// Default file service root; link hosts are rebased onto this.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/workflow-web/web/v2";

// ==========================================================================
// Zoom Defaults
// ==========================================================================

/// Multiplicative step applied by zoom in/out.
pub const DEFAULT_SCALE_DELTA: f32 = 1.1;

/// Smallest scale factor reachable by zooming out.
pub const MIN_SCALE: f32 = 0.1;

/// Largest scale factor reachable by zooming in.
pub const MAX_SCALE: f32 = 10.0;

/// Scale presets offered by the scale selector, as factors.
pub const SCALE_PRESETS: [f32; 8] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 3.0, 4.0];

// ==========================================================================
// Layout Defaults
// ==========================================================================

/// Width reserved for a vertical scrollbar by the fit-width calculation.
pub const SCROLLBAR_ALLOWANCE: f32 = 15.0;

// ==========================================================================
// Scanner Defaults
// ==========================================================================

/// Default scan resolution.
pub const DEFAULT_SCAN_DPI: u32 = 150;

/// Lowest scan resolution the bridge accepts; lower requests are raised to it.
pub const MIN_SCAN_DPI: u32 = 70;
