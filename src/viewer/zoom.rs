// SPDX-License-Identifier: MPL-2.0
//! Scale modes and the fit/step calculations behind them.

use super::rotation::RotationAngle;
use crate::config::{
    InitialScale, DEFAULT_SCALE_DELTA, MAX_SCALE, MIN_SCALE, SCALE_PRESETS, SCROLLBAR_ALLOWANCE,
};
use crate::error::{Error, Result};
use iced::Size;

/// How the page scale is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScaleMode {
    /// Natural size.
    Actual,
    /// Fill the container width, leaving room for a scrollbar when needed.
    #[default]
    FitWidth,
    /// Fit the whole page, scaling by height when it overflows.
    FitPage,
    /// Re-fit by width after a rotation.
    Rotated,
    Factor(f32),
}

impl ScaleMode {
    /// Modes offered by the scale selector, in display order.
    pub fn options() -> Vec<ScaleMode> {
        let mut options = vec![ScaleMode::Actual, ScaleMode::FitWidth, ScaleMode::FitPage];
        options.extend(SCALE_PRESETS.iter().copied().map(ScaleMode::Factor));
        options
    }

    pub fn is_fit(self) -> bool {
        matches!(
            self,
            ScaleMode::FitWidth | ScaleMode::FitPage | ScaleMode::Rotated
        )
    }
}

impl From<InitialScale> for ScaleMode {
    fn from(initial: InitialScale) -> Self {
        match initial {
            InitialScale::Actual => ScaleMode::Actual,
            InitialScale::FitWidth => ScaleMode::FitWidth,
            InitialScale::FitPage => ScaleMode::FitPage,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tenths of `value`, snapped to absorb binary representation noise.
fn tenths(value: f64) -> f64 {
    (value * 10.0 * 1e6).round() / 1e6
}

/// Next scale up: one step, rounded up to a tenth, at most [`MAX_SCALE`].
pub fn zoom_in_scale(scale: f32) -> f32 {
    let stepped = round2(f64::from(scale) * f64::from(DEFAULT_SCALE_DELTA));
    let rounded = tenths(stepped).ceil() / 10.0;
    (rounded as f32).min(MAX_SCALE)
}

/// Next scale down: one step, rounded down to a tenth, at least [`MIN_SCALE`].
pub fn zoom_out_scale(scale: f32) -> f32 {
    let stepped = round2(f64::from(scale) / f64::from(DEFAULT_SCALE_DELTA));
    let rounded = tenths(stepped).floor() / 10.0;
    (rounded as f32).max(MIN_SCALE)
}

/// Wheel zoom: scrolling down zooms out, anything else zooms in.
pub fn wheel_scale(scale: f32, delta_y: f32) -> f32 {
    if delta_y > 0.0 {
        zoom_out_scale(scale)
    } else {
        zoom_in_scale(scale)
    }
}

/// Percentage shown in the scale badge.
pub fn percent_label(scale: f32) -> String {
    format!("{}%", (scale * 100.0).round() as i64)
}

/// Computes the scale for one page.
///
/// `natural` is the unrotated size of the page image. Fit modes swap it for
/// quarter-turn rotations, and fall back to a height or scrollbar-aware fit
/// when the page overflows vertically or the document has several pages.
pub fn calc_scale(
    mode: ScaleMode,
    container: Size,
    natural: Size,
    rotation: RotationAngle,
    page_count: usize,
) -> Result<f32> {
    let scale = match mode {
        ScaleMode::Actual => 1.0,
        ScaleMode::Factor(factor) => factor,
        ScaleMode::FitWidth | ScaleMode::FitPage | ScaleMode::Rotated => {
            let (width, height) = if rotation.swaps_dimensions() {
                (natural.height, natural.width)
            } else {
                (natural.width, natural.height)
            };
            let by_width = container.width / width;
            if by_width * height > container.height || page_count > 1 {
                if mode == ScaleMode::FitPage {
                    container.height / height
                } else {
                    (container.width - SCROLLBAR_ALLOWANCE) / width
                }
            } else {
                by_width
            }
        }
    };

    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        log::error!(
            "invalid scale {scale} for {mode:?}: container {container:?}, page {natural:?}"
        );
        Err(Error::Configuration(format!("invalid scale value = {scale}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn zoom_steps_round_to_tenths() {
        assert_abs_diff_eq!(zoom_in_scale(1.0), 1.1, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_out_scale(1.0), 0.9, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_in_scale(0.9), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_out_scale(5.0), 4.5, epsilon = 1e-6);
    }

    #[test]
    fn zoom_steps_saturate_at_bounds() {
        assert_abs_diff_eq!(zoom_in_scale(9.5), 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_in_scale(10.0), 10.0, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_out_scale(0.1), 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(zoom_out_scale(0.12), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn zoom_in_after_zoom_out_returns_close_to_start() {
        for tenth in 2..=99 {
            let scale = tenth as f32 / 10.0;
            let back = zoom_in_scale(zoom_out_scale(scale));
            assert!(
                (back - scale).abs() <= 0.1 + 1e-4,
                "{scale} came back as {back}"
            );
        }
    }

    #[test]
    fn wheel_direction_picks_step() {
        assert!(wheel_scale(1.0, 3.0) < 1.0);
        assert!(wheel_scale(1.0, -3.0) > 1.0);
    }

    #[test]
    fn fit_width_single_page_that_fits() {
        let scale = calc_scale(
            ScaleMode::FitWidth,
            Size::new(800.0, 1000.0),
            Size::new(400.0, 300.0),
            RotationAngle::ZERO,
            1,
        )
        .unwrap();
        assert_abs_diff_eq!(scale, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn fit_width_leaves_scrollbar_room_for_tall_or_paged() {
        let tall = calc_scale(
            ScaleMode::FitWidth,
            Size::new(815.0, 600.0),
            Size::new(400.0, 1000.0),
            RotationAngle::ZERO,
            1,
        )
        .unwrap();
        assert_abs_diff_eq!(tall, 2.0, epsilon = 1e-6);

        let paged = calc_scale(
            ScaleMode::FitWidth,
            Size::new(815.0, 10_000.0),
            Size::new(400.0, 100.0),
            RotationAngle::ZERO,
            3,
        )
        .unwrap();
        assert_abs_diff_eq!(paged, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn fit_page_scales_by_height_on_overflow() {
        let scale = calc_scale(
            ScaleMode::FitPage,
            Size::new(800.0, 500.0),
            Size::new(400.0, 1000.0),
            RotationAngle::ZERO,
            1,
        )
        .unwrap();
        assert_abs_diff_eq!(scale, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn rotation_swaps_fit_dimensions() {
        let scale = calc_scale(
            ScaleMode::Rotated,
            Size::new(1000.0, 2000.0),
            Size::new(400.0, 500.0),
            RotationAngle::new(90),
            1,
        )
        .unwrap();
        assert_abs_diff_eq!(scale, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn fit_width_never_exceeds_container() {
        let containers = [(300.0, 200.0), (1024.0, 768.0), (1920.0, 300.0), (40.0, 4000.0)];
        let pages = [(100.0, 100.0), (2480.0, 3508.0), (3000.0, 500.0), (17.0, 900.0)];
        for (cw, ch) in containers {
            for (ew, eh) in pages {
                for count in [1, 2] {
                    for rotation in [RotationAngle::ZERO, RotationAngle::new(90)] {
                        let scale = calc_scale(
                            ScaleMode::FitWidth,
                            Size::new(cw, ch),
                            Size::new(ew, eh),
                            rotation,
                            count,
                        )
                        .unwrap();
                        let width = if rotation.swaps_dimensions() { eh } else { ew };
                        assert!(scale * width <= cw + 1e-3);
                    }
                }
            }
        }
    }

    #[test]
    fn degenerate_sizes_are_configuration_errors() {
        let zero_page = calc_scale(
            ScaleMode::FitWidth,
            Size::new(800.0, 600.0),
            Size::new(0.0, 0.0),
            RotationAngle::ZERO,
            1,
        );
        assert!(matches!(zero_page, Err(Error::Configuration(_))));

        let narrow = calc_scale(
            ScaleMode::FitWidth,
            Size::new(10.0, 600.0),
            Size::new(100.0, 10_000.0),
            RotationAngle::ZERO,
            1,
        );
        assert!(matches!(narrow, Err(Error::Configuration(_))));
    }

    #[test]
    fn actual_and_factor_ignore_geometry() {
        let container = Size::new(1.0, 1.0);
        let page = Size::new(100.0, 100.0);
        assert_eq!(
            calc_scale(ScaleMode::Actual, container, page, RotationAngle::ZERO, 1),
            Ok(1.0)
        );
        assert_eq!(
            calc_scale(ScaleMode::Factor(1.25), container, page, RotationAngle::ZERO, 1),
            Ok(1.25)
        );
    }

    #[test]
    fn options_list_modes_then_presets() {
        let options = ScaleMode::options();
        assert_eq!(options.len(), 11);
        assert_eq!(options[0], ScaleMode::Actual);
        assert_eq!(options[3], ScaleMode::Factor(0.5));
        assert_eq!(options[10], ScaleMode::Factor(4.0));
    }

    #[test]
    fn percent_label_rounds() {
        assert_eq!(percent_label(1.0), "100%");
        assert_eq!(percent_label(0.756), "76%");
    }
}
