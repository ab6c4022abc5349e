// SPDX-License-Identifier: MPL-2.0
//! Page rotation in quarter turns.

/// Rotation angle in 90° increments.
///
/// The value is always one of 0°, 90°, 180° or 270°.
///
/// # Example
///
/// ```
/// use dossier_lens::viewer::rotation::RotationAngle;
///
/// let angle = RotationAngle::default().rotate_clockwise();
/// assert_eq!(angle.degrees(), 90);
/// assert_eq!(angle.rotate_counterclockwise(), RotationAngle::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RotationAngle(u16);

impl RotationAngle {
    pub const ZERO: Self = Self(0);

    /// Rounds down to a quarter turn and wraps into 0..360.
    #[must_use]
    pub fn new(degrees: u16) -> Self {
        Self(((degrees / 90) * 90) % 360)
    }

    #[must_use]
    pub fn degrees(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn radians(self) -> f32 {
        f32::from(self.0).to_radians()
    }

    #[must_use]
    pub fn rotate_clockwise(self) -> Self {
        Self((self.0 + 90) % 360)
    }

    #[must_use]
    pub fn rotate_counterclockwise(self) -> Self {
        Self((self.0 + 270) % 360)
    }

    #[must_use]
    pub fn rotate(self, direction: RotateDirection) -> Self {
        match direction {
            RotateDirection::Clockwise => self.rotate_clockwise(),
            RotateDirection::CounterClockwise => self.rotate_counterclockwise(),
        }
    }

    /// True for 90° and 270°, where width and height trade places.
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        self.0 == 90 || self.0 == 270
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

/// One rotation per page, sized to the displayed page count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRotations(Vec<RotationAngle>);

impl PageRotations {
    pub fn new(page_count: usize) -> Self {
        Self(vec![RotationAngle::ZERO; page_count])
    }

    /// Drops all rotations and resizes to `page_count` unrotated pages.
    pub fn reset(&mut self, page_count: usize) {
        self.0.clear();
        self.0.resize(page_count, RotationAngle::ZERO);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rotation of a zero-based page; pages beyond the list are unrotated.
    pub fn get(&self, index: usize) -> RotationAngle {
        self.0.get(index).copied().unwrap_or_default()
    }

    /// Rotates one page and returns its new angle, `None` when out of range.
    pub fn rotate(&mut self, index: usize, direction: RotateDirection) -> Option<RotationAngle> {
        let angle = self.0.get_mut(index)?;
        *angle = angle.rotate(direction);
        Some(*angle)
    }

    pub fn as_slice(&self) -> &[RotationAngle] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_to_quarter_turns() {
        assert_eq!(RotationAngle::new(89).degrees(), 0);
        assert_eq!(RotationAngle::new(135).degrees(), 90);
        assert_eq!(RotationAngle::new(450).degrees(), 90);
        assert_eq!(RotationAngle::new(720).degrees(), 0);
    }

    #[test]
    fn counterclockwise_from_zero_wraps_to_270() {
        assert_eq!(RotationAngle::ZERO.rotate_counterclockwise().degrees(), 270);
        assert_eq!(RotationAngle::new(270).rotate_clockwise(), RotationAngle::ZERO);
    }

    #[test]
    fn four_quarter_turns_return_to_start() {
        for start in [0, 90, 180, 270] {
            let start = RotationAngle::new(start);
            for direction in [RotateDirection::Clockwise, RotateDirection::CounterClockwise] {
                let mut angle = start;
                for _ in 0..4 {
                    angle = angle.rotate(direction);
                    assert!([0, 90, 180, 270].contains(&angle.degrees()));
                }
                assert_eq!(angle, start);
            }
        }
    }

    #[test]
    fn swaps_dimensions_for_odd_quarters() {
        assert!(!RotationAngle::new(0).swaps_dimensions());
        assert!(RotationAngle::new(90).swaps_dimensions());
        assert!(!RotationAngle::new(180).swaps_dimensions());
        assert!(RotationAngle::new(270).swaps_dimensions());
    }

    #[test]
    fn page_rotations_are_independent() {
        let mut rotations = PageRotations::new(3);
        assert_eq!(
            rotations.rotate(1, RotateDirection::Clockwise),
            Some(RotationAngle::new(90))
        );
        assert_eq!(rotations.get(0), RotationAngle::ZERO);
        assert_eq!(rotations.get(1).degrees(), 90);
        assert_eq!(rotations.rotate(3, RotateDirection::Clockwise), None);
    }

    #[test]
    fn reset_clears_and_resizes() {
        let mut rotations = PageRotations::new(2);
        rotations.rotate(0, RotateDirection::CounterClockwise);
        rotations.reset(4);
        assert_eq!(rotations.len(), 4);
        assert!(rotations.as_slice().iter().all(|a| *a == RotationAngle::ZERO));
    }
}
