/// A number within the unit interval `(0.0..=1.0)`.
///
/// Used for host values that arrive normalized, e.g. meter power levels and fader positions.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct UnitValue(f64);

impl UnitValue {
    /// 0.0
    pub const MIN: UnitValue = UnitValue(0.0);

    /// 1.0
    pub const MAX: UnitValue = UnitValue(1.0);

    /// Creates the unit value. Panics in debug builds if the given number is not within the
    /// positive unit interval.
    pub fn new(number: f64) -> UnitValue {
        debug_assert!((0.0..=1.0).contains(&number));
        UnitValue(number)
    }

    /// Creates the unit value, clamping the given number to the unit interval. NaN becomes 0.0.
    pub fn new_clamped(number: f64) -> UnitValue {
        if number.is_nan() {
            return UnitValue::MIN;
        }
        UnitValue(num::clamp(number, 0.0, 1.0))
    }

    /// Returns the underlying number.
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Returns whether this is 0.0.
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }

    /// Maps this value onto the discrete range `0..=max`, rounding to the nearest step.
    pub fn to_discrete(self, max: u32) -> u32 {
        (self.0 * max as f64).round() as u32
    }
}
