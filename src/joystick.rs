//! Joystick sample mapping.
//!
//! Turns one pair of raw axis samples into the two things the loop drives:
//! LED brightness per axis and the on-screen square position. The axes are
//! swapped on screen: Y moves the square horizontally, X moves it vertically
//! with the sign inverted.

use crate::constants::{adc, display, pwm};

/// One pair of raw 12-bit axis samples
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct JoystickReading {
    pub x_raw: u16,
    pub y_raw: u16,
    pub timestamp_ms: u64,
}

/// Top-left corner of the tracking square, in display pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct SquarePosition {
    pub x: i32,
    pub y: i32,
}

/// Duty levels for the two PWM LED channels (0..=4095)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct LedLevels {
    /// Driven by the X axis
    pub red: u16,
    /// Driven by the Y axis
    pub blue: u16,
}

impl LedLevels {
    pub const OFF: Self = Self {
        red: pwm::OFF_LEVEL,
        blue: pwm::OFF_LEVEL,
    };
}

impl JoystickReading {
    pub fn new(x_raw: u16, y_raw: u16, timestamp_ms: u64) -> Self {
        Self {
            x_raw,
            y_raw,
            timestamp_ms,
        }
    }

    /// A reading with the stick at rest
    pub fn centered(timestamp_ms: u64) -> Self {
        Self::new(adc::CENTER_VALUE, adc::CENTER_VALUE, timestamp_ms)
    }

    /// LED levels for this reading. With `pwm_active` false both channels are
    /// forced to zero; the brightness is still computed.
    pub fn led_levels(&self, pwm_active: bool) -> LedLevels {
        let levels = LedLevels {
            red: brightness(self.x_raw),
            blue: brightness(self.y_raw),
        };
        if pwm_active {
            levels
        } else {
            LedLevels::OFF
        }
    }

    pub fn square_position(&self) -> SquarePosition {
        SquarePosition {
            x: square_x(self.y_raw),
            y: square_y(self.x_raw),
        }
    }
}

/// Duty level proportional to the sample's distance from center.
///
/// `|sample - 2048| * 4095 / 2048`: 0 at rest, 4095 at sample 0 and 4093 at
/// sample 4095.
pub fn brightness(raw: u16) -> u16 {
    let deviation = (i32::from(raw) - i32::from(adc::CENTER_VALUE)).unsigned_abs();
    let level = deviation * u32::from(pwm::WRAP_VALUE) / u32::from(adc::CENTER_VALUE);
    level.min(u32::from(pwm::WRAP_VALUE)) as u16
}

/// Horizontal square coordinate from the Y axis sample, clamped to `[0, 120]`
pub fn square_x(y_raw: u16) -> i32 {
    let offset = (i32::from(y_raw) - i32::from(adc::CENTER_VALUE)) * display::SQUARE_TRAVEL_X
        / i32::from(adc::CENTER_VALUE);
    (offset + display::SQUARE_REST_X).clamp(0, display::SQUARE_MAX_X)
}

/// Vertical square coordinate from the X axis sample, inverted and clamped to
/// `[0, 56]`
pub fn square_y(x_raw: u16) -> i32 {
    let offset = (i32::from(adc::CENTER_VALUE) - i32::from(x_raw)) * display::SQUARE_TRAVEL_Y
        / i32::from(adc::CENTER_VALUE);
    (offset + display::SQUARE_REST_Y).clamp(0, display::SQUARE_MAX_Y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_is_zero_at_rest() {
        assert_eq!(brightness(adc::CENTER_VALUE), 0);
    }

    #[test]
    fn brightness_follows_deviation_formula() {
        for raw in 0..=adc::MAX_VALUE {
            let expected = (i32::from(raw) - 2048).unsigned_abs() * 4095 / 2048;
            assert_eq!(u32::from(brightness(raw)), expected, "raw {raw}");
        }
    }

    #[test]
    fn brightness_is_symmetric_at_extremes() {
        assert_eq!(brightness(0), 4095);
        assert_eq!(brightness(adc::MAX_VALUE), 4093);
        assert!(brightness(0).abs_diff(brightness(adc::MAX_VALUE)) <= 2);
    }

    #[test]
    fn square_x_stays_in_bounds() {
        for y in 0..=adc::MAX_VALUE {
            let x = square_x(y);
            assert!((0..=display::SQUARE_MAX_X).contains(&x), "y {y} -> {x}");
        }
    }

    #[test]
    fn square_y_stays_in_bounds() {
        for x in 0..=adc::MAX_VALUE {
            let y = square_y(x);
            assert!((0..=display::SQUARE_MAX_Y).contains(&y), "x {x} -> {y}");
        }
    }

    #[test]
    fn square_x_endpoints() {
        assert_eq!(square_x(2048), 64);
        // (-2048 * 56 / 2048) + 64
        assert_eq!(square_x(0), 8);
        // 2047 * 56 / 2048 truncates to 55
        assert_eq!(square_x(4095), 119);
    }

    #[test]
    fn square_y_endpoints() {
        assert_eq!(square_y(2048), 32);
        // 64 before clamping
        assert_eq!(square_y(0), 56);
        // -2047 * 32 / 2048 truncates toward zero to -31
        assert_eq!(square_y(4095), 1);
    }

    #[test]
    fn square_x_grows_with_y() {
        let mut previous = square_x(0);
        for y in 1..=adc::MAX_VALUE {
            let current = square_x(y);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn axes_are_swapped_on_screen() {
        let reading = JoystickReading::new(0, 2048, 0);
        assert_eq!(reading.square_position(), SquarePosition { x: 64, y: 56 });

        let reading = JoystickReading::new(2048, 4095, 0);
        assert_eq!(reading.square_position(), SquarePosition { x: 119, y: 32 });
    }

    #[test]
    fn disabled_pwm_forces_leds_off() {
        let reading = JoystickReading::new(0, 4095, 0);
        assert_eq!(reading.led_levels(false), LedLevels::OFF);
        assert_eq!(
            reading.led_levels(true),
            LedLevels {
                red: 4095,
                blue: 4093
            }
        );
    }

    #[test]
    fn centered_reading_is_dark_and_mid_screen() {
        let reading = JoystickReading::centered(0);
        assert_eq!(reading.led_levels(true), LedLevels::OFF);
        assert_eq!(reading.square_position(), SquarePosition { x: 64, y: 32 });
    }

    #[test]
    fn sample_time_does_not_affect_mapping() {
        let early = JoystickReading::new(300, 3900, 1_000);
        let late = JoystickReading::new(300, 3900, 9_000);
        assert_eq!(late.timestamp_ms, 9_000);
        assert_eq!(early.square_position(), late.square_position());
        assert_eq!(early.led_levels(true), late.led_levels(true));
    }
}
