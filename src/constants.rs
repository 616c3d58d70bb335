//! # Hardware Constants Module
//!
//! All compiled-in configuration for the joystick display firmware, grouped by
//! functional area. Pin numbers live in [`pins`] for logging; the peripherals
//! themselves are taken by type in `main.rs`.

/// ADC (Analog-to-Digital Converter) Constants
pub mod adc {
    /// Maximum ADC value for 12-bit resolution (2^12 - 1)
    pub const MAX_VALUE: u16 = 4095;

    /// Joystick rest position, half of the 12-bit range
    pub const CENTER_VALUE: u16 = 2048;

    /// Reference voltage in millivolts (3.3V)
    pub const REFERENCE_VOLTAGE_MV: u16 = 3300;

    /// X axis input channel (ADC0)
    pub const X_CHANNEL: u8 = 0;

    /// Y axis input channel (ADC1)
    pub const Y_CHANNEL: u8 = 1;

    /// Convert ADC raw value to millivolts
    pub const fn raw_to_millivolts(raw: u16) -> u16 {
        ((raw as u32 * REFERENCE_VOLTAGE_MV as u32) / MAX_VALUE as u32) as u16
    }
}

/// PWM (Pulse Width Modulation) Constants
pub mod pwm {
    /// Counter wrap value; duty levels run 0..=WRAP_VALUE, matching the ADC range
    pub const WRAP_VALUE: u16 = 4095;

    /// Both LED channels dark
    pub const OFF_LEVEL: u16 = 0;
}

/// Display geometry for the 128x64 SSD1306 and the tracking square
pub mod display {
    pub const WIDTH: i32 = 128;
    pub const HEIGHT: i32 = 64;

    /// Edge length of the filled square that follows the joystick
    pub const SQUARE_SIZE: u32 = 8;

    /// Square position at rest (top-left corner)
    pub const SQUARE_REST_X: i32 = 64;
    pub const SQUARE_REST_Y: i32 = 32;

    /// Full-deflection travel from the rest position
    pub const SQUARE_TRAVEL_X: i32 = 56;
    pub const SQUARE_TRAVEL_Y: i32 = 32;

    /// Largest top-left coordinates that keep the square on screen
    pub const SQUARE_MAX_X: i32 = 120;
    pub const SQUARE_MAX_Y: i32 = 56;

    /// Border outline corners, shared by every border style
    pub const BORDER_LEFT: i32 = 0;
    pub const BORDER_TOP: i32 = 2;
    pub const BORDER_RIGHT: i32 = WIDTH - 1;
    pub const BORDER_BOTTOM: i32 = HEIGHT - 1;
}

/// Button handling
pub mod controls {
    /// Minimum spacing between two accepted presses, across both buttons
    pub const DEBOUNCE_MS: u32 = 200;

    /// Number of border styles the joystick button cycles through
    pub const BORDER_STYLE_COUNT: u8 = 3;
}

/// Timing Constants (in milliseconds unless specified)
pub mod timing {
    /// Settling time after each ADC conversion
    pub const ADC_SETTLE_MS: u64 = 2;

    /// Sleep at the end of every frame (~10Hz loop)
    pub const FRAME_INTERVAL_MS: u64 = 100;

    /// Pause after the first blank frame is pushed to the display
    pub const DISPLAY_SETTLE_MS: u64 = 50;

    /// Minimum spacing of frame summaries sent to the USB console
    pub const STATUS_LOG_INTERVAL_MS: u64 = 1000;

    /// USB serial heartbeat interval (10 seconds)
    pub const USB_HEARTBEAT_MS: u64 = 10000;

    /// USB read poll timeout inside the console loop
    pub const USB_READ_TIMEOUT_MS: u64 = 100;
}

/// Communication Buffer Sizes
pub mod buffers {
    /// USB packet buffer size
    pub const USB_PACKET_SIZE: usize = 64;

    /// Line buffer size for command input
    pub const LINE_BUFFER_SIZE: usize = 128;

    /// Formatted message buffer size
    pub const MESSAGE_BUFFER_SIZE: usize = 128;

    /// Serial message channel depth
    pub const SERIAL_CHANNEL_DEPTH: usize = 10;
}

/// I2C Communication Constants
pub mod i2c {
    /// Fast I2C frequency (400kHz)
    pub const FAST_FREQUENCY_HZ: u32 = 400_000;

    /// SSD1306 7-bit address with SA0 tied low
    pub const SSD1306_ADDRESS: u8 = 0x3C;
}

/// GPIO assignments on the carrier board
pub mod pins {
    pub const I2C_SDA: u8 = 14;
    pub const I2C_SCL: u8 = 15;
    pub const JOYSTICK_X: u8 = 26;
    pub const JOYSTICK_Y: u8 = 27;
    pub const JOYSTICK_BUTTON: u8 = 22;
    pub const BUTTON_A: u8 = 5;
    pub const LED_RED: u8 = 13;
    pub const LED_GREEN: u8 = 11;
    pub const LED_BLUE: u8 = 12;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millivolts_span_reference_range() {
        assert_eq!(adc::raw_to_millivolts(0), 0);
        assert_eq!(adc::raw_to_millivolts(adc::MAX_VALUE), adc::REFERENCE_VOLTAGE_MV);
        assert_eq!(adc::raw_to_millivolts(adc::CENTER_VALUE), 1650);
    }

    #[test]
    fn square_limits_keep_square_on_screen() {
        assert_eq!(
            display::SQUARE_MAX_X + display::SQUARE_SIZE as i32,
            display::WIDTH
        );
        assert_eq!(
            display::SQUARE_MAX_Y + display::SQUARE_SIZE as i32,
            display::HEIGHT
        );
    }

    #[test]
    fn pwm_wrap_matches_adc_range() {
        assert_eq!(pwm::WRAP_VALUE, adc::MAX_VALUE);
    }
}
