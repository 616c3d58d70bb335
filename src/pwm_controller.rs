//! # PWM LED Module
//!
//! Drives the red and blue channels of the RGB LED. Both pins sit on PWM
//! slice 6 (GPIO12 = channel A = blue, GPIO13 = channel B = red), so one
//! [`Pwm`] owns both and each update rewrites the two compare registers.
//!
//! The counter wraps at 4095, so a duty level equals the brightness value
//! computed from a 12-bit joystick sample with no further scaling.

use defmt::*;
use embassy_rp::peripherals::{PIN_12, PIN_13, PWM_SLICE6};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::Peri;

use crate::constants::{pins, pwm};
use crate::joystick::LedLevels;

pub struct LedPwm<'d> {
    pwm: Pwm<'d>,
    config: PwmConfig,
    levels: LedLevels,
}

impl<'d> LedPwm<'d> {
    /// Configure slice 6 with wrap 4095, both channels dark, output enabled
    pub fn new(
        pwm_slice: Peri<'d, PWM_SLICE6>,
        blue_pin: Peri<'d, PIN_12>,
        red_pin: Peri<'d, PIN_13>,
    ) -> Self {
        let mut config = PwmConfig::default();
        config.top = pwm::WRAP_VALUE;
        config.compare_a = pwm::OFF_LEVEL;
        config.compare_b = pwm::OFF_LEVEL;
        config.enable = true;

        let pwm = Pwm::new_output_ab(pwm_slice, blue_pin, red_pin, config.clone());

        info!(
            "LED PWM ready: red GPIO {}, blue GPIO {}, top {}",
            pins::LED_RED,
            pins::LED_BLUE,
            pwm::WRAP_VALUE
        );

        Self {
            pwm,
            config,
            levels: LedLevels::OFF,
        }
    }

    pub fn set_levels(&mut self, levels: LedLevels) {
        if levels == self.levels {
            return;
        }

        self.config.compare_a = levels.blue.min(pwm::WRAP_VALUE);
        self.config.compare_b = levels.red.min(pwm::WRAP_VALUE);
        self.pwm.set_config(&self.config);
        self.levels = levels;

        debug!("LED levels -> red {} blue {}", levels.red, levels.blue);
    }
}
