//! Joystick-driven square on an SSD1306 OLED with PWM LED feedback.
//!
//! `constants`, `joystick`, `controls` and `frame` are hardware independent
//! and unit tested on the host. The remaining modules wrap the RP2350
//! peripherals and only build for the firmware target.

#![cfg_attr(not(test), no_std)]

pub mod constants;
pub mod controls;
pub mod frame;
pub mod joystick;

#[cfg(target_os = "none")]
pub mod adc_reader;
#[cfg(target_os = "none")]
pub mod buttons;
#[cfg(target_os = "none")]
pub mod display_loop;
#[cfg(target_os = "none")]
pub mod oled;
#[cfg(target_os = "none")]
pub mod pwm_controller;
#[cfg(target_os = "none")]
pub mod usb_serial;
