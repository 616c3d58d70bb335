//! Button-driven state shared between the button tasks and the display loop.
//!
//! Everything here is a plain atomic so the button tasks can update it from
//! their GPIO wakeups without locking, and the loop reads one
//! [`ControlSnapshot`] per frame.
//!
//! The debounce timer is shared by both buttons: a press on either one
//! suppresses any press on either button for the next 200 ms.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

use crate::constants::controls::DEBOUNCE_MS;
use crate::frame::BorderStyle;

/// The process-wide control state
pub static CONTROLS: ControlState = ControlState::new();

/// Which button fired
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Button {
    /// Push switch on the joystick: cycles the border, toggles the green LED
    Joystick,
    /// Button A: enables or disables the PWM LEDs
    A,
}

/// Result of one falling edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum PressOutcome {
    /// Inside the debounce window of the previous accepted press
    Suppressed,
    /// Joystick button accepted; carries the new border style
    BorderAdvanced(BorderStyle),
    /// Button A accepted; carries the new `pwm_active` value
    PwmToggled(bool),
}

impl PressOutcome {
    /// The green LED follows accepted joystick presses only
    pub fn toggles_green_led(self) -> bool {
        matches!(self, PressOutcome::BorderAdvanced(_))
    }
}

/// Values the display loop needs for one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct ControlSnapshot {
    pub pwm_active: bool,
    pub border_style: BorderStyle,
}

pub struct ControlState {
    pwm_active: AtomicBool,
    border_style: AtomicU8,
    last_accepted_ms: AtomicU32,
}

impl ControlState {
    /// PWM enabled, no border, debounce timer at boot
    pub const fn new() -> Self {
        Self {
            pwm_active: AtomicBool::new(true),
            border_style: AtomicU8::new(BorderStyle::None as u8),
            last_accepted_ms: AtomicU32::new(0),
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            pwm_active: self.pwm_active.load(Ordering::Acquire),
            border_style: BorderStyle::from_index(self.border_style.load(Ordering::Acquire)),
        }
    }

    /// Debounce one edge at `now_ms` (milliseconds since boot, wrapping).
    ///
    /// Accepting and recording the timestamp is one atomic update, so two
    /// buttons racing inside the same window cannot both be accepted.
    pub fn try_accept(&self, now_ms: u32) -> bool {
        self.last_accepted_ms
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                (now_ms.wrapping_sub(last) >= DEBOUNCE_MS).then_some(now_ms)
            })
            .is_ok()
    }

    /// Handle one falling edge from `button`
    pub fn handle_press(&self, button: Button, now_ms: u32) -> PressOutcome {
        if !self.try_accept(now_ms) {
            return PressOutcome::Suppressed;
        }

        match button {
            Button::Joystick => PressOutcome::BorderAdvanced(self.advance_border()),
            Button::A => PressOutcome::PwmToggled(self.toggle_pwm()),
        }
    }

    /// Flip `pwm_active`, returning the new value
    fn toggle_pwm(&self) -> bool {
        !self.pwm_active.fetch_xor(true, Ordering::AcqRel)
    }

    /// Step the border style 0 -> 1 -> 2 -> 0, returning the new style
    fn advance_border(&self) -> BorderStyle {
        let previous = self
            .border_style
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |index| {
                Some(BorderStyle::from_index(index).next() as u8)
            })
            .unwrap_or_else(|index| index);
        BorderStyle::from_index(previous).next()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
