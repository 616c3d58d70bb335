//! The joystick display loop.
//!
//! Every iteration: sample both axes, read the control snapshot, drive the
//! PWM LEDs, redraw the whole frame and flush it, then sleep. Runs forever.

use core::cell::Cell;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant, Timer};

use crate::adc_reader::JoystickSampler;
use crate::constants::timing;
use crate::controls::CONTROLS;
use crate::frame::Frame;
use crate::log_info;
use crate::oled::{self, Oled};
use crate::pwm_controller::LedPwm;

/// Most recent frame, for the console's `status` command
static LAST_FRAME: Mutex<CriticalSectionRawMutex, Cell<Option<Frame>>> =
    Mutex::new(Cell::new(None));

pub fn last_frame() -> Option<Frame> {
    LAST_FRAME.lock(|frame| frame.get())
}

pub struct DisplayLoop<'d> {
    sampler: JoystickSampler<'d>,
    leds: LedPwm<'d>,
    /// `None` when the panel failed to initialize; LEDs keep running
    display: Option<Oled<'d>>,
    last_status_ms: u64,
}

impl<'d> DisplayLoop<'d> {
    pub fn new(sampler: JoystickSampler<'d>, leds: LedPwm<'d>, display: Option<Oled<'d>>) -> Self {
        Self {
            sampler,
            leds,
            display,
            last_status_ms: 0,
        }
    }

    pub async fn run(mut self) -> ! {
        info!("Display loop running");

        loop {
            self.step().await;
            Timer::after(Duration::from_millis(timing::FRAME_INTERVAL_MS)).await;
        }
    }

    async fn step(&mut self) {
        let reading = self.sampler.sample().await;
        let frame = Frame::plan(reading, CONTROLS.snapshot());

        self.leds.set_levels(frame.leds);

        if let Some(display) = self.display.as_mut() {
            if let Err(e) = oled::present(display, &frame) {
                oled::report_error("frame flush", &e);
            }
        }

        LAST_FRAME.lock(|last| last.set(Some(frame)));
        self.log_frame(&frame);
    }

    fn log_frame(&mut self, frame: &Frame) {
        trace!("{}", frame);

        let now_ms = Instant::now().as_millis();
        if now_ms.saturating_sub(self.last_status_ms) < timing::STATUS_LOG_INTERVAL_MS {
            return;
        }
        self.last_status_ms = now_ms;

        log_info!(
            "[JOYSTICK] Raw: ({}, {}) | Square: ({}, {}) | LED R/B: {}/{} | Border: {}",
            frame.reading.x_raw,
            frame.reading.y_raw,
            frame.square.x,
            frame.square.y,
            frame.leds.red,
            frame.leds.blue,
            frame.border.name()
        );
    }
}
