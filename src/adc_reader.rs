use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::gpio::Pull;
use embassy_rp::peripherals::{ADC, PIN_26, PIN_27};
use embassy_rp::{bind_interrupts, Peri};
use embassy_time::{Duration, Instant, Timer};

use crate::constants::{adc, pins, timing};
use crate::joystick::JoystickReading;
use crate::log_info;

bind_interrupts!(pub struct AdcIrqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Reads both joystick axes from the on-chip ADC.
///
/// A failed conversion keeps the previous value for that axis, starting from
/// the rest position.
pub struct JoystickSampler<'d> {
    adc: Adc<'d, Async>,
    x_axis: Channel<'d>,
    y_axis: Channel<'d>,
    last: JoystickReading,
}

impl<'d> JoystickSampler<'d> {
    pub fn new(
        adc_peripheral: Peri<'d, ADC>,
        x_pin: Peri<'d, PIN_26>,
        y_pin: Peri<'d, PIN_27>,
    ) -> Self {
        let adc = Adc::new(adc_peripheral, AdcIrqs, AdcConfig::default());
        let x_axis = Channel::new_pin(x_pin, Pull::None); // ADC0
        let y_axis = Channel::new_pin(y_pin, Pull::None); // ADC1

        info!(
            "Joystick sampler on GPIO {} (X) and GPIO {} (Y)",
            pins::JOYSTICK_X,
            pins::JOYSTICK_Y
        );

        Self {
            adc,
            x_axis,
            y_axis,
            last: JoystickReading::centered(0),
        }
    }

    /// Read X then Y, letting the input settle after each conversion.
    pub async fn sample(&mut self) -> JoystickReading {
        let x_raw = match self.adc.read(&mut self.x_axis).await {
            Ok(raw) => raw,
            Err(_) => {
                warn!("ADC{} read failed, reusing last sample", adc::X_CHANNEL);
                log_info!("[ADC] X read failed, reusing {}", self.last.x_raw);
                self.last.x_raw
            }
        };
        Timer::after(Duration::from_millis(timing::ADC_SETTLE_MS)).await;

        let y_raw = match self.adc.read(&mut self.y_axis).await {
            Ok(raw) => raw,
            Err(_) => {
                warn!("ADC{} read failed, reusing last sample", adc::Y_CHANNEL);
                log_info!("[ADC] Y read failed, reusing {}", self.last.y_raw);
                self.last.y_raw
            }
        };
        Timer::after(Duration::from_millis(timing::ADC_SETTLE_MS)).await;

        self.last = JoystickReading::new(x_raw, y_raw, Instant::now().as_millis());
        self.last
    }
}
