//! # I2C OLED Module
//!
//! SSD1306 128x64 monochrome OLED on I2C1, driven through the `ssd1306`
//! crate in buffered graphics mode. Drawing goes into the driver's RAM
//! buffer via `embedded-graphics`; [`present`] pushes a whole frame.
//!
//! ## Wiring
//!
//! - SDA -> GPIO 14 (I2C1 SDA)
//! - SCL -> GPIO 15 (I2C1 SCL)
//! - Address 0x3C, 400kHz

use defmt::*;
use display_interface::DisplayError;
use embassy_rp::{
    i2c::{Blocking, Config as I2cConfig, I2c},
    peripherals::{I2C1, PIN_14, PIN_15},
    Peri,
};
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

use crate::constants::{i2c, pins};
use crate::frame::Frame;
use crate::log_info;

pub type Oled<'d> = Ssd1306<
    I2CInterface<I2c<'d, I2C1, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Bring up I2C1 and the SSD1306, then push one blank frame.
pub fn init_oled<'d>(
    i2c_peripheral: Peri<'d, I2C1>,
    sda_pin: Peri<'d, PIN_14>,
    scl_pin: Peri<'d, PIN_15>,
) -> Result<Oled<'d>, DisplayError> {
    let mut config = I2cConfig::default();
    config.frequency = i2c::FAST_FREQUENCY_HZ;

    let bus = I2c::new_blocking(i2c_peripheral, scl_pin, sda_pin, config);

    debug!(
        "Initializing SSD1306 at {=u8:#x} (SDA {}, SCL {})",
        i2c::SSD1306_ADDRESS,
        pins::I2C_SDA,
        pins::I2C_SCL
    );

    // I2CDisplayInterface::new uses the default 0x3C address
    let interface = I2CDisplayInterface::new(bus);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();

    display.init()?;
    display.clear_buffer();
    display.flush()?;

    Ok(display)
}

/// Render `frame` into the buffer and flush it to the panel.
pub fn present(display: &mut Oled<'_>, frame: &Frame) -> Result<(), DisplayError> {
    frame.draw(display)?;
    display.flush()
}

/// Log a display failure to both sinks
pub fn report_error(context: &str, error: &DisplayError) {
    warn!("[OLED] {} failed: {}", context, Debug2Format(error));
    log_info!("[OLED] {} failed: {:?}", context, error);
}
