#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_time::{Duration, Timer};

use rp_pico2_joystick_display::adc_reader::JoystickSampler;
use rp_pico2_joystick_display::buttons::button_task;
use rp_pico2_joystick_display::constants::{pins, timing};
use rp_pico2_joystick_display::controls::Button;
use rp_pico2_joystick_display::display_loop::DisplayLoop;
use rp_pico2_joystick_display::log_info;
use rp_pico2_joystick_display::oled;
use rp_pico2_joystick_display::pwm_controller::LedPwm;
use rp_pico2_joystick_display::usb_serial;

use {defmt_rtt as _, panic_probe as _};

#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

// Program metadata for `picotool info`.
#[unsafe(link_section = ".bi_entries")]
#[used]
pub static PICOTOOL_ENTRIES: [embassy_rp::binary_info::EntryAddr; 4] = [
    embassy_rp::binary_info::rp_program_name!(c"Joystick Display"),
    embassy_rp::binary_info::rp_program_description!(
        c"Joystick-driven square on an SSD1306 OLED with PWM LED feedback"
    ),
    embassy_rp::binary_info::rp_cargo_version!(),
    embassy_rp::binary_info::rp_program_build_attribute!(),
];

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    info!("Joystick Display starting");

    unwrap!(spawner.spawn(usb_serial::usb_serial_task(p.USB)));

    // Buttons are active low with internal pull-ups
    let joystick_button = Input::new(p.PIN_22, Pull::Up);
    let button_a = Input::new(p.PIN_5, Pull::Up);
    let green_led = Output::new(p.PIN_11, Level::Low);

    unwrap!(spawner.spawn(button_task(
        joystick_button,
        Button::Joystick,
        Some(green_led)
    )));
    unwrap!(spawner.spawn(button_task(button_a, Button::A, None)));

    info!(
        "Buttons: joystick GPIO {}, A GPIO {}, green LED GPIO {}",
        pins::JOYSTICK_BUTTON,
        pins::BUTTON_A,
        pins::LED_GREEN
    );

    let leds = LedPwm::new(p.PWM_SLICE6, p.PIN_12, p.PIN_13);

    let display = match oled::init_oled(p.I2C1, p.PIN_14, p.PIN_15) {
        Ok(display) => {
            info!("Display initialized");
            log_info!("Display initialized");
            Timer::after(Duration::from_millis(timing::DISPLAY_SETTLE_MS)).await;
            Some(display)
        }
        Err(e) => {
            oled::report_error("display init", &e);
            None
        }
    };

    let sampler = JoystickSampler::new(p.ADC, p.PIN_26, p.PIN_27);

    DisplayLoop::new(sampler, leds, display).run().await
}
