use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_time::Instant;

use crate::controls::{Button, PressOutcome, CONTROLS};
use crate::log_info;

/// Button Task
///
/// One instance per button. Waits for the falling edge (pressed, pull-up
/// input), then runs the shared debounce. Only the joystick button task owns
/// the green LED, which flips on each accepted joystick press.
#[embassy_executor::task(pool_size = 2)]
pub async fn button_task(
    mut input: Input<'static>,
    button: Button,
    mut green_led: Option<Output<'static>>,
) -> ! {
    info!("Button task started for {}", button);

    loop {
        input.wait_for_falling_edge().await;

        // Milliseconds since boot, wrapping like the hardware timer
        let now_ms = Instant::now().as_millis() as u32;

        let outcome = CONTROLS.handle_press(button, now_ms);
        if outcome.toggles_green_led() {
            if let Some(led) = green_led.as_mut() {
                led.toggle();
            }
        }

        match outcome {
            PressOutcome::Suppressed => {
                debug!("{} press at {}ms debounced", button, now_ms);
            }
            PressOutcome::BorderAdvanced(style) => {
                info!("Border style -> {}", style);
                log_info!("[BUTTON] Border style {} ({})", style as u8, style.name());
            }
            PressOutcome::PwmToggled(active) => {
                info!("PWM LEDs active: {}", active);
                log_info!("[BUTTON] PWM LEDs {}", if active { "on" } else { "off" });
            }
        }
    }
}
