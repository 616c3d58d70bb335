//! USB CDC-ACM diagnostic console.
//!
//! Other tasks queue lines with [`log_info!`](crate::log_info); this task writes them to the host terminal and runs a
//! small read-only shell for inspecting the control state and last frame.

use embassy_futures::select::{select3, Either3};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler};
use embassy_rp::{bind_interrupts, Peri};
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::{with_timeout, Duration, Timer};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Config};
use heapless::String;

use crate::constants::{adc, buffers, timing};
use crate::controls::CONTROLS;
use crate::display_loop::last_frame;

bind_interrupts!(struct UsbIrqs {
    USBCTRL_IRQ => InterruptHandler<USB>;
});

type Console<'a> = CdcAcmClass<'a, Driver<'a, USB>>;

/// Message types that can be sent to the USB serial output
#[derive(Clone, Debug)]
pub enum SerialMessage {
    /// Custom formatted message with heapless string
    Formatted(String<{ buffers::MESSAGE_BUFFER_SIZE }>),
}

/// Global channel for sending messages to USB serial from anywhere in the code
pub static SERIAL_CHANNEL: Channel<
    ThreadModeRawMutex,
    SerialMessage,
    { buffers::SERIAL_CHANNEL_DEPTH },
> = Channel::new();

pub fn get_serial_sender(
) -> Sender<'static, ThreadModeRawMutex, SerialMessage, { buffers::SERIAL_CHANNEL_DEPTH }> {
    SERIAL_CHANNEL.sender()
}

/// Queue a formatted line without waiting; dropped if the channel is full
pub fn send_sync_formatted_message(message: String<{ buffers::MESSAGE_BUFFER_SIZE }>) {
    let _ = get_serial_sender().try_send(SerialMessage::Formatted(message));
}

/// Format a line into a heapless buffer and queue it for the USB console
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {{
        let mut msg: heapless::String<{ $crate::constants::buffers::MESSAGE_BUFFER_SIZE }> =
            heapless::String::new();
        let _ = core::fmt::write(&mut msg, format_args!($($arg)*));
        $crate::usb_serial::send_sync_formatted_message(msg);
    }};
}

#[embassy_executor::task]
pub async fn usb_serial_task(usb: Peri<'static, USB>) -> ! {
    let driver = Driver::new(usb, UsbIrqs);

    let mut config = Config::new(0xc0de, 0xcafe);
    config.manufacturer = Some("Raspberry Pi");
    config.product = Some("Pico 2 Joystick Display");
    config.serial_number = Some("12345678");
    config.max_power = 100;
    config.max_packet_size_0 = 64;

    let mut config_descriptor = [0; 256];
    let mut bos_descriptor = [0; 256];
    let mut control_buf = [0; 64];

    let mut state = State::new();
    let mut builder = Builder::new(
        driver,
        config,
        &mut config_descriptor,
        &mut bos_descriptor,
        &mut [], // no msos descriptors
        &mut control_buf,
    );

    let mut class = CdcAcmClass::new(&mut builder, &mut state, 64);
    let mut usb = builder.build();
    let usb_fut = usb.run();

    let message_receiver = SERIAL_CHANNEL.receiver();

    let comm_fut = async {
        loop {
            class.wait_connection().await;
            defmt::info!("USB Serial connected");

            send_welcome_message(&mut class).await;

            let mut read_buf = [0u8; buffers::USB_PACKET_SIZE];
            let mut line_buffer = [0u8; buffers::LINE_BUFFER_SIZE];
            let mut line_pos = 0usize;
            let mut heartbeat_counter = 0u32;

            // Input, queued log lines and the heartbeat share one wait
            loop {
                let result = select3(
                    with_timeout(
                        Duration::from_millis(timing::USB_READ_TIMEOUT_MS),
                        class.read_packet(&mut read_buf),
                    ),
                    message_receiver.receive(),
                    Timer::after(Duration::from_millis(timing::USB_HEARTBEAT_MS)),
                )
                .await;

                match result {
                    Either3::First(Ok(Ok(n))) => {
                        for &byte in &read_buf[..n] {
                            match byte {
                                // Enter runs the buffered line
                                b'\r' | b'\n' => {
                                    let _ = class.write_packet(b"\r\n").await;
                                    if line_pos > 0 {
                                        process_command(&mut class, &line_buffer[..line_pos])
                                            .await;
                                        line_pos = 0;
                                    }
                                    send_prompt(&mut class).await;
                                }
                                // Backspace / DEL
                                b'\x08' | b'\x7f' => {
                                    if line_pos > 0 {
                                        line_pos -= 1;
                                        let _ = class.write_packet(b"\x08 \x08").await;
                                    }
                                }
                                // Ctrl+C drops the current line
                                b'\x03' => {
                                    let _ = class.write_packet(b"^C\r\n").await;
                                    line_pos = 0;
                                    send_prompt(&mut class).await;
                                }
                                // Printable ASCII is echoed; bell when the line is full
                                0x20..=0x7E => {
                                    if line_pos < line_buffer.len() - 1 {
                                        line_buffer[line_pos] = byte;
                                        line_pos += 1;
                                        let _ = class.write_packet(&[byte]).await;
                                    } else {
                                        let _ = class.write_packet(b"\x07").await;
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    // Connection lost
                    Either3::First(Ok(Err(_))) => break,
                    // Read timeout
                    Either3::First(Err(_)) => {}
                    Either3::Second(message) => {
                        send_module_message(&mut class, message).await;
                    }
                    Either3::Third(_) => {
                        heartbeat_counter += 1;
                        send_heartbeat(&mut class, heartbeat_counter, &line_buffer, line_pos)
                            .await;
                    }
                }
            }
        }
    };

    // Device stack and console run side by side forever
    embassy_futures::join::join(usb_fut, comm_fut).await;

    core::unreachable!()
}

async fn send_module_message(class: &mut Console<'_>, message: SerialMessage) {
    let _ = class.write_packet(b"\r\n").await;
    let SerialMessage::Formatted(formatted_msg) = message;
    write_long(class, formatted_msg.as_bytes()).await;
    let _ = class.write_packet(b"\r\n").await;
}

/// Write a buffer longer than one USB packet
async fn write_long(class: &mut Console<'_>, bytes: &[u8]) {
    for chunk in bytes.chunks(buffers::USB_PACKET_SIZE) {
        if class.write_packet(chunk).await.is_err() {
            return;
        }
    }
}

async fn send_welcome_message(class: &mut Console<'_>) {
    let _ = class
        .write_packet(b"\r\nPico 2 Joystick Display Ready\r\n")
        .await;
    let _ = class
        .write_packet(b"Commands: status, help, clear\r\n")
        .await;
    send_prompt(class).await;
}

async fn send_prompt(class: &mut Console<'_>) {
    let _ = class.write_packet(b"> ").await;
}

/// Periodic liveness line; restores any partially typed command afterwards
async fn send_heartbeat(
    class: &mut Console<'_>,
    counter: u32,
    line_buffer: &[u8],
    line_pos: usize,
) {
    let mut status_msg: String<64> = String::new();
    let _ = core::fmt::write(
        &mut status_msg,
        format_args!("\r\n[Heartbeat #{}]\r\n", counter),
    );

    if class.write_packet(status_msg.as_bytes()).await.is_err() {
        return;
    }

    send_prompt(class).await;

    if line_pos > 0 {
        let _ = class.write_packet(&line_buffer[..line_pos]).await;
    }
}

async fn process_command(class: &mut Console<'_>, data: &[u8]) {
    defmt::info!("Received command: {=[u8]:a}", data);

    match data {
        b"status" => send_status(class).await,
        b"help" => send_help(class).await,
        b"clear" => {
            // ESC[2J clears the screen, ESC[H homes the cursor
            let _ = class.write_packet(b"\x1B[2J\x1B[H").await;
            let _ = class
                .write_packet(b"Pico 2 Joystick Display Ready\r\n")
                .await;
        }
        _ => {
            let _ = class
                .write_packet(b"Unknown command. Type 'help' for available commands.\r\n")
                .await;
        }
    }
}

async fn send_status(class: &mut Console<'_>) {
    let controls = CONTROLS.snapshot();
    let mut msg: String<{ buffers::MESSAGE_BUFFER_SIZE }> = String::new();
    let _ = core::fmt::write(
        &mut msg,
        format_args!(
            "PWM: {} | Border: {} ({})\r\n",
            if controls.pwm_active { "on" } else { "off" },
            controls.border_style as u8,
            controls.border_style.name()
        ),
    );
    write_long(class, msg.as_bytes()).await;

    msg.clear();
    match last_frame() {
        Some(frame) => {
            let x_mv = adc::raw_to_millivolts(frame.reading.x_raw);
            let y_mv = adc::raw_to_millivolts(frame.reading.y_raw);
            let _ = core::fmt::write(
                &mut msg,
                format_args!(
                    "@{}ms Raw: ({}, {}) | V: ({}.{:03}V, {}.{:03}V) | Square: ({}, {}) | LED R/B: {}/{}\r\n",
                    frame.reading.timestamp_ms,
                    frame.reading.x_raw,
                    frame.reading.y_raw,
                    x_mv / 1000,
                    x_mv % 1000,
                    y_mv / 1000,
                    y_mv % 1000,
                    frame.square.x,
                    frame.square.y,
                    frame.leds.red,
                    frame.leds.blue
                ),
            );
        }
        None => {
            let _ = msg.push_str("No frame rendered yet\r\n");
        }
    }
    write_long(class, msg.as_bytes()).await;
}

async fn send_help(class: &mut Console<'_>) {
    let _ = class.write_packet(b"Available commands:\r\n").await;
    let _ = class
        .write_packet(b"  status - Show control state and last frame\r\n")
        .await;
    let _ = class.write_packet(b"  help   - Show this help\r\n").await;
    let _ = class.write_packet(b"  clear  - Clear screen\r\n").await;
}
