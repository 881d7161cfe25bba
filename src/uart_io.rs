//! UART line I/O for ESP-IDF targets.
//!
//! Commands arrive and acknowledgements leave on the console UART. Diagnostics
//! go to a separate TX-only UART so they never mix with the wire protocol.
//!
//! # Hardware Setup
//!
//! ```text
//! Host ◀──────▶ UART0 (USB-UART bridge)    AT commands / OK / ERROR
//! ESP32-S3 GPIO6 (TX) ──────▶ USB-UART RX  diagnostics
//! ```
//!
//! **WARNING**: GPIO6 conflicts with Octal PSRAM. Only use on Quad flash boards!

use esp_idf_svc::hal::delay::NON_BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartDriver, UartTxDriver};
use esp_idf_svc::sys::EspError;

use crate::command::LineBuffer;
use crate::io::LineIo;

/// UART configuration.
pub struct UartIoConfig {
    pub baud_rate: u32,
    pub debug_baud_rate: u32,
}

impl Default for UartIoConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115200,
            debug_baud_rate: 115200,
        }
    }
}

/// [`LineIo`] over an ESP-IDF UART driver.
pub struct UartLineIo<'d> {
    uart: UartDriver<'d>,
    debug: Option<UartTxDriver<'d>>,
}

impl<'d> UartLineIo<'d> {
    /// Wrap already initialized drivers. Without a debug UART, diagnostics are dropped.
    pub fn new(uart: UartDriver<'d>, debug: Option<UartTxDriver<'d>>) -> Self {
        Self { uart, debug }
    }
}

impl LineIo for UartLineIo<'_> {
    fn poll_line(&mut self, terminator: u8, line: &mut LineBuffer) -> bool {
        let mut byte = [0u8; 1];
        loop {
            match self.uart.read(&mut byte, NON_BLOCK) {
                Ok(1) if byte[0] == terminator => return true,
                Ok(1) => {
                    // Overflow is recorded by the buffer, keep draining to the terminator
                    line.push(byte[0]);
                }
                _ => return false,
            }
        }
    }

    fn write_line(&mut self, payload: &[u8], terminator: &[u8]) {
        let _ = self.uart.write(payload);
        let _ = self.uart.write(terminator);
    }

    fn debug_write(&mut self, text: &str) {
        if let Some(debug) = self.debug.as_mut() {
            let _ = debug.write(text.as_bytes());
        }
    }
}

/// Initialize the console UART (RX + TX).
pub fn init_console_uart<'d, U: uart::Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    rx_pin: impl Peripheral<P = impl gpio::InputPin> + 'd,
    config: &UartIoConfig,
) -> Result<UartDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));

    UartDriver::new(
        uart,
        tx_pin,
        rx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}

/// Initialize a TX-only UART for diagnostics.
pub fn init_debug_uart<'d, U: uart::Uart>(
    uart: impl Peripheral<P = U> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    config: &UartIoConfig,
) -> Result<UartTxDriver<'d>, EspError> {
    let uart_config = uart::config::Config::default()
        .baudrate(esp_idf_svc::hal::units::Hertz(config.debug_baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
}
