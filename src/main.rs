//! RustAtCommands - demo firmware
//!
//! 1. Initialize console UART and debug UART
//! 2. Register the demo command set
//! 3. Poll the console from the main loop

#![no_std]
#![no_main]

extern crate alloc;

use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::sys as esp_idf_sys;

use core::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use rust_at_commands::{
    uart_io::{init_console_uart, init_debug_uart, UartIoConfig, UartLineIo},
    CommandKind, Console, ParameterType, TypedValue,
};

// Demo state touched by callbacks
static SENSOR_READS: AtomicU32 = AtomicU32::new(0);
static INFO_QUERIES: AtomicU32 = AtomicU32::new(0);
static LAST_TEST_VALUE: AtomicI32 = AtomicI32::new(0);

#[no_mangle]
fn main() {
    // Initialize ESP-IDF
    esp_idf_sys::link_patches();

    let Ok(peripherals) = Peripherals::take() else {
        return;
    };
    let pins = peripherals.pins;
    let config = UartIoConfig::default();

    // Console on UART0 (USB-UART bridge pins)
    #[cfg(feature = "esp32p4")]
    let uart = init_console_uart(peripherals.uart0, pins.gpio37, pins.gpio38, &config);
    #[cfg(not(feature = "esp32p4"))]
    let uart = init_console_uart(peripherals.uart0, pins.gpio43, pins.gpio44, &config);

    let Ok(uart) = uart else {
        return;
    };

    // Diagnostics on UART1 TX (GPIO6); the console still works without them
    let debug = init_debug_uart(peripherals.uart1, pins.gpio6, &config).ok();

    let mut console = Console::with_defaults(UartLineIo::new(uart, debug));
    register_commands(&mut console);
    console.print_banner();

    loop {
        // One line per iteration, nothing to do if none is complete
        console.poll();

        unsafe {
            esp_idf_sys::vTaskDelay(1);
        }
    }
}

/// Demo command set: `AT+INFO?`, `AT+TESTS=<P1:STRING>,<P2:INTEGER>,<P3:FLOAT>`, `AT+SENSORS`
fn register_commands(console: &mut Console<UartLineIo<'_>>) {
    // Failures are already reported on the debug channel
    let _ = console.register_command("INFO", CommandKind::Read);
    let _ = console.register_command("TESTS", CommandKind::Write);
    let _ = console.register_command("SENSORS", CommandKind::Run);

    let _ = console.add_parameter("TESTS", "P1", ParameterType::String);
    let _ = console.add_parameter("TESTS", "P2", ParameterType::Integer);
    let _ = console.add_parameter("TESTS", "P3", ParameterType::Float);

    let _ = console.set_read_callback("INFO", || {
        INFO_QUERIES.fetch_add(1, Ordering::Relaxed);
    });
    let _ = console.set_write_callback("TESTS", |values: &[TypedValue]| {
        if let Some(v) = values.get(1).and_then(TypedValue::as_integer) {
            LAST_TEST_VALUE.store(v, Ordering::Relaxed);
        }
    });
    let _ = console.set_run_callback("SENSORS", || {
        SENSOR_READS.fetch_add(1, Ordering::Relaxed);
    });

    console.debug_command("INFO");
    console.debug_command("TESTS");
    console.debug_command("SENSORS");
}
