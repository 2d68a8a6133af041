/*
 * Serial Log Sink
 *
 * COM2 carries kernel log output so it can be captured outside the guest
 * while COM1 stays free for the console.
 */

use core::fmt::Write;

use lazy_static::lazy_static;
use spin::Mutex;
use uart_16550::SerialPort;
use x86_64::instructions::interrupts;

use crate::utils::logger::LogSink;

/// COM2 base port
pub const COM2_BASE: u16 = 0x2F8;

lazy_static! {
    /// Mutex-protected COM2 serial port, initialized on first use
    pub static ref COM2: Mutex<SerialPort> = {
        let mut port = unsafe { SerialPort::new(COM2_BASE) };
        port.init();
        Mutex::new(port)
    };
}

/// Log sink writing to COM2
pub struct Com2Sink;

/// Shared instance to hand to `utils::logger::init`
pub static COM2_SINK: Com2Sink = Com2Sink;

impl LogSink for Com2Sink {
    fn write_str(&self, s: &str) {
        // Masked so the timer IRQ cannot preempt a holder of the port lock
        interrupts::without_interrupts(|| {
            let _ = COM2.lock().write_str(s);
        });
    }
}
