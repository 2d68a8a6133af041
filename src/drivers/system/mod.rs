/*
 * System Controller Drivers
 *
 * This module contains drivers for system-level hardware controllers.
 * Currently only the 8254 timer, which drives the kernel tick.
 */

pub mod pit;

pub use pit::{PIT_INPUT_HZ, PitCommand, divisor_for};

#[cfg(target_arch = "x86_64")]
pub use pit::{PIT, Pit8254};
