/*
 * Hardware Drivers
 *
 * This module contains the hardware drivers the timer subsystem relies on.
 *
 * Driver categories:
 * - Serial: COM2 UART used as the log sink
 * - System: the 8254 Programmable Interval Timer
 */

#[cfg(target_arch = "x86_64")]
pub mod serial;
pub mod system;
