/*
 * x86_64 Architecture Support Module
 *
 * This module contains the x86_64-specific pieces the timer subsystem
 * needs from the CPU itself. Port I/O for the 8254 lives with the driver
 * in `drivers::system::pit`.
 *
 * Submodules:
 * - interrupts: RFLAGS.IF based interrupt control
 */

pub mod interrupts;

pub use interrupts::X86Interrupts;
