/*
 * Interrupt Management Module
 *
 * This module provides the x86_64 implementation of `InterruptControl`,
 * a thin wrapper over the `cli`/`sti` instructions and the IF flag.
 *
 * Why this is important:
 * - Provides safe abstractions for interrupt control
 * - Essential for creating atomic sections in kernel code
 * - Forms the basis of the timer's interrupt-masked critical sections
 */

use x86_64::instructions::interrupts;

use crate::arch::interrupts::InterruptControl;

/// Interrupt control for the executing x86_64 CPU
#[derive(Debug, Default, Clone, Copy)]
pub struct X86Interrupts;

/// Shared instance to hand to the timer as a `&'static dyn InterruptControl`
pub static X86_INTERRUPTS: X86Interrupts = X86Interrupts;

impl InterruptControl for X86Interrupts {
    /// Returns true if RFLAGS.IF is set
    fn are_enabled(&self) -> bool {
        interrupts::are_enabled()
    }

    /// Enable interrupts globally
    ///
    /// Should only be called after the IDT has been properly initialized.
    fn enable(&self) {
        interrupts::enable();
    }

    /// Disable interrupts globally
    fn disable(&self) {
        interrupts::disable();
    }
}
