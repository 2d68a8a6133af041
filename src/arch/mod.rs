/*
 * Architecture Abstraction Layer
 *
 * This module provides the architecture-neutral interrupt masking layer
 * used by the timer subsystem, plus the x86_64 implementation of it.
 *
 * Why this is important:
 * - Provides a clean interface between generic timer code and arch-specific code
 * - Lets the timer core run under the host test harness with mock interrupts
 * - Keeps privileged instructions out of portable code
 */

pub mod interrupts;

#[cfg(target_arch = "x86_64")]
pub mod x86_64;

pub use interrupts::{InterruptControl, InterruptGuard, IrqMutex};
