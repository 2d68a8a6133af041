/*
 * CLUU Tick Timer
 *
 * The timer subsystem of the CLUU microkernel: the periodic timer
 * interrupt, the monotonic tick counter, blocking tick sleeps and the
 * calibrated busy-wait used for sub-tick delays.
 *
 * Why this is important:
 * - Gives the scheduler its notion of time
 * - Lets threads sleep without burning CPU
 * - Keeps all interrupt-shared state behind masked critical sections
 *
 * The crate is `no_std` when linked into the kernel and uses the standard
 * test harness on the host, with mock collaborators standing in for the
 * CPU and the scheduler.
 */

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod arch;
pub mod drivers;
pub mod scheduler;
pub mod timer;
pub mod utils;

#[cfg(test)]
mod tests;

pub use scheduler::{SchedulerHooks, ThreadId};
pub use timer::{Collaborators, Ticks, Timer, TimerConfig, TimerError};
