/*
 * Scheduler Interface
 *
 * The timer subsystem does not own threads. It only needs to know which
 * thread is running, to park it, to make it runnable again and to give the
 * scheduler its per-tick accounting callback. This module defines that
 * boundary.
 */

pub mod traits;

use core::fmt;

pub use traits::SchedulerHooks;

/// Thread identifier
///
/// A plain id, not a reference: holding one never keeps a thread alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(pub usize);

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread({})", self.0)
    }
}
