/*
 * Scheduler Trait Definitions
 *
 * This module defines the mechanism interface the timer uses to interact
 * with the scheduler. The timer holds a `&'static dyn SchedulerHooks` and
 * never touches thread structures directly.
 *
 * This separation allows:
 * 1. Linking the timer against any scheduler implementation
 * 2. Testing the timer with mock schedulers on the host
 * 3. Clear ownership boundaries (the sleep queue never owns a thread)
 */

use super::ThreadId;

/// Scheduler operations consumed by the timer subsystem
///
/// `block_current_thread` is always called with interrupts masked and must
/// return only once the thread has been made runnable again and
/// rescheduled. `wake_thread` and `on_tick` are called from the timer
/// interrupt handler and must not block.
pub trait SchedulerHooks: Sync {
    /// Id of the thread executing the caller
    fn current_thread(&self) -> ThreadId;

    /// Block the calling thread until `wake_thread` is called for it
    ///
    /// A wake delivered before the thread actually blocks must not be lost.
    fn block_current_thread(&self);

    /// Transition a blocked thread back to runnable
    fn wake_thread(&self, tid: ThreadId);

    /// Per-tick accounting (time slice expiry, preemption requests)
    fn on_tick(&self);

    /// Whether the scheduler still owns a thread with this id
    ///
    /// Used to catch a sleeping thread being destroyed while enqueued.
    fn thread_exists(&self, tid: ThreadId) -> bool;
}
