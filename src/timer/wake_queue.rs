/*
 * Wake Queue
 *
 * Sleeping threads ordered by the tick at which they become runnable.
 * Threads insert themselves from thread context (interrupts masked); the
 * timer interrupt pops every entry that is due.
 *
 * Ordering is (deadline, sequence): the sequence number is handed out at
 * insertion, so threads sharing a deadline wake in the order they slept.
 */

use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

use super::Ticks;
use crate::scheduler::ThreadId;

/// One sleeping thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepEntry {
    pub thread: ThreadId,
    pub deadline: Ticks,
    seq: u64,
}

impl Ord for SleepEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

impl PartialOrd for SleepEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of sleeping threads keyed by wake deadline
#[derive(Debug, Default)]
pub struct WakeQueue {
    heap: BinaryHeap<Reverse<SleepEntry>>,
    next_seq: u64,
}

impl WakeQueue {
    pub const fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Enqueue `thread` to be woken once the tick count reaches `deadline`
    pub fn insert(&mut self, thread: ThreadId, deadline: Ticks) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(SleepEntry {
            thread,
            deadline,
            seq,
        }));
    }

    /// Pop every entry with `deadline <= now`, earliest first
    ///
    /// Stops at the first entry still in the future; nothing behind it can
    /// be due. Returns the number of threads handed to `wake`.
    pub fn drain_due(&mut self, now: Ticks, mut wake: impl FnMut(ThreadId)) -> usize {
        let mut woken = 0;
        while let Some(Reverse(front)) = self.heap.peek() {
            if front.deadline > now {
                break;
            }
            let Some(Reverse(entry)) = self.heap.pop() else {
                panic!("wake queue emptied between peek and pop");
            };
            wake(entry.thread);
            woken += 1;
        }
        woken
    }

    /// Deadline of the next thread to wake
    pub fn peek_deadline(&self) -> Option<Ticks> {
        self.heap.peek().map(|Reverse(entry)| entry.deadline)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Entries in wake order
    #[cfg(test)]
    pub fn iter_sorted(&self) -> impl Iterator<Item = SleepEntry> {
        let mut entries: alloc::vec::Vec<SleepEntry> =
            self.heap.iter().map(|Reverse(entry)| *entry).collect();
        entries.sort_unstable();
        entries.into_iter()
    }
}
