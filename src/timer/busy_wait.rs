//! Calibrated spin delay.

use core::sync::atomic::{Ordering, compiler_fence};

/// Spin for `loops` iterations; non-positive counts return immediately
///
/// Never inlined: code alignment changes the cost of each iteration, and
/// calibration is only meaningful if every caller runs the same loop body.
/// The fence keeps the optimizer from collapsing the loop.
#[inline(never)]
pub fn busy_wait(mut loops: i64) {
    while loops > 0 {
        compiler_fence(Ordering::SeqCst);
        loops -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_returns() {
        busy_wait(0);
        busy_wait(-42);
    }

    #[test]
    fn test_small_spin_completes() {
        busy_wait(10_000);
    }
}
