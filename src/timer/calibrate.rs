/*
 * Busy-Wait Calibration
 *
 * Estimates how many `busy_wait` iterations fit in one timer tick. The
 * estimate is the largest power of two that still completes inside a tick,
 * refined by trying the next nine lower bits one at a time.
 */

use core::sync::atomic::{Ordering, compiler_fence};

use super::Timer;
use super::busy_wait::busy_wait;

/// First loop count tried by the doubling search
pub const INITIAL_LOOPS: u32 = 1 << 10;

/// Number of bits below the leading bit that are refined
pub const REFINE_BITS: u32 = 9;

/// Search for the largest loop count `too_many_loops` accepts
///
/// `too_many_loops(n)` must return true when `n` iterations overrun a tick.
///
/// # Panics
/// If the doubling search overflows `u32`.
pub fn search_loops_per_tick(mut too_many_loops: impl FnMut(u32) -> bool) -> u32 {
    let mut loops_per_tick = INITIAL_LOOPS;
    while !too_many_loops(loops_per_tick << 1) {
        loops_per_tick <<= 1;
        assert!(loops_per_tick != 0, "loops_per_tick overflowed during calibration");
    }

    let high_bit = loops_per_tick;
    let mut test_bit = high_bit >> 1;
    while test_bit != high_bit >> (REFINE_BITS + 1) {
        if !too_many_loops(loops_per_tick | test_bit) {
            loops_per_tick |= test_bit;
        }
        test_bit >>= 1;
    }
    loops_per_tick
}

impl Timer {
    /// Calibrate `loops_per_tick` against the running tick counter
    ///
    /// Takes a few dozen ticks. Re-running replaces the previous estimate.
    ///
    /// # Panics
    /// If interrupts are disabled (the tick counter would never move).
    pub fn calibrate(&self) {
        assert!(
            self.irq.are_enabled(),
            "timer calibration requires interrupts enabled"
        );
        log::info!("Calibrating timer...");

        let loops_per_tick = search_loops_per_tick(|loops| self.too_many_loops(loops));
        self.loops_per_tick.store(loops_per_tick, Ordering::SeqCst);

        log::info!(
            "Timer calibrated: {} loops/s",
            u64::from(loops_per_tick) * u64::from(self.frequency_hz)
        );
    }

    /// True if `loops` iterations of `busy_wait` span a tick boundary
    fn too_many_loops(&self, loops: u32) -> bool {
        // Start measuring right after a tick edge
        let start = self.now();
        while self.now() == start {
            core::hint::spin_loop();
        }

        let start = self.now();
        busy_wait(i64::from(loops));

        compiler_fence(Ordering::SeqCst);
        start != self.now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_finds_power_of_two_then_refines() {
        // Capacity of 300_000 loops: leading bit 2^18, refined downward
        let result = search_loops_per_tick(|loops| loops > 300_000);
        assert_eq!(result, 299_520);
    }

    #[test]
    fn test_search_exact_power_of_two() {
        assert_eq!(search_loops_per_tick(|loops| loops > 1 << 20), 1 << 20);
    }

    #[test]
    fn test_search_slow_cpu_keeps_initial_estimate() {
        // Even 2048 loops overrun: only the refinement bits below 1024 are tried
        let result = search_loops_per_tick(|loops| loops > 1500);
        assert_eq!(result, 1024 | 256 | 128 | 64 | 16 | 8 | 4);
        assert!(result <= 1500);
    }

    #[test]
    fn test_search_result_fits_and_double_does_not() {
        for capacity in [5_000u32, 77_777, 1_234_567, 40_000_000] {
            let result = search_loops_per_tick(|loops| loops > capacity);
            assert!(result <= capacity);
            assert!(result.saturating_mul(2) > capacity);
        }
    }

    #[test]
    fn test_search_only_probes_bounded_number_of_times() {
        let mut probes = 0;
        search_loops_per_tick(|loops| {
            probes += 1;
            loops > 1 << 16
        });
        // 6 doublings accepted, 1 rejected, then 9 refinement probes
        assert_eq!(probes, 7 + 9);
    }

    #[test]
    #[should_panic(expected = "overflowed")]
    fn test_search_overflow_is_fatal() {
        search_loops_per_tick(|_| false);
    }
}
