//! Conversion of real-time durations into a sleep strategy.

/// Denominator for millisecond durations
pub const MILLIS_PER_SEC: i64 = 1_000;
/// Denominator for microsecond durations
pub const MICROS_PER_SEC: i64 = 1_000_000;
/// Denominator for nanosecond durations
pub const NANOS_PER_SEC: i64 = 1_000_000_000;

/// How a `num / denom` second delay is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepPlan {
    /// At least one whole tick: block on the wake queue
    Block(i64),
    /// Shorter than a tick: spin this many busy-wait loops
    Spin(i64),
}

impl SleepPlan {
    /// Plan a sleep of `num / denom` seconds at `frequency_hz` ticks per second
    ///
    /// Non-positive durations spin zero loops. Ticks are
    /// `num * frequency_hz / denom`, rounded down, computed in 128 bits and
    /// clamped to `i64::MAX`. When that is zero the delay is converted to
    /// busy-wait loops instead; numerator and denominator are both scaled
    /// down by 1000 first so the product with `loops_per_tick` does not
    /// overflow.
    ///
    /// # Panics
    /// On the spin path, if `denom` is not a multiple of 1000.
    pub fn for_real_time(num: i64, denom: i64, frequency_hz: u32, loops_per_tick: u32) -> Self {
        if num <= 0 {
            return SleepPlan::Spin(0);
        }

        let ticks = i128::from(num) * i128::from(frequency_hz) / i128::from(denom);
        if ticks > 0 {
            return SleepPlan::Block(i64::try_from(ticks).unwrap_or(i64::MAX));
        }

        // Sub-tick: num * frequency < denom, so num is small here
        assert!(
            denom % 1000 == 0,
            "sub-tick sleep denominator {} is not a multiple of 1000",
            denom
        );
        let frequency = i64::from(frequency_hz);
        let loops = i64::from(loops_per_tick) * num / 1000 * frequency / (denom / 1000);
        SleepPlan::Spin(loops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second_of_milliseconds_is_one_hundred_ticks() {
        assert_eq!(
            SleepPlan::for_real_time(1000, MILLIS_PER_SEC, 100, 0),
            SleepPlan::Block(100)
        );
    }

    #[test]
    fn test_rounds_down_to_whole_ticks() {
        // 25ms at 100Hz is 2.5 ticks
        assert_eq!(
            SleepPlan::for_real_time(25, MILLIS_PER_SEC, 100, 0),
            SleepPlan::Block(2)
        );
    }

    #[test]
    fn test_sub_tick_microseconds_spin() {
        // 1us at 100Hz with 1_000_000 loops per tick is 100 loops
        assert_eq!(
            SleepPlan::for_real_time(1, MICROS_PER_SEC, 100, 1_000_000),
            SleepPlan::Spin(100)
        );
    }

    #[test]
    fn test_sub_tick_milliseconds_spin() {
        // 5ms at 100Hz is half a tick
        assert_eq!(
            SleepPlan::for_real_time(5, MILLIS_PER_SEC, 100, 2_000_000),
            SleepPlan::Spin(1_000_000)
        );
    }

    #[test]
    fn test_nanosecond_spin_truncates_to_zero() {
        // loops_per_tick * 1 / 1000 truncates before the frequency multiply
        assert_eq!(
            SleepPlan::for_real_time(1, NANOS_PER_SEC, 100, 999),
            SleepPlan::Spin(0)
        );
    }

    #[test]
    fn test_scaling_avoids_overflow_for_large_loop_counts() {
        assert_eq!(
            SleepPlan::for_real_time(999_999, NANOS_PER_SEC, 1000, u32::MAX),
            SleepPlan::Spin(i64::from(u32::MAX) * 999_999 / 1000 * 1000 / 1_000_000)
        );
    }

    #[test]
    fn test_non_positive_duration_spins_nothing() {
        assert_eq!(
            SleepPlan::for_real_time(-10, MILLIS_PER_SEC, 100, 1_000_000),
            SleepPlan::Spin(0)
        );
        assert_eq!(
            SleepPlan::for_real_time(0, NANOS_PER_SEC, 100, 1_000_000),
            SleepPlan::Spin(0)
        );
    }

    #[test]
    fn test_most_negative_duration_spins_nothing() {
        assert_eq!(
            SleepPlan::for_real_time(i64::MIN, MILLIS_PER_SEC, 100, 1000),
            SleepPlan::Spin(0)
        );
    }

    #[test]
    fn test_huge_duration_does_not_overflow() {
        assert_eq!(
            SleepPlan::for_real_time(i64::MAX, MILLIS_PER_SEC, 100, 0),
            SleepPlan::Block(i64::MAX / 10)
        );
        assert_eq!(
            SleepPlan::for_real_time(i64::MAX / 10, MILLIS_PER_SEC, 100, 0),
            SleepPlan::Block(i64::MAX / 100)
        );
    }

    #[test]
    fn test_tick_count_saturates() {
        // One second per unit at 1000Hz does not fit in i64 ticks
        assert_eq!(
            SleepPlan::for_real_time(i64::MAX, 1, 1000, 0),
            SleepPlan::Block(i64::MAX)
        );
    }

    #[test]
    #[should_panic(expected = "not a multiple of 1000")]
    fn test_odd_denominator_is_fatal_on_spin_path() {
        SleepPlan::for_real_time(1, 1500, 100, 1000);
    }

    #[test]
    fn test_odd_denominator_allowed_when_blocking() {
        assert_eq!(SleepPlan::for_real_time(30, 1500, 100, 0), SleepPlan::Block(2));
    }
}
