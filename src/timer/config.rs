//! Timer configuration and setup errors.

use core::fmt;

/// Lowest rate the 8254 can produce with a 16-bit divisor
pub const MIN_FREQUENCY_HZ: u32 = 19;

/// Highest supported tick rate
pub const MAX_FREQUENCY_HZ: u32 = 1000;

/// Default tick rate (10ms per tick)
pub const DEFAULT_FREQUENCY_HZ: u32 = 100;

/// Interrupt vector of IRQ0 after the PIC remap
pub const DEFAULT_TIMER_VECTOR: u8 = 0x20;

/// Timer setup parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    frequency_hz: u32,
    vector: u8,
}

impl TimerConfig {
    /// Validate a tick frequency
    pub fn new(frequency_hz: u32) -> Result<Self, TimerError> {
        if !(MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ).contains(&frequency_hz) {
            return Err(TimerError::FrequencyOutOfRange(frequency_hz));
        }
        Ok(Self {
            frequency_hz,
            vector: DEFAULT_TIMER_VECTOR,
        })
    }

    /// Use a different interrupt vector for the timer handler
    pub fn with_vector(mut self, vector: u8) -> Self {
        self.vector = vector;
        self
    }

    /// Ticks per second
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub fn vector(&self) -> u8 {
        self.vector
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            vector: DEFAULT_TIMER_VECTOR,
        }
    }
}

/// Timer setup errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// Requested tick rate is outside MIN_FREQUENCY_HZ..=MAX_FREQUENCY_HZ
    FrequencyOutOfRange(u32),
    /// `timer::init` was already called
    AlreadyInitialized,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::FrequencyOutOfRange(hz) => write!(
                f,
                "Timer frequency {}Hz outside {}..={}Hz",
                hz, MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ
            ),
            TimerError::AlreadyInitialized => write!(f, "Timer already initialized"),
        }
    }
}
