/*
 * 8254 Programmable Interval Timer
 *
 * Channel 0 of the PIT is wired to IRQ0. It is programmed as a rate
 * generator (mode 2): the counter reloads the divisor and raises IRQ0 every
 * time it reaches one, giving PIT_INPUT_HZ / divisor interrupts per second.
 */

use bitflags::bitflags;

/// PIT input clock in Hz
pub const PIT_INPUT_HZ: u32 = 1_193_180;

/// Channel 0 data port
pub const PIT_CHANNEL0_PORT: u16 = 0x40;

/// Mode/command register
pub const PIT_COMMAND_PORT: u16 = 0x43;

bitflags! {
    /// 8254 control word
    ///
    /// The channel select bits (7:6) are zero for channel 0, so channel 0
    /// has no flag of its own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PitCommand: u8 {
        const BCD = 1 << 0;
        const MODE_RATE_GENERATOR = 0b010 << 1;
        const MODE_SQUARE_WAVE = 0b011 << 1;
        const ACCESS_LOBYTE = 1 << 4;
        const ACCESS_HIBYTE = 1 << 5;
        const CHANNEL_1 = 1 << 6;
        const CHANNEL_2 = 1 << 7;
    }
}

impl PitCommand {
    /// Channel 0, lobyte then hibyte, rate generator, binary counting
    pub const PERIODIC_TICK: PitCommand = PitCommand::ACCESS_LOBYTE
        .union(PitCommand::ACCESS_HIBYTE)
        .union(PitCommand::MODE_RATE_GENERATOR);
}

/// Channel 0 reload value for `frequency_hz`, rounded to nearest
///
/// Callers validate the frequency first; 19Hz is the lowest rate whose
/// divisor fits in 16 bits.
pub fn divisor_for(frequency_hz: u32) -> u16 {
    let divisor = (PIT_INPUT_HZ + frequency_hz / 2) / frequency_hz;
    divisor.min(u32::from(u16::MAX)) as u16
}

#[cfg(target_arch = "x86_64")]
mod hw {
    use x86_64::instructions::port::Port;

    use super::{PIT_CHANNEL0_PORT, PIT_COMMAND_PORT, PitCommand, divisor_for};
    use crate::timer::PeriodicTimer;

    /// The legacy 8254 at its fixed port range
    pub struct Pit8254;

    /// Shared instance to hand to `timer::init`
    pub static PIT: Pit8254 = Pit8254;

    impl PeriodicTimer for Pit8254 {
        fn program(&self, frequency_hz: u32) {
            let divisor = divisor_for(frequency_hz);
            log::info!(
                "Initializing PIT with {}Hz (divisor: {})",
                frequency_hz,
                divisor
            );

            let mut command = Port::<u8>::new(PIT_COMMAND_PORT);
            let mut channel0 = Port::<u8>::new(PIT_CHANNEL0_PORT);
            unsafe {
                command.write(PitCommand::PERIODIC_TICK.bits());
                channel0.write((divisor & 0xFF) as u8);
                channel0.write((divisor >> 8) as u8);
            }
        }
    }
}

#[cfg(target_arch = "x86_64")]
pub use hw::{PIT, Pit8254};
