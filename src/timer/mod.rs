/*
 * System Tick Timer
 *
 * This module turns the periodic timer interrupt into a monotonic tick
 * counter, lets threads sleep for a number of ticks without spinning, and
 * provides a calibrated busy-wait for delays shorter than one tick.
 *
 * ## Description
 *
 * ### Core Functionality:
 * - **Tick Counter**: incremented exactly once per timer interrupt
 * - **Blocking Sleep**: a sleeping thread is parked on the wake queue and
 *   made runnable by the interrupt handler once its deadline tick arrives
 * - **Sub-tick Delays**: durations shorter than a tick spin for a number of
 *   loops measured by `calibrate()`
 *
 * ### Interrupt Safety:
 * - The tick counter and the wake queue are shared with the IRQ handler
 * - Every thread-context access masks interrupts for the shortest possible
 *   window through RAII guards, never through a blocking lock
 * - The handler itself never blocks, never allocates and never logs
 *
 * ### Integration Points:
 * - `init()` programs the hardware timer and registers `on_timer_interrupt`
 * - The scheduler is reached only through `SchedulerHooks`
 * - Free functions (`ticks()`, `sleep_ms()`, ...) use the global instance
 */

pub mod busy_wait;
pub mod calibrate;
pub mod config;
pub mod sleep;
pub mod wake_queue;

use core::sync::atomic::{AtomicU32, AtomicU64, Ordering, compiler_fence};

use spin::Once;

use crate::arch::interrupts::{InterruptControl, InterruptGuard, IrqMutex};
use crate::scheduler::SchedulerHooks;

pub use busy_wait::busy_wait;
pub use config::{TimerConfig, TimerError};
pub use sleep::{MICROS_PER_SEC, MILLIS_PER_SEC, NANOS_PER_SEC, SleepPlan};
pub use wake_queue::{SleepEntry, WakeQueue};

/// Timer ticks since boot
pub type Ticks = u64;

/// Name the timer handler is registered under
pub const TIMER_HANDLER_NAME: &str = "8254 Timer";

/// Registration of handlers with the interrupt dispatch layer
pub trait InterruptDispatch: Sync {
    /// Route `vector` to `handler`; the dispatch layer acknowledges the IRQ
    fn register_handler(&self, vector: u8, name: &'static str, handler: fn());
}

/// Hardware that raises the periodic timer interrupt
pub trait PeriodicTimer: Sync {
    /// Start interrupting `frequency_hz` times per second
    fn program(&self, frequency_hz: u32);
}

/// External pieces the timer is wired to
#[derive(Clone, Copy)]
pub struct Collaborators {
    pub interrupts: &'static dyn InterruptControl,
    pub scheduler: &'static dyn SchedulerHooks,
    pub dispatch: &'static dyn InterruptDispatch,
    pub hardware: &'static dyn PeriodicTimer,
}

/// Tick counter, wake queue and calibration state
pub struct Timer {
    frequency_hz: u32,
    ticks: AtomicU64,
    sleepers: IrqMutex<WakeQueue>,
    loops_per_tick: AtomicU32,
    irq: &'static dyn InterruptControl,
    scheduler: &'static dyn SchedulerHooks,
}

impl Timer {
    /// Build a timer without touching hardware
    ///
    /// The owner is responsible for calling `advance()` once per tick.
    pub fn new(
        config: TimerConfig,
        irq: &'static dyn InterruptControl,
        scheduler: &'static dyn SchedulerHooks,
    ) -> Self {
        Self {
            frequency_hz: config.frequency_hz(),
            ticks: AtomicU64::new(0),
            sleepers: IrqMutex::new(irq, WakeQueue::new()),
            loops_per_tick: AtomicU32::new(0),
            irq,
            scheduler,
        }
    }

    /// Ticks per second
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Busy-wait loops per tick, 0 until `calibrate()` has run
    pub fn loops_per_tick(&self) -> u32 {
        self.loops_per_tick.load(Ordering::SeqCst)
    }

    /// Number of timer ticks since boot
    pub fn now(&self) -> Ticks {
        let ticks = {
            let _masked = InterruptGuard::new(self.irq);
            self.ticks.load(Ordering::Relaxed)
        };
        compiler_fence(Ordering::SeqCst);
        ticks
    }

    /// Ticks elapsed since `then`, a value previously returned by `now()`
    pub fn elapsed_since(&self, then: Ticks) -> Ticks {
        self.now().saturating_sub(then)
    }

    /// Account one timer interrupt
    ///
    /// Called from the timer IRQ handler only: bumps the counter, runs the
    /// scheduler's tick accounting, then wakes every sleeper that is due.
    pub fn advance(&self) {
        let now = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        self.scheduler.on_tick();

        let mut sleepers = self.sleepers.lock();
        sleepers.drain_due(now, |tid| {
            assert!(
                self.scheduler.thread_exists(tid),
                "{} destroyed while sleeping",
                tid
            );
            self.scheduler.wake_thread(tid);
        });
    }

    /// Block the calling thread for at least `ticks` timer ticks
    ///
    /// Returns immediately for `ticks <= 0`.
    ///
    /// # Panics
    /// If called with interrupts disabled.
    pub fn sleep_ticks(&self, ticks: i64) {
        if ticks <= 0 {
            return;
        }
        assert!(
            self.irq.are_enabled(),
            "sleep_ticks called with interrupts disabled"
        );

        let deadline = self.now().saturating_add(ticks as Ticks);
        let thread = self.scheduler.current_thread();

        let _masked = InterruptGuard::new(self.irq);
        self.sleepers.lock().insert(thread, deadline);
        log::trace!("{} sleeping until tick {}", thread, deadline);
        self.scheduler.block_current_thread();
    }

    /// Sleep for approximately `ms` milliseconds
    pub fn sleep_milliseconds(&self, ms: i64) {
        self.real_time_sleep(ms, MILLIS_PER_SEC);
    }

    /// Sleep for approximately `us` microseconds
    pub fn sleep_microseconds(&self, us: i64) {
        self.real_time_sleep(us, MICROS_PER_SEC);
    }

    /// Sleep for approximately `ns` nanoseconds
    pub fn sleep_nanoseconds(&self, ns: i64) {
        self.real_time_sleep(ns, NANOS_PER_SEC);
    }

    /// Sleep for `num / denom` seconds
    ///
    /// Whole ticks block on the wake queue and yield the CPU; anything
    /// shorter spins, since a block/wake round trip cannot resolve it.
    fn real_time_sleep(&self, num: i64, denom: i64) {
        assert!(
            self.irq.are_enabled(),
            "real-time sleep called with interrupts disabled"
        );
        match SleepPlan::for_real_time(num, denom, self.frequency_hz, self.loops_per_tick()) {
            SleepPlan::Block(ticks) => self.sleep_ticks(ticks),
            SleepPlan::Spin(loops) => busy_wait(loops),
        }
    }

    /// Number of threads currently asleep
    pub fn sleeper_count(&self) -> usize {
        self.sleepers.lock().len()
    }

    /// Deadline of the next sleeper to wake
    pub fn next_wake_deadline(&self) -> Option<Ticks> {
        self.sleepers.lock().peek_deadline()
    }

    /// Log the tick counter and the sleep queue
    pub fn print_stats(&self) {
        let (sleepers, next) = {
            let queue = self.sleepers.lock();
            (queue.len(), queue.peek_deadline())
        };
        log::info!("Timer: {} ticks", self.now());
        match next {
            Some(deadline) => log::info!(
                "Timer: {} sleeping, next wake at tick {}",
                sleepers,
                deadline
            ),
            None => log::info!("Timer: no sleeping threads"),
        }
    }
}

/// The system timer, set once by `init()`
static SYSTEM_TIMER: Once<Timer> = Once::new();

/// Program the timer hardware and start counting ticks
///
/// Interrupts should still be disabled; `calibrate()` has to wait until
/// they are enabled.
pub fn init(config: TimerConfig, parts: Collaborators) -> Result<&'static Timer, TimerError> {
    let mut created = false;
    let timer = SYSTEM_TIMER.call_once(|| {
        created = true;
        Timer::new(config, parts.interrupts, parts.scheduler)
    });
    if !created {
        return Err(TimerError::AlreadyInitialized);
    }

    parts.hardware.program(config.frequency_hz());
    parts
        .dispatch
        .register_handler(config.vector(), TIMER_HANDLER_NAME, on_timer_interrupt);

    log::info!(
        "Timer initialized: {}Hz on vector {:#04x}",
        config.frequency_hz(),
        config.vector()
    );
    Ok(timer)
}

/// Timer IRQ entry point registered by `init()`
pub fn on_timer_interrupt() {
    if let Some(timer) = SYSTEM_TIMER.get() {
        timer.advance();
    }
}

/// The global timer
///
/// # Panics
/// If `init()` has not run.
pub fn system_timer() -> &'static Timer {
    match SYSTEM_TIMER.get() {
        Some(timer) => timer,
        None => panic!("timer used before timer::init"),
    }
}

/// Number of timer ticks since boot
pub fn ticks() -> Ticks {
    system_timer().now()
}

/// Ticks elapsed since `then`
pub fn elapsed(then: Ticks) -> Ticks {
    system_timer().elapsed_since(then)
}

pub fn sleep_ticks(ticks: i64) {
    system_timer().sleep_ticks(ticks);
}

pub fn sleep_ms(ms: i64) {
    system_timer().sleep_milliseconds(ms);
}

pub fn sleep_us(us: i64) {
    system_timer().sleep_microseconds(us);
}

pub fn sleep_ns(ns: i64) {
    system_timer().sleep_nanoseconds(ns);
}

pub fn calibrate() {
    system_timer().calibrate();
}

pub fn loops_per_tick() -> u32 {
    system_timer().loops_per_tick()
}

pub fn print_stats() {
    system_timer().print_stats();
}
