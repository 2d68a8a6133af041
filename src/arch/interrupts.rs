/*
 * Interrupt Masking Primitives
 *
 * This module provides the interrupt-masked critical section used by the
 * timer subsystem. The actual mask/unmask instructions are supplied by an
 * `InterruptControl` implementation (the x86_64 one lives in
 * `arch::x86_64::interrupts`), so the same code runs on the kernel and
 * under the host test harness.
 *
 * Why this is important:
 * - The tick counter and the sleep queue are shared with the timer IRQ
 * - The IRQ handler cannot block, so the only protection is masking delivery
 * - RAII guards restore the previous mask state on every exit path
 */

use core::ops::{Deref, DerefMut};

use spin::{Mutex, MutexGuard};

/// Interrupt delivery control for the current CPU
pub trait InterruptControl: Sync {
    /// Returns true if interrupt delivery is currently enabled
    fn are_enabled(&self) -> bool;

    /// Enable interrupt delivery
    fn enable(&self);

    /// Disable interrupt delivery
    fn disable(&self);
}

/// RAII guard that masks interrupts for its lifetime
///
/// Interrupts are disabled when the guard is created and re-enabled on drop
/// only if they were enabled before, so guards nest correctly.
pub struct InterruptGuard<'a> {
    control: &'a dyn InterruptControl,
    were_enabled: bool,
}

impl<'a> InterruptGuard<'a> {
    /// Mask interrupt delivery, remembering the previous state
    pub fn new(control: &'a dyn InterruptControl) -> Self {
        let were_enabled = control.are_enabled();
        if were_enabled {
            control.disable();
        }
        Self {
            control,
            were_enabled,
        }
    }

    /// Whether interrupts were enabled when this guard was taken
    #[cfg(test)]
    fn were_enabled(&self) -> bool {
        self.were_enabled
    }
}

impl Drop for InterruptGuard<'_> {
    fn drop(&mut self) {
        if self.were_enabled {
            self.control.enable();
        }
    }
}

/// Data shared between thread context and an interrupt handler
///
/// `lock()` masks interrupts before taking the inner spin lock, so the
/// handler can never interrupt a holder on the same CPU. The guard releases
/// the spin lock first and then restores the interrupt state.
pub struct IrqMutex<T> {
    control: &'static dyn InterruptControl,
    inner: Mutex<T>,
}

impl<T> IrqMutex<T> {
    pub const fn new(control: &'static dyn InterruptControl, data: T) -> Self {
        Self {
            control,
            inner: Mutex::new(data),
        }
    }

    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let irq = InterruptGuard::new(self.control);
        let data = self.inner.lock();
        IrqMutexGuard { data, _irq: irq }
    }
}

/// Guard returned by [`IrqMutex::lock`]
///
/// Field order matters: `data` drops (unlocks) before `_irq` unmasks.
pub struct IrqMutexGuard<'a, T> {
    data: MutexGuard<'a, T>,
    _irq: InterruptGuard<'a>,
}

impl<T> Deref for IrqMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> DerefMut for IrqMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mock::MockInterrupts;

    static IRQ: MockInterrupts = MockInterrupts;

    #[test]
    fn test_guard_restores_enabled_state() {
        IRQ.set_enabled(true);
        {
            let guard = InterruptGuard::new(&IRQ);
            assert!(guard.were_enabled());
            assert!(!IRQ.are_enabled());
        }
        assert!(IRQ.are_enabled());
    }

    #[test]
    fn test_nested_guard_keeps_outer_mask() {
        IRQ.set_enabled(true);
        let outer = InterruptGuard::new(&IRQ);
        {
            let inner = InterruptGuard::new(&IRQ);
            assert!(!inner.were_enabled());
        }
        assert!(!IRQ.are_enabled());
        drop(outer);
        assert!(IRQ.are_enabled());
    }

    #[test]
    fn test_guard_leaves_disabled_state_alone() {
        IRQ.set_enabled(false);
        drop(InterruptGuard::new(&IRQ));
        assert!(!IRQ.are_enabled());
        IRQ.set_enabled(true);
    }

    #[test]
    fn test_irq_mutex_masks_while_held() {
        IRQ.set_enabled(true);
        let cell = IrqMutex::new(&IRQ, 7u32);
        {
            let mut value = cell.lock();
            assert!(!IRQ.are_enabled());
            *value += 1;
        }
        assert!(IRQ.are_enabled());
        assert_eq!(*cell.lock(), 8);
    }
}
