//! The tick flag shared between the timer interrupt and the scheduler.
//!
//! [`TickFlag`] is the only state touched from both contexts. The interrupt
//! handler is its single writer of `true`, the scheduler its single reader and
//! the only one that clears it. It holds one bit of information, "at least one
//! symbol period has elapsed", so two interrupts between observations
//! coalesce into one.

use core::sync::atomic::{AtomicBool, Ordering};

/// A single-writer/single-reader "symbol period elapsed" flag.
///
/// Place one in a `static` (see [`init_symbol_tick!`](crate::init_symbol_tick)) and call
/// [`raise`](TickFlag::raise) from the compare-match ISR. The scheduler calls
/// [`take`](TickFlag::take).
///
/// Only plain atomic loads and stores are used: AVR has no atomic swap.
///
/// # Example
/// ```rust
/// use horus4fsk::tick::TickFlag;
///
/// static TICK: TickFlag = TickFlag::new();
///
/// TICK.raise();
/// TICK.raise(); // coalesces with the first
/// assert!(TICK.take());
/// assert!(!TICK.take());
/// ```
#[derive(Debug, Default)]
pub struct TickFlag {
    raised: AtomicBool,
}

impl TickFlag {
    /// Creates a lowered flag.
    pub const fn new() -> Self {
        Self {
            raised: AtomicBool::new(false),
        }
    }

    /// Marks one symbol period as elapsed. Interrupt side.
    ///
    /// A single store, bounded and lock-free.
    #[inline(always)]
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Whether a tick is pending, without consuming it.
    #[inline]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }

    /// Consumes a pending tick. Scheduler side.
    ///
    /// Returns `true` (and lowers the flag) if the ISR raised it since the last `take`.
    /// A tick raised between the load and the store merges into the one being consumed.
    #[inline]
    pub fn take(&self) -> bool {
        if self.raised.load(Ordering::Acquire) {
            self.raised.store(false, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Drops any pending tick. Used when the symbol clock is restarted.
    #[inline]
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_starts_lowered() {
        let flag = TickFlag::new();
        assert!(!flag.is_raised());
        assert!(!flag.take());
    }

    #[test]
    fn test_take_consumes_once() {
        let flag = TickFlag::new();
        flag.raise();
        assert!(flag.is_raised());
        assert!(flag.take());
        assert!(!flag.is_raised());
        assert!(!flag.take());
    }

    #[test]
    fn test_ticks_coalesce_without_backlog() {
        let flag = TickFlag::new();
        for _ in 0..5 {
            flag.raise();
        }
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn test_clear_drops_pending_tick() {
        let flag = TickFlag::new();
        flag.raise();
        flag.clear();
        assert!(!flag.take());
    }
}
