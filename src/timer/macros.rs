/// Declares the static `SYMBOL_TICK` flag shared by the timer ISR and the scheduler.
///
/// This macro creates a `static` [`TickFlag`](crate::tick::TickFlag) named `SYMBOL_TICK`,
/// suitable for use in interrupt-based environments where the ISR raises it and the main
/// loop's [`SymbolScheduler`](crate::scheduler::SymbolScheduler) consumes it.
///
/// # Example
/// ```rust
/// horus4fsk::init_symbol_tick!();
///
/// SYMBOL_TICK.raise();
/// assert!(SYMBOL_TICK.take());
/// ```
#[macro_export]
macro_rules! init_symbol_tick {
    () => {
        pub static SYMBOL_TICK: $crate::tick::TickFlag = $crate::tick::TickFlag::new();
    };
}

/// Raises `SYMBOL_TICK`. The whole body of the compare-match ISR.
///
/// # Example
/// ```rust,ignore
/// #[avr_device::interrupt(atmega328p)]
/// fn TIMER1_COMPA() {
///     raise_symbol_tick!();
/// }
/// ```
///
/// # Notes
/// - This macro assumes `SYMBOL_TICK` was declared with `init_symbol_tick!`.
/// - Constant time: one atomic store, no locks, no I/O.
#[macro_export]
macro_rules! raise_symbol_tick {
    () => {
        SYMBOL_TICK.raise();
    };
}

#[cfg(test)]
mod tests {
    crate::init_symbol_tick!();

    #[test]
    fn test_isr_macro_raises_declared_flag() {
        assert!(!SYMBOL_TICK.is_raised());
        crate::raise_symbol_tick!();
        assert!(SYMBOL_TICK.take());
        assert!(!SYMBOL_TICK.is_raised());
    }
}
