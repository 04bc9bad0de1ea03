//! Symbol clock: tick arithmetic and the timer capability.
//!
//! Logic for turning a processor clock into a periodic symbol interrupt. Two tick sources
//! are provided: a hardware compare-match timer driven through `critical_section::with`
//! (`timer-isr` feature), or a busy-loop delay source (`delay-loop` feature).
//!
//! Contains:
//! - [`ClockProfile::tick_count`]: runtime tick calculator (nearest-integer rounding)
//! - [`const_tick_count`]: compile-time tick calculator
//! - [`SymbolTimer`]: the capability the scheduler arms and disarms
//! - `CtcTimer` and `init_symbol_tick!()`/`raise_symbol_tick!()`: interrupt-based tick source
//! (feature `timer-isr`)
//! - `run_symbol_loop`: blocking delay-driven tick source (feature `delay-loop`)
//!
//! Common profiles: (For use with [`ClockProfile`])
//!
//! | CLOCK  | PRESCALER | BAUD | TICKS | Symbol period |
//! |--------|-----------|------|-------|---------------|
//! |  8 MHz |       256 |   50 |   625 |         20 ms |
//! |  8 MHz |       256 |  100 |   313 |         10 ms |
//! | 16 MHz |       256 |  100 |   625 |         10 ms |
//! | 16 MHz |      1024 |   50 |   313 |         20 ms |

use libm::round;

use crate::consts::{MICROS_PER_SECOND, MILLIS_PER_SECOND, TIMER_COUNTER_MAX};
use crate::error::ConfigurationError;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(all(test, feature = "timer-isr"))]
pub(crate) use isr::fake;

#[cfg(feature = "timer-isr")]
mod macros;

#[cfg(feature = "atmega328p")]
pub mod atmega328p;

/// Clock divider applied before the symbol counter.
///
/// The five settings offered by the AVR 16-bit Timer1 (and most 8-bit AVR timers).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Prescaler {
    /// clk/1
    Div1,
    /// clk/8
    Div8,
    /// clk/64
    Div64,
    /// clk/256
    Div256,
    /// clk/1024
    Div1024,
}

impl Prescaler {
    /// Maps a numeric divisor onto a prescaler setting.
    ///
    /// # Errors
    /// [`ConfigurationError::UnsupportedPrescaler`] for any divisor the timer cannot select.
    pub const fn from_divisor(divisor: u32) -> Result<Self, ConfigurationError> {
        match divisor {
            1 => Ok(Prescaler::Div1),
            8 => Ok(Prescaler::Div8),
            64 => Ok(Prescaler::Div64),
            256 => Ok(Prescaler::Div256),
            1024 => Ok(Prescaler::Div1024),
            other => Err(ConfigurationError::UnsupportedPrescaler(other)),
        }
    }

    /// The numeric divisor.
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div1 => 1,
            Prescaler::Div8 => 8,
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }

    /// Clock-select bits (`CSn2:0`) for this divisor.
    pub const fn clock_select_bits(self) -> u8 {
        match self {
            Prescaler::Div1 => 0b001,
            Prescaler::Div8 => 0b010,
            Prescaler::Div64 => 0b011,
            Prescaler::Div256 => 0b100,
            Prescaler::Div1024 => 0b101,
        }
    }
}

/// Description of the processor clock and the symbol rate it must produce.
///
/// # Example
/// ```rust
/// use horus4fsk::timer::ClockProfile;
///
/// let profile = ClockProfile::new(8_000_000, 256, 50);
/// assert_eq!(profile.tick_count(), Ok(625));
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct ClockProfile {
    /// Timer input clock in Hz (`F_CPU` on AVR).
    pub processor_clock_hz: u32,
    /// Prescaler divisor (1, 8, 64, 256 or 1024).
    pub prescaler: u32,
    /// Symbols per second.
    pub target_baud: u32,
}

impl ClockProfile {
    /// Creates a profile. Nothing is checked until [`tick_count`](Self::tick_count).
    pub const fn new(processor_clock_hz: u32, prescaler: u32, target_baud: u32) -> Self {
        Self {
            processor_clock_hz,
            prescaler,
            target_baud,
        }
    }

    /// Checks the inputs and returns the matching [`Prescaler`].
    fn checked_prescaler(&self) -> Result<Prescaler, ConfigurationError> {
        if self.processor_clock_hz == 0 {
            return Err(ConfigurationError::ZeroClock);
        }
        if self.target_baud == 0 {
            return Err(ConfigurationError::ZeroBaud);
        }
        Prescaler::from_divisor(self.prescaler)
    }

    /// The unrounded number of prescaled ticks in one symbol period.
    pub fn ideal_ticks(&self) -> f64 {
        self.processor_clock_hz as f64 / self.prescaler as f64 / self.target_baud as f64
    }

    /// Computes the compare value for one symbol period on a 16-bit counter.
    ///
    /// # Returns
    /// - `round(processor_clock_hz / prescaler / target_baud)`
    ///
    /// # Errors
    /// - [`ConfigurationError::ZeroClock`], [`ConfigurationError::ZeroBaud`],
    ///   [`ConfigurationError::UnsupportedPrescaler`] for invalid inputs
    /// - [`ConfigurationError::TickCountZero`] if the period rounds to nothing
    /// - [`ConfigurationError::TickCountOverflow`] if it exceeds `u16::MAX`
    pub fn tick_count(&self) -> Result<u16, ConfigurationError> {
        self.tick_count_within(TIMER_COUNTER_MAX)
    }

    /// Like [`tick_count`](Self::tick_count) for a counter whose maximum is `max`
    /// (e.g. `255` for an 8-bit timer).
    pub fn tick_count_within(&self, max: u16) -> Result<u16, ConfigurationError> {
        let _ = self.checked_prescaler()?;
        let ticks = round(self.ideal_ticks()) as u64;
        if ticks == 0 {
            return Err(ConfigurationError::TickCountZero);
        }
        if ticks > max as u64 {
            return Err(ConfigurationError::TickCountOverflow { ticks, max });
        }
        Ok(ticks as u16)
    }
}

/// Compile-time tick calculator.
///
/// Integer nearest rounding, agreeing with [`ClockProfile::tick_count`]. Returns `0` for any
/// input that [`ClockProfile::tick_count`] would reject, so a `const` assertion on the result
/// catches a bad profile at build time.
///
/// ```rust
/// use horus4fsk::timer::const_tick_count;
///
/// const TICKS: u16 = const_tick_count(16_000_000, 256, 100);
/// const _: () = assert!(TICKS != 0);
/// assert_eq!(TICKS, 625);
/// ```
pub const fn const_tick_count(processor_clock_hz: u32, prescaler: u32, target_baud: u32) -> u16 {
    if processor_clock_hz == 0 || target_baud == 0 {
        return 0;
    }
    if Prescaler::from_divisor(prescaler).is_err() {
        return 0;
    }
    let divisor = prescaler as u64 * target_baud as u64;
    let ticks = (processor_clock_hz as u64 + divisor / 2) / divisor;
    if ticks > TIMER_COUNTER_MAX as u64 {
        return 0;
    }
    ticks as u16
}

/// A validated symbol period, ready to be loaded into a [`SymbolTimer`].
///
/// Only [`TransmitterConfig::validate`](crate::config::TransmitterConfig::validate)
/// builds one, so holding a `SymbolTiming` means the compare value is known to be
/// non-zero and in range.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct SymbolTiming {
    pub(crate) tick_count: u16,
    pub(crate) computed_tick_count: u16,
    pub(crate) overridden: bool,
    pub(crate) prescaler: Prescaler,
    pub(crate) processor_clock_hz: u32,
    pub(crate) target_baud: u32,
    pub(crate) inter_frame_ticks: u32,
}

impl SymbolTiming {
    /// The compare value actually programmed (override if one was given).
    pub const fn tick_count(&self) -> u16 {
        self.tick_count
    }

    /// The compare value derived from the clock profile alone.
    pub const fn computed_tick_count(&self) -> u16 {
        self.computed_tick_count
    }

    /// Whether a calibration override was given, even one equal to the computed value.
    pub const fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Prescaler setting for the timer.
    pub const fn prescaler(&self) -> Prescaler {
        self.prescaler
    }

    /// Symbol rate the profile asked for.
    pub const fn target_baud(&self) -> u32 {
        self.target_baud
    }

    /// Number of symbol ticks spent in the inter-frame delay.
    pub const fn inter_frame_ticks(&self) -> u32 {
        self.inter_frame_ticks
    }

    /// Prescaled counter frequency in Hz.
    pub const fn counter_hz(&self) -> u32 {
        self.processor_clock_hz / self.prescaler.divisor()
    }

    /// Nominal symbol period in microseconds: `tick_count` prescaled ticks, rounded to
    /// nearest.
    ///
    /// A CTC timer matching on `tick_count` runs one tick longer; see
    /// [`ctc_period_us`](Self::ctc_period_us).
    pub const fn period_us(&self) -> u32 {
        let num = self.tick_count as u64 * self.prescaler.divisor() as u64 * MICROS_PER_SECOND;
        let den = self.processor_clock_hz as u64;
        ((num + den / 2) / den) as u32
    }

    /// Nominal symbol rate in millibaud, one symbol per `tick_count` prescaled ticks.
    pub const fn effective_millibaud(&self) -> u32 {
        Self::millibaud_for(self.processor_clock_hz, self.prescaler, self.tick_count as u64)
    }

    /// Prescaled ticks per symbol on a CTC timer: the counter runs `0..=OCRnA`.
    pub const fn ctc_period_ticks(&self) -> u32 {
        self.tick_count as u32 + 1
    }

    /// Symbol period produced by a CTC timer matching on `tick_count`, in microseconds
    /// (rounded to nearest).
    pub const fn ctc_period_us(&self) -> u32 {
        let num =
            self.ctc_period_ticks() as u64 * self.prescaler.divisor() as u64 * MICROS_PER_SECOND;
        let den = self.processor_clock_hz as u64;
        ((num + den / 2) / den) as u32
    }

    /// Symbol rate produced by CTC hardware, in millibaud.
    pub const fn ctc_millibaud(&self) -> u32 {
        Self::millibaud_for(
            self.processor_clock_hz,
            self.prescaler,
            self.ctc_period_ticks() as u64,
        )
    }

    const fn millibaud_for(processor_clock_hz: u32, prescaler: Prescaler, ticks: u64) -> u32 {
        let num = processor_clock_hz as u64 * MILLIS_PER_SECOND;
        let den = prescaler.divisor() as u64 * ticks;
        ((num + den / 2) / den) as u32
    }
}

/// Converts a delay into whole symbol ticks, rounding up and saturating at `u32::MAX`.
pub(crate) const fn delay_ms_to_ticks(
    delay_ms: u32,
    processor_clock_hz: u32,
    prescaler: Prescaler,
    tick_count: u16,
) -> u32 {
    let num = delay_ms as u64 * processor_clock_hz as u64;
    let den = MILLIS_PER_SECOND * prescaler.divisor() as u64 * tick_count as u64;
    let ticks = num.div_ceil(den);
    if ticks > u32::MAX as u64 {
        u32::MAX
    } else {
        ticks as u32
    }
}

/// A periodic symbol clock: one hardware countdown timer, owned exclusively.
///
/// Implementations raise a [`TickFlag`](crate::tick::TickFlag) once every
/// `timing.tick_count()` prescaled ticks, indefinitely, from the moment
/// [`configure`](SymbolTimer::configure) returns until [`disable`](SymbolTimer::disable).
pub trait SymbolTimer {
    /// Loads the period and starts the timer in free-running compare-match mode.
    ///
    /// Must be atomic with respect to the timer interrupt. Calling it again with the
    /// same timing yields the same period; nothing accumulates across calls.
    fn configure(&mut self, timing: &SymbolTiming);

    /// Stops the timer and masks its interrupt.
    fn disable(&mut self);

    /// Whether the timer is currently producing ticks.
    fn is_armed(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_count_scenario_profiles() {
        assert_eq!(ClockProfile::new(8_000_000, 256, 50).tick_count(), Ok(625));
        assert_eq!(ClockProfile::new(16_000_000, 256, 100).tick_count(), Ok(625));
        // 312.5 rounds up rather than truncating
        assert_eq!(ClockProfile::new(8_000_000, 256, 100).tick_count(), Ok(313));
    }

    #[test]
    fn test_tick_count_within_one_of_ideal() {
        let clocks = [1_000_000, 4_000_000, 8_000_000, 12_000_000, 16_000_000, 20_000_000];
        let prescalers = [8, 64, 256, 1024];
        let bauds = [25, 50, 75, 100, 300, 1200];
        for &clock in &clocks {
            for &prescaler in &prescalers {
                for &baud in &bauds {
                    let profile = ClockProfile::new(clock, prescaler, baud);
                    if let Ok(ticks) = profile.tick_count() {
                        let diff = ticks as f64 - profile.ideal_ticks();
                        assert!(diff.abs() <= 0.5, "{:?} -> {}", profile, ticks);
                        assert_eq!(const_tick_count(clock, prescaler, baud), ticks);
                    }
                }
            }
        }
    }

    #[test]
    fn test_tick_count_overflow() {
        let profile = ClockProfile::new(16_000_000, 8, 10);
        assert_eq!(
            profile.tick_count(),
            Err(ConfigurationError::TickCountOverflow {
                ticks: 200_000,
                max: u16::MAX
            })
        );
        assert_eq!(const_tick_count(16_000_000, 8, 10), 0);
    }

    #[test]
    fn test_tick_count_eight_bit_counter() {
        let profile = ClockProfile::new(8_000_000, 1024, 50);
        assert_eq!(profile.tick_count_within(u8::MAX as u16), Ok(156));
        let profile = ClockProfile::new(8_000_000, 256, 50);
        assert!(matches!(
            profile.tick_count_within(u8::MAX as u16),
            Err(ConfigurationError::TickCountOverflow { ticks: 625, .. })
        ));
    }

    #[test]
    fn test_tick_count_rejects_bad_inputs() {
        assert_eq!(
            ClockProfile::new(8_000_000, 256, 0).tick_count(),
            Err(ConfigurationError::ZeroBaud)
        );
        assert_eq!(
            ClockProfile::new(0, 256, 50).tick_count(),
            Err(ConfigurationError::ZeroClock)
        );
        assert_eq!(
            ClockProfile::new(8_000_000, 100, 50).tick_count(),
            Err(ConfigurationError::UnsupportedPrescaler(100))
        );
        assert_eq!(
            ClockProfile::new(1_000, 1024, 100).tick_count(),
            Err(ConfigurationError::TickCountZero)
        );
        assert_eq!(const_tick_count(8_000_000, 256, 0), 0);
    }

    #[test]
    fn test_prescaler_select_bits() {
        assert_eq!(Prescaler::Div256.clock_select_bits(), 0b100);
        assert_eq!(Prescaler::Div1024.clock_select_bits(), 0b101);
        assert_eq!(Prescaler::from_divisor(64), Ok(Prescaler::Div64));
        assert_eq!(Prescaler::Div8.divisor(), 8);
    }

    #[test]
    fn test_delay_ms_to_ticks_rounds_up() {
        // 8 MHz / 256 / 625 = 50 ticks per second
        assert_eq!(delay_ms_to_ticks(1_000, 8_000_000, Prescaler::Div256, 625), 50);
        assert_eq!(delay_ms_to_ticks(1_001, 8_000_000, Prescaler::Div256, 625), 51);
        assert_eq!(delay_ms_to_ticks(0, 8_000_000, Prescaler::Div256, 625), 0);
    }

    #[test]
    fn test_delay_ms_to_ticks_saturates() {
        // 16 MHz / 256 / 1 = 62 500 ticks per second
        assert_eq!(
            delay_ms_to_ticks(68_719_476, 16_000_000, Prescaler::Div256, 1),
            4_294_967_250
        );
        assert_eq!(
            delay_ms_to_ticks(68_719_477, 16_000_000, Prescaler::Div256, 1),
            u32::MAX
        );
        assert_eq!(
            delay_ms_to_ticks(u32::MAX, 16_000_000, Prescaler::Div256, 1),
            u32::MAX
        );
    }
}
