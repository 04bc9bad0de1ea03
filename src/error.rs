//! Error types.
//!
//! Only two things can go wrong inside the transmitter core: the clock
//! description cannot produce a valid symbol period, or a symbol stream
//! cannot hold what it is given. Missed ticks are deliberately absent here;
//! a tick the scheduler observes late is simply lost.

use thiserror::Error;

/// A clock profile or transmitter configuration that cannot drive the symbol timer.
///
/// Returned by [`ClockProfile::tick_count`](crate::timer::ClockProfile::tick_count) and
/// [`TransmitterConfig::validate`](crate::config::TransmitterConfig::validate). It is always
/// raised before any timer register is written, so a misconfigured transmitter
/// never emits a single symbol.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ConfigurationError {
    /// The processor clock was given as 0 Hz.
    #[error("processor clock must be non-zero")]
    ZeroClock,
    /// The target symbol rate was given as 0 baud.
    #[error("target baud must be non-zero")]
    ZeroBaud,
    /// The timer has no prescaler setting for this divisor.
    #[error("prescaler /{0} is not supported by the symbol timer")]
    UnsupportedPrescaler(u32),
    /// The symbol period rounds to zero timer ticks.
    #[error("symbol period rounds to zero timer ticks")]
    TickCountZero,
    /// The symbol period needs more ticks than the counter can hold.
    #[error("symbol period needs {ticks} ticks, counter maximum is {max}")]
    TickCountOverflow {
        /// Ticks required by the profile.
        ticks: u64,
        /// Largest value the counter accepts.
        max: u16,
    },
    /// A tick override of zero was supplied.
    #[error("tick override must be non-zero")]
    ZeroTickOverride,
}

/// Failure to build a [`SymbolStream`](crate::stream::SymbolStream).
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum StreamError {
    /// The frame does not fit in the stream buffer.
    #[error("symbol stream is full")]
    Full,
    /// The frame contained no symbols.
    #[error("symbol stream is empty")]
    Empty,
}
