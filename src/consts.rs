//! Constants used across the 4FSK transmitter.
//!
//! This module defines radio-wide defaults, Horus-binary framing sizes,
//! and the counter width of the symbol timer.
//!
//! ## Key Concepts
//!
//! - **Baud**: Horus-binary 4FSK runs at 50 or 100 symbols per second.
//! - **Tone spacing**: Distance between adjacent 4FSK tones. The SX127x PLL
//!   resolution (61 Hz) turns the nominal 270 Hz into roughly 244 Hz on air.
//! - **Frames**: Each encoded byte expands into four 2-bit symbols.
//! - **Buffer Sizing**: Derived from the largest encoded Horus frame.
//!
//! These values are defaults, not calibration data. Board-specific timing
//! corrections belong in [`TransmitterConfig`](crate::config::TransmitterConfig).

/// Recommended 4FSK symbol rate in baud.
pub const FSK4_DEFAULT_BAUD: u32 = 100;

/// Slower symbol rate used by the 8 MHz boards.
pub const FSK4_SLOW_BAUD: u32 = 50;

/// Nominal spacing between adjacent 4FSK tones, in Hz.
pub const FSK4_SPACING_HZ: u32 = 270;

/// Default delay between transmissions, in milliseconds.
///
/// GPS acquisition and frame encoding add several seconds on top of this,
/// so the interval seen on air is noticeably longer.
pub const DEFAULT_TX_DELAY_MS: u32 = 3_500;

/// Payload ID used for Horus-binary V1 test transmissions (`4FSKTEST`).
pub const PAYLOAD_ID_V1: u16 = 0;

/// Payload ID used for Horus-binary V2 test transmissions (`4FSKTEST-V2`).
pub const PAYLOAD_ID_V2: u16 = 256;

/// Length (in bytes) of an encoded Horus-binary V1 frame,
/// including preamble, unique word and Golay FEC.
pub const HORUS_V1_FRAME_LEN: usize = 45;

/// Length (in bytes) of an encoded Horus-binary V2 frame,
/// including preamble, unique word and Golay FEC.
pub const HORUS_V2_FRAME_LEN: usize = 65;

/// Number of 4FSK symbols carried by one byte (2 bits each).
pub const SYMBOLS_PER_BYTE: usize = 4;

/// Largest encoded frame (in bytes) the scheduler buffers.
pub const MAX_FRAME_LEN: usize = HORUS_V2_FRAME_LEN;

/// Maximum number of symbols held by one [`SymbolStream`](crate::stream::SymbolStream).
pub const MAX_FRAME_SYMBOLS: usize = MAX_FRAME_LEN * SYMBOLS_PER_BYTE;

/// Largest compare value representable by the 16-bit symbol timer.
pub const TIMER_COUNTER_MAX: u16 = u16::MAX;

/// Microseconds per second, for period conversions.
pub const MICROS_PER_SECOND: u64 = 1_000_000;

/// Milliseconds per second, for delay conversions.
pub const MILLIS_PER_SECOND: u64 = 1_000;
