//! Symbol streams: one encoded frame, as the scheduler consumes it.
//!
//! The frame encoder hands over finished bytes (preamble, unique word and
//! FEC-coded payload). [`SymbolStream::from_bytes`] expands each byte into four
//! 2-bit symbols, most significant pair first, which is the order Horus-binary
//! receivers expect.

#[cfg(not(feature = "std"))]
use heapless::Vec;

use crate::consts::{MAX_FRAME_SYMBOLS, SYMBOLS_PER_BYTE};
use crate::error::StreamError;
use crate::tone::Tone;

/// An ordered, finite run of tones for one transmission.
///
/// Holds at most [`MAX_FRAME_SYMBOLS`] tones in both `std` and `no_std` builds.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct SymbolStream {
    #[cfg(feature = "std")]
    tones: Vec<Tone>,
    #[cfg(not(feature = "std"))]
    tones: Vec<Tone, MAX_FRAME_SYMBOLS>,
}

impl SymbolStream {
    /// Creates an empty stream.
    pub fn new() -> Self {
        Self { tones: Vec::new() }
    }

    /// Expands encoded frame bytes into tones, four per byte, MSB pair first.
    ///
    /// # Errors
    /// - [`StreamError::Empty`] for an empty frame
    /// - [`StreamError::Full`] if the frame exceeds [`MAX_FRAME_SYMBOLS`]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        if bytes.is_empty() {
            return Err(StreamError::Empty);
        }
        if bytes.len() * SYMBOLS_PER_BYTE > MAX_FRAME_SYMBOLS {
            return Err(StreamError::Full);
        }
        let mut stream = Self::new();
        for &byte in bytes {
            let mut b = byte;
            for _ in 0..SYMBOLS_PER_BYTE {
                stream.push(Tone::from_bits(b >> 6))?;
                b <<= 2;
            }
        }
        Ok(stream)
    }

    /// Builds a stream from tones already split by the caller.
    ///
    /// # Errors
    /// Same as [`from_bytes`](Self::from_bytes).
    pub fn from_tones(tones: &[Tone]) -> Result<Self, StreamError> {
        if tones.is_empty() {
            return Err(StreamError::Empty);
        }
        let mut stream = Self::new();
        for &tone in tones {
            stream.push(tone)?;
        }
        Ok(stream)
    }

    /// Appends one tone.
    ///
    /// # Errors
    /// [`StreamError::Full`] once [`MAX_FRAME_SYMBOLS`] tones are held.
    pub fn push(&mut self, tone: Tone) -> Result<(), StreamError> {
        if self.tones.len() >= MAX_FRAME_SYMBOLS {
            return Err(StreamError::Full);
        }
        #[cfg(feature = "std")]
        self.tones.push(tone);
        #[cfg(not(feature = "std"))]
        self.tones.push(tone).map_err(|_| StreamError::Full)?;
        Ok(())
    }

    /// Number of tones.
    pub fn len(&self) -> usize {
        self.tones.len()
    }

    /// Whether the stream holds no tones.
    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// The tone at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Tone> {
        self.tones.get(index).copied()
    }

    /// All tones in transmit order.
    pub fn as_slice(&self) -> &[Tone] {
        &self.tones
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_LEN;

    #[test]
    fn test_from_bytes_msb_pair_first() {
        let stream = SymbolStream::from_bytes(&[0b00_01_10_11, 0xC0]).unwrap();
        assert_eq!(
            stream.as_slice(),
            &[
                Tone::T0,
                Tone::T1,
                Tone::T2,
                Tone::T3,
                Tone::T3,
                Tone::T0,
                Tone::T0,
                Tone::T0
            ]
        );
    }

    #[test]
    fn test_from_bytes_rejects_empty_and_oversized() {
        assert_eq!(SymbolStream::from_bytes(&[]), Err(StreamError::Empty));
        let too_long = [0x1bu8; MAX_FRAME_LEN + 1];
        assert_eq!(SymbolStream::from_bytes(&too_long), Err(StreamError::Full));
        let max = [0x1bu8; MAX_FRAME_LEN];
        assert_eq!(
            SymbolStream::from_bytes(&max).map(|s| s.len()),
            Ok(MAX_FRAME_SYMBOLS)
        );
    }

    #[test]
    fn test_push_stops_at_capacity() {
        let mut stream = SymbolStream::new();
        for _ in 0..MAX_FRAME_SYMBOLS {
            assert!(stream.push(Tone::T2).is_ok());
        }
        assert_eq!(stream.push(Tone::T2), Err(StreamError::Full));
        assert_eq!(stream.get(MAX_FRAME_SYMBOLS - 1), Some(Tone::T2));
        assert_eq!(stream.get(MAX_FRAME_SYMBOLS), None);
    }

    #[test]
    fn test_from_tones_keeps_order() {
        let stream = SymbolStream::from_tones(&[Tone::T3, Tone::T1]).unwrap();
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.get(0), Some(Tone::T3));
        assert!(!stream.is_empty());
        assert_eq!(SymbolStream::from_tones(&[]), Err(StreamError::Empty));
    }
}
