//! 4FSK tone selectors and the sink that puts them on air.
//!
//! A 4FSK symbol carries two bits and selects one of four tones, spaced
//! [`FSK4_SPACING_HZ`](crate::consts::FSK4_SPACING_HZ) apart above the
//! carrier. The scheduler hands each tone to a [`ToneSink`] at the instant
//! the symbol period begins; how the radio shifts its frequency is the sink's
//! business.

use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};

/// One of the four 4FSK tones, lowest first.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
#[repr(u8)]
pub enum Tone {
    /// Symbol `00`, the base tone.
    T0 = 0,
    /// Symbol `01`, one spacing above.
    T1 = 1,
    /// Symbol `10`, two spacings above.
    T2 = 2,
    /// Symbol `11`, three spacings above.
    T3 = 3,
}

impl Tone {
    /// Builds a tone from the low two bits of `bits`. Higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Tone::T0,
            1 => Tone::T1,
            2 => Tone::T2,
            _ => Tone::T3,
        }
    }

    /// The two-bit symbol value.
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Offset from the base tone in Hz for a given spacing.
    pub const fn offset_hz(self, spacing_hz: u32) -> u32 {
        self.bits() as u32 * spacing_hz
    }
}

/// The radio side of the scheduler: accepts one tone per symbol period.
///
/// Implementations must return quickly. [`emit`](ToneSink::emit) runs on the
/// scheduler's tick grid, and any time spent here delays the next poll.
pub trait ToneSink {
    /// Error produced by the underlying radio or pins.
    type Error: core::fmt::Debug;

    /// Switches the transmitter to `tone`.
    fn emit(&mut self, tone: Tone) -> Result<(), Self::Error>;

    /// Keys the transmitter on (`true`) before a frame or off (`false`) after it.
    ///
    /// The default does nothing, for sinks that are always keyed.
    fn key(&mut self, _on: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Drives a tone-select pair of GPIOs, e.g. into an external FSK modulator or
/// a two-bit resistor DAC on a varactor.
///
/// `lsb` carries bit 0 of the symbol and `msb` bit 1. The optional push-to-talk
/// pin is asserted while a frame is on air.
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use horus4fsk::tone::{PinPairTones, Tone, ToneSink};
///
/// # let lsb = Pin::new(&[PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]);
/// # let msb = Pin::new(&[PinTransaction::set(PinState::Low), PinTransaction::set(PinState::High)]);
/// let mut tones: PinPairTones<Pin, Pin, Pin> = PinPairTones::new(lsb, msb, None, None);
/// tones.emit(Tone::T3).unwrap();
/// # let (mut lsb, mut msb, _) = tones.release();
/// # lsb.done();
/// # msb.done();
/// ```
#[derive(Debug)]
pub struct PinPairTones<LSB, MSB, PTT>
where
    LSB: OutputPin,
    MSB: OutputPin,
    PTT: OutputPin,
{
    lsb: LSB,
    msb: MSB,
    ptt: Option<PTT>,
    ptt_inverted: bool,
}

impl<LSB, MSB, PTT> PinPairTones<LSB, MSB, PTT>
where
    LSB: OutputPin,
    MSB: OutputPin,
    PTT: OutputPin,
{
    /// Creates the sink and drives both select pins to [`Tone::T0`].
    ///
    /// # Arguments
    /// - `lsb`, `msb`: tone select outputs
    /// - `ptt`: optional push-to-talk output
    /// - `ptt_inverted`: whether PTT is active low (On = LOW, Off = HIGH)
    pub fn new(lsb: LSB, msb: MSB, ptt: Option<PTT>, ptt_inverted: Option<bool>) -> Self {
        let mut sink = Self {
            lsb,
            msb,
            ptt,
            ptt_inverted: ptt_inverted.unwrap_or(false),
        };
        let _ = sink.emit(Tone::T0);
        sink
    }

    /// Gives the pins back.
    pub fn release(self) -> (LSB, MSB, Option<PTT>) {
        (self.lsb, self.msb, self.ptt)
    }
}

fn write_pin<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), ErrorKind> {
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| e.kind())
}

impl<LSB, MSB, PTT> ToneSink for PinPairTones<LSB, MSB, PTT>
where
    LSB: OutputPin,
    MSB: OutputPin,
    PTT: OutputPin,
{
    type Error = ErrorKind;

    fn emit(&mut self, tone: Tone) -> Result<(), Self::Error> {
        let bits = tone.bits();
        write_pin(&mut self.lsb, bits & 0b01 != 0)?;
        write_pin(&mut self.msb, bits & 0b10 != 0)
    }

    fn key(&mut self, on: bool) -> Result<(), Self::Error> {
        let state = if self.ptt_inverted { !on } else { on };
        match self.ptt {
            Some(ref mut ptt) => write_pin(ptt, state),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn test_tone_from_bits_masks_high_bits() {
        assert_eq!(Tone::from_bits(0b00), Tone::T0);
        assert_eq!(Tone::from_bits(0b10), Tone::T2);
        assert_eq!(Tone::from_bits(0b1111_0111), Tone::T3);
        assert_eq!(Tone::T1.bits(), 1);
        assert_eq!(Tone::T3.offset_hz(270), 810);
    }

    #[test]
    fn test_pin_pair_initializes_to_base_tone() {
        let lsb = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let msb = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let sink: PinPairTones<_, _, PinMock> = PinPairTones::new(lsb, msb, None, None);
        let (mut lsb, mut msb, _) = sink.release();
        lsb.done();
        msb.done();
    }

    #[test]
    fn test_pin_pair_emits_bit_pattern() {
        let lsb = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let msb = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut sink: PinPairTones<_, _, PinMock> = PinPairTones::new(lsb, msb, None, None);
        assert!(sink.emit(Tone::T1).is_ok());
        assert!(sink.emit(Tone::T2).is_ok());
        let (mut lsb, mut msb, _) = sink.release();
        lsb.done();
        msb.done();
    }

    #[test]
    fn test_pin_pair_keys_inverted_ptt() {
        let lsb = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let msb = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let ptt = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut sink = PinPairTones::new(lsb, msb, Some(ptt), Some(true));
        assert!(sink.key(true).is_ok());
        assert!(sink.key(false).is_ok());
        let (mut lsb, mut msb, ptt) = sink.release();
        lsb.done();
        msb.done();
        let _ = ptt.map(|mut ptt| ptt.done());
    }
}
