//! Transmitter configuration and board presets.
//!
//! A [`TransmitterConfig`] gathers everything fixed per deployment: the clock
//! profile, an optional calibrated tick count, the pause between transmissions,
//! and the Horus-binary variant. [`TransmitterConfig::validate`] turns it into a
//! [`SymbolTiming`], the only value a [`SymbolTimer`](crate::timer::SymbolTimer)
//! accepts, so an invalid configuration can never reach the hardware.
//!
//! ## Calibration
//!
//! Crystal tolerance and interrupt latency shift the real symbol rate away from
//! the computed one. Boards are tuned by measuring the received baud rate and
//! supplying a corrected compare value with
//! [`with_tick_override`](TransmitterConfig::with_tick_override). Such values
//! belong to one board; the presets below carry none.

use crate::consts::{
    DEFAULT_TX_DELAY_MS, FSK4_DEFAULT_BAUD, FSK4_SLOW_BAUD, HORUS_V1_FRAME_LEN,
    HORUS_V2_FRAME_LEN, PAYLOAD_ID_V1, PAYLOAD_ID_V2, SYMBOLS_PER_BYTE,
};
use crate::error::ConfigurationError;
use crate::logging::log_info;
use crate::timer::{ClockProfile, Prescaler, SymbolTiming, delay_ms_to_ticks};

/// Horus-binary payload format carried by the frames.
///
/// Only affects frame size and payload id; the scheduler is agnostic.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum ProtocolVariant {
    /// Horus-binary V1: 22-byte payload, 8-bit payload ids.
    #[default]
    HorusV1,
    /// Horus-binary V2: 32-byte payload, 16-bit payload ids.
    HorusV2,
}

impl ProtocolVariant {
    /// Test payload id for this variant (`4FSKTEST` / `4FSKTEST-V2`).
    pub const fn default_payload_id(self) -> u16 {
        match self {
            ProtocolVariant::HorusV1 => PAYLOAD_ID_V1,
            ProtocolVariant::HorusV2 => PAYLOAD_ID_V2,
        }
    }

    /// Encoded frame length in bytes.
    pub const fn frame_len(self) -> usize {
        match self {
            ProtocolVariant::HorusV1 => HORUS_V1_FRAME_LEN,
            ProtocolVariant::HorusV2 => HORUS_V2_FRAME_LEN,
        }
    }

    /// Encoded frame length in 4FSK symbols.
    pub const fn frame_symbols(self) -> usize {
        self.frame_len() * SYMBOLS_PER_BYTE
    }
}

/// Everything the symbol scheduler needs to know about one deployment.
///
/// # Example
/// ```rust
/// use horus4fsk::config::{TransmitterConfig, UNO_16MHZ};
///
/// // This particular board measured fast; its calibrated compare value is 310.
/// let config: TransmitterConfig = UNO_16MHZ.with_tick_override(310);
/// let timing = config.validate().unwrap();
/// assert_eq!(timing.computed_tick_count(), 625);
/// assert_eq!(timing.tick_count(), 310);
/// ```
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TransmitterConfig {
    /// Processor clock, prescaler and target baud.
    pub clock: ClockProfile,
    /// Calibrated compare value; replaces the computed one when set.
    pub tick_override: Option<u16>,
    /// Pause between the end of one frame and the next transmit opportunity.
    pub inter_frame_delay_ms: u32,
    /// Payload format of the frames fed to the scheduler.
    pub variant: ProtocolVariant,
}

impl TransmitterConfig {
    /// A configuration with no override, the default transmit delay and Horus V1.
    pub const fn new(clock: ClockProfile) -> Self {
        Self {
            clock,
            tick_override: None,
            inter_frame_delay_ms: DEFAULT_TX_DELAY_MS,
            variant: ProtocolVariant::HorusV1,
        }
    }

    /// Sets a calibrated compare value.
    pub const fn with_tick_override(mut self, ticks: u16) -> Self {
        self.tick_override = Some(ticks);
        self
    }

    /// Sets the inter-frame delay.
    pub const fn with_inter_frame_delay_ms(mut self, delay_ms: u32) -> Self {
        self.inter_frame_delay_ms = delay_ms;
        self
    }

    /// Sets the payload variant.
    pub const fn with_variant(mut self, variant: ProtocolVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Validates the configuration and derives the symbol timing.
    ///
    /// The clock profile is always checked in full, even when an override is set:
    /// the inter-frame delay is counted in symbol ticks and needs a sane profile.
    /// When present, the override becomes the programmed compare value.
    ///
    /// # Errors
    /// Any [`ConfigurationError`] from [`ClockProfile::tick_count`], or
    /// [`ConfigurationError::ZeroTickOverride`].
    pub fn validate(&self) -> Result<SymbolTiming, ConfigurationError> {
        let computed = self.clock.tick_count()?;
        let prescaler = Prescaler::from_divisor(self.clock.prescaler)?;
        let tick_count = match self.tick_override {
            Some(0) => return Err(ConfigurationError::ZeroTickOverride),
            Some(ticks) => ticks,
            None => computed,
        };
        let timing = SymbolTiming {
            tick_count,
            computed_tick_count: computed,
            overridden: self.tick_override.is_some(),
            prescaler,
            processor_clock_hz: self.clock.processor_clock_hz,
            target_baud: self.clock.target_baud,
            inter_frame_ticks: delay_ms_to_ticks(
                self.inter_frame_delay_ms,
                self.clock.processor_clock_hz,
                prescaler,
                tick_count,
            ),
        };
        log_info!(
            "symbol timing: {} ticks (computed {}), {} mBd, {} delay ticks",
            timing.tick_count(),
            timing.computed_tick_count(),
            timing.effective_millibaud(),
            timing.inter_frame_ticks()
        );
        Ok(timing)
    }
}

/// 8 MHz boards (3.3 V Pro Mini class): Timer1 /256, 50 baud.
pub const PRO_MINI_8MHZ: TransmitterConfig =
    TransmitterConfig::new(ClockProfile::new(8_000_000, 256, FSK4_SLOW_BAUD));

/// 16 MHz boards (Uno/Nano class): Timer1 /256, 100 baud.
pub const UNO_16MHZ: TransmitterConfig =
    TransmitterConfig::new(ClockProfile::new(16_000_000, 256, FSK4_DEFAULT_BAUD));
