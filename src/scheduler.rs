//! 4FSK symbol scheduler.
//!
//! This module provides the [`SymbolScheduler`] struct, which turns a periodic
//! [`TickFlag`] into a stream of tone selections. Each observed tick emits
//! exactly one [`Tone`] of the current [`SymbolStream`], so the transmitted baud
//! rate is whatever the symbol timer produces and nothing else.
//!
//! The scheduler never blocks. [`poll()`](SymbolScheduler::poll) returns
//! `WouldBlock` when no tick is pending, and the main loop is free to do bounded
//! work (GPS parsing, frame encoding) between polls. Work that overruns a symbol
//! period costs that tick: the flag does not count, so the late symbol is sent
//! one period late and the rest of the frame follows on the tick grid.
//!
//! ## Example
//!
//! ```rust
//! use horus4fsk::config::UNO_16MHZ;
//! use horus4fsk::scheduler::{SchedulerState, SymbolScheduler};
//! use horus4fsk::stream::SymbolStream;
//! use horus4fsk::tick::TickFlag;
//! use horus4fsk::timer::DelayTimer;
//! use horus4fsk::tone::{Tone, ToneSink};
//!
//! struct Radio;
//! impl ToneSink for Radio {
//!     type Error = ();
//!     fn emit(&mut self, _tone: Tone) -> Result<(), ()> { Ok(()) }
//! }
//!
//! static TICK: TickFlag = TickFlag::new();
//!
//! let mut scheduler = SymbolScheduler::new(DelayTimer::new(), Radio, &TICK, &UNO_16MHZ).unwrap();
//! scheduler.arm(SymbolStream::from_bytes(&[0x1b]).unwrap()).unwrap();
//!
//! for _ in 0..4 {
//!     TICK.raise(); // normally the timer ISR
//!     let _ = nb::block!(scheduler.poll());
//! }
//! assert_eq!(scheduler.state(), SchedulerState::InterFrameDelay);
//! ```
//!
//! ## Idle ticks
//!
//! By default the symbol timer keeps running while the scheduler is
//! [`Idle`](SchedulerState::Idle) and those ticks are consumed and ignored. With
//! [`set_disarm_when_idle(true)`](SymbolScheduler::set_disarm_when_idle) the timer
//! is disabled on entering `Idle` and restarted by the next [`arm`](SymbolScheduler::arm).

use core::convert::Infallible;

use crate::config::TransmitterConfig;
use crate::error::ConfigurationError;
use crate::logging::{log_debug, log_info, log_trace, log_warn};
use crate::stream::SymbolStream;
use crate::tick::TickFlag;
use crate::timer::{SymbolTimer, SymbolTiming};
use crate::tone::{Tone, ToneSink};

/// Operational state of a [`SymbolScheduler`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum SchedulerState {
    ///   No frame loaded. Ticks are ignored; the timer may be running or stopped.
    #[default]
    Idle,
    ///   A stream is loaded and the transmitter keyed; waiting for the first tick.
    Armed,
    ///   Mid-frame: each tick emits the next tone.
    Emitting,
    ///   The stream is exhausted; counting ticks until the next transmit opportunity.
    ///   A frame armed now is held until the delay ends.
    InterFrameDelay,
}

/// Emits one 4FSK tone per timer tick.
///
/// ## Type Parameters
///
/// - `T`: the [`SymbolTimer`] producing ticks (owned exclusively)
/// - `S`: the [`ToneSink`] that shifts the radio
///
/// ## Notes
///
/// - Only one scheduler may consume a given [`TickFlag`].
/// - Construction validates the configuration before the timer is touched; a bad
///   configuration never arms the timer.
/// - Tone sink errors are counted in [`sink_errors`](Self::sink_errors) and do not
///   stop the frame: the tick grid matters more than one corrupt symbol.
#[derive(Debug)]
pub struct SymbolScheduler<'a, T, S>
where
    T: SymbolTimer,
    S: ToneSink,
{
    state: SchedulerState,
    timer: T,
    sink: S,
    tick: &'a TickFlag,
    timing: SymbolTiming,
    stream: SymbolStream,
    pending: Option<SymbolStream>,
    cursor: usize,
    delay_remaining: u32,
    keyed: bool,
    disarm_when_idle: bool,

    /// Tones handed to the sink (successfully or not) since construction.
    pub symbols_sent: u32,

    /// Frames whose last symbol has been emitted.
    pub frames_sent: u16,

    /// Tone sink calls (`emit` or `key`) that returned an error.
    pub sink_errors: u16,
}

impl<'a, T, S> SymbolScheduler<'a, T, S>
where
    T: SymbolTimer,
    S: ToneSink,
{
    /// Validates `config`, then configures and starts the symbol timer.
    ///
    /// # Arguments
    /// - `timer`: the symbol timer, disarmed
    /// - `sink`: the radio tone interface
    /// - `tick`: the flag raised by the timer ISR
    /// - `config`: the deployment configuration
    ///
    /// # Errors
    /// Any [`ConfigurationError`]; in that case `timer` is dropped without being configured.
    pub fn new(
        timer: T,
        sink: S,
        tick: &'a TickFlag,
        config: &TransmitterConfig,
    ) -> Result<Self, ConfigurationError> {
        let timing = config.validate()?;
        let mut scheduler = Self {
            state: SchedulerState::Idle,
            timer,
            sink,
            tick,
            timing,
            stream: SymbolStream::new(),
            pending: None,
            cursor: 0,
            delay_remaining: 0,
            keyed: false,
            disarm_when_idle: false,
            symbols_sent: 0,
            frames_sent: 0,
            sink_errors: 0,
        };
        scheduler.start();
        Ok(scheduler)
    }

    /// (Re)starts the symbol timer with the validated timing and drops any stale tick.
    ///
    /// Calling it while running reloads the same period; nothing accumulates.
    pub fn start(&mut self) {
        self.timer.configure(&self.timing);
        self.tick.clear();
    }

    /// Stops transmission: disables the timer, unkeys, discards the current and pending frames.
    pub fn halt(&mut self) {
        self.timer.disable();
        self.tick.clear();
        if self.keyed {
            self.key(false);
        }
        self.stream = SymbolStream::new();
        self.pending = None;
        self.cursor = 0;
        self.delay_remaining = 0;
        self.state = SchedulerState::Idle;
        log_info!("scheduler halted after {} frames", self.frames_sent);
    }

    /// Chooses whether the timer is disabled whenever the scheduler goes idle.
    pub fn set_disarm_when_idle(&mut self, disarm: bool) {
        self.disarm_when_idle = disarm;
        if disarm && self.state == SchedulerState::Idle && self.timer.is_armed() {
            self.timer.disable();
        }
    }

    /// Current state, for diagnostics.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// The validated timing the timer was configured with.
    pub fn timing(&self) -> &SymbolTiming {
        &self.timing
    }

    /// The symbol timer.
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// The tone sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The tick flag this scheduler consumes.
    pub fn tick_flag(&self) -> &'a TickFlag {
        self.tick
    }

    /// Index of the next tone to emit in the current frame.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether a frame is waiting for the inter-frame delay to end.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Stops the timer and gives back the timer and the sink.
    pub fn release(mut self) -> (T, S) {
        self.halt();
        (self.timer, self.sink)
    }

    /// Loads a frame for transmission.
    ///
    /// - In [`Idle`](SchedulerState::Idle) the frame is armed at once (restarting the timer
    ///   if it was disarmed) and the transmitter keyed; the first tone goes out on the next tick.
    /// - In [`InterFrameDelay`](SchedulerState::InterFrameDelay) the frame is held and armed
    ///   when the delay ends. Only one frame is held.
    ///
    /// # Errors
    /// Hands the stream back if it is empty, if a frame is already on air, or if a frame is
    /// already held.
    pub fn arm(&mut self, stream: SymbolStream) -> Result<(), SymbolStream> {
        if stream.is_empty() {
            return Err(stream);
        }
        match self.state {
            SchedulerState::Idle => {
                if self.timer.is_armed() {
                    // A tick raised while idle belongs to the old grid position
                    self.tick.clear();
                } else {
                    self.start();
                }
                self.load(stream);
                Ok(())
            }
            SchedulerState::InterFrameDelay if self.pending.is_none() => {
                self.pending = Some(stream);
                Ok(())
            }
            _ => Err(stream),
        }
    }

    /// Handles one pending tick, if any.
    ///
    /// # Returns
    /// - `Ok(state)`: a tick was consumed; `state` is the state after handling it
    /// - `Err(WouldBlock)`: no tick since the last poll
    pub fn poll(&mut self) -> nb::Result<SchedulerState, Infallible> {
        if !self.tick.take() {
            return Err(nb::Error::WouldBlock);
        }
        self.on_tick();
        Ok(self.state)
    }

    /// Non-blocking check for the end of the current frame.
    ///
    /// `WouldBlock` while a frame is [`Armed`](SchedulerState::Armed) or
    /// [`Emitting`](SchedulerState::Emitting). The caller must keep polling; this never
    /// consumes ticks itself.
    pub fn wait_frame_sent(&self) -> nb::Result<(), Infallible> {
        match self.state {
            SchedulerState::Armed | SchedulerState::Emitting => Err(nb::Error::WouldBlock),
            _ => Ok(()),
        }
    }

    fn on_tick(&mut self) {
        match self.state {
            SchedulerState::Idle => {}
            SchedulerState::Armed | SchedulerState::Emitting => self.emit_next(),
            SchedulerState::InterFrameDelay => self.count_delay(),
        }
    }

    fn load(&mut self, stream: SymbolStream) {
        log_trace!("arming frame of {} symbols", stream.len());
        self.stream = stream;
        self.cursor = 0;
        self.state = SchedulerState::Armed;
        self.key(true);
    }

    fn emit_next(&mut self) {
        if let Some(tone) = self.stream.get(self.cursor) {
            self.emit(tone);
            self.cursor += 1;
            self.symbols_sent = self.symbols_sent.wrapping_add(1);
            self.state = SchedulerState::Emitting;
        }
        if self.cursor >= self.stream.len() {
            self.frames_sent = self.frames_sent.wrapping_add(1);
            self.delay_remaining = self.timing.inter_frame_ticks();
            self.state = SchedulerState::InterFrameDelay;
            log_debug!(
                "frame {} sent, {} delay ticks",
                self.frames_sent,
                self.delay_remaining
            );
        }
    }

    // The first delay tick closes the last symbol's period, so unkey there.
    fn count_delay(&mut self) {
        if self.keyed {
            self.key(false);
        }
        self.delay_remaining = self.delay_remaining.saturating_sub(1);
        if self.delay_remaining > 0 {
            return;
        }
        match self.pending.take() {
            Some(next) => self.load(next),
            None => {
                self.state = SchedulerState::Idle;
                if self.disarm_when_idle {
                    self.timer.disable();
                }
            }
        }
    }

    fn emit(&mut self, tone: Tone) {
        if self.sink.emit(tone).is_err() {
            self.sink_errors = self.sink_errors.wrapping_add(1);
            log_warn!("tone sink rejected symbol {}", self.cursor);
        }
    }

    fn key(&mut self, on: bool) {
        self.keyed = on;
        if self.sink.key(on).is_err() {
            self.sink_errors = self.sink_errors.wrapping_add(1);
            log_warn!("tone sink failed to key {}", on);
        }
    }
}
