use embedded_hal::delay::DelayNs;

use super::{SymbolTimer, SymbolTiming};
use crate::scheduler::{SchedulerState, SymbolScheduler};
use crate::tone::ToneSink;

/// A software [`SymbolTimer`] for boards without a spare hardware timer.
///
/// Nothing runs in the background: [`run_symbol_loop`] sleeps one symbol period with a
/// `DelayNs` provider and raises the tick flag itself. Work done between ticks (the
/// tone sink included) adds to the period, so this source drifts where `CtcTimer` does not.
#[derive(Debug, Default)]
pub struct DelayTimer {
    period_us: u32,
    armed: bool,
}

impl DelayTimer {
    /// Creates a disarmed delay timer.
    pub const fn new() -> Self {
        Self {
            period_us: 0,
            armed: false,
        }
    }

    /// Symbol period loaded by the last `configure`, in microseconds.
    pub fn period_us(&self) -> u32 {
        self.period_us
    }
}

impl SymbolTimer for DelayTimer {
    fn configure(&mut self, timing: &SymbolTiming) {
        self.period_us = timing.period_us();
        self.armed = true;
    }

    fn disable(&mut self) {
        self.armed = false;
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

/// Sleeps one symbol period, raises the tick and polls the scheduler once.
///
/// # Returns
/// - `Some(state)` after a tick was handled
/// - `None` if the timer is disarmed (nothing is delayed)
pub fn step_symbol_loop<D: DelayNs, S: ToneSink>(
    scheduler: &mut SymbolScheduler<'_, DelayTimer, S>,
    delay: &mut D,
) -> Option<SchedulerState> {
    if !scheduler.timer().is_armed() {
        return None;
    }
    delay.delay_us(scheduler.timer().period_us());
    scheduler.tick_flag().raise();
    scheduler.poll().ok()
}

/// Runs a blocking loop that drives the scheduler from a delay provider.
///
/// This is a simple timing loop for environments where interrupts are unavailable
/// or undesired. It returns once the scheduler is halted.
///
/// # Arguments
/// - `scheduler`: A scheduler built over a [`DelayTimer`].
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
///
/// # Example
/// ```rust
/// # use embedded_hal_mock::eh1::delay::NoopDelay;
/// use horus4fsk::config::PRO_MINI_8MHZ;
/// use horus4fsk::scheduler::SymbolScheduler;
/// use horus4fsk::stream::SymbolStream;
/// use horus4fsk::tick::TickFlag;
/// use horus4fsk::timer::{DelayTimer, run_symbol_loop};
/// use horus4fsk::tone::{Tone, ToneSink};
///
/// struct Radio;
/// impl ToneSink for Radio {
///     type Error = ();
///     fn emit(&mut self, _tone: Tone) -> Result<(), ()> { Ok(()) }
/// }
///
/// let tick = TickFlag::new();
/// let config = PRO_MINI_8MHZ.with_inter_frame_delay_ms(0);
/// let mut scheduler = SymbolScheduler::new(DelayTimer::new(), Radio, &tick, &config).unwrap();
/// scheduler.arm(SymbolStream::from_bytes(b"$$").unwrap()).unwrap();
/// scheduler.set_disarm_when_idle(true);
/// run_symbol_loop(&mut scheduler, &mut NoopDelay::new());
/// assert_eq!(scheduler.symbols_sent, 8);
/// ```
///
/// # Notes
/// - For accurate baud rates, prefer interrupt-driven tick scheduling.
pub fn run_symbol_loop<D: DelayNs, S: ToneSink>(
    scheduler: &mut SymbolScheduler<'_, DelayTimer, S>,
    delay: &mut D,
) {
    while step_symbol_loop(scheduler, delay).is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PRO_MINI_8MHZ, UNO_16MHZ};
    use crate::stream::SymbolStream;
    use crate::tick::TickFlag;
    use crate::tone::Tone;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    #[derive(Debug, Default)]
    struct Recorder {
        tones: Vec<Tone>,
    }

    impl ToneSink for Recorder {
        type Error = ();
        fn emit(&mut self, tone: Tone) -> Result<(), ()> {
            self.tones.push(tone);
            Ok(())
        }
    }

    #[test]
    fn test_delay_timer_period_matches_profile() {
        let mut timer = DelayTimer::new();
        assert!(!timer.is_armed());
        timer.configure(&PRO_MINI_8MHZ.validate().unwrap());
        assert!(timer.is_armed());
        assert_eq!(timer.period_us(), 20_000);
        timer.configure(&UNO_16MHZ.with_tick_override(310).validate().unwrap());
        assert_eq!(timer.period_us(), 4_960);
        timer.disable();
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_step_emits_one_symbol_per_period() {
        let tick = TickFlag::new();
        let config = UNO_16MHZ.with_inter_frame_delay_ms(0);
        let mut scheduler =
            SymbolScheduler::new(DelayTimer::new(), Recorder::default(), &tick, &config).unwrap();
        let stream = SymbolStream::from_tones(&[Tone::T1, Tone::T2]).unwrap();
        assert!(scheduler.arm(stream).is_ok());

        let mut delay = NoopDelay::new();
        assert_eq!(
            step_symbol_loop(&mut scheduler, &mut delay),
            Some(SchedulerState::Emitting)
        );
        assert_eq!(
            step_symbol_loop(&mut scheduler, &mut delay),
            Some(SchedulerState::InterFrameDelay)
        );
        assert_eq!(scheduler.sink().tones, vec![Tone::T1, Tone::T2]);
    }

    #[test]
    fn test_step_does_nothing_when_halted() {
        let tick = TickFlag::new();
        let mut scheduler =
            SymbolScheduler::new(DelayTimer::new(), Recorder::default(), &tick, &UNO_16MHZ)
                .unwrap();
        scheduler.halt();
        assert_eq!(step_symbol_loop(&mut scheduler, &mut NoopDelay::new()), None);
        assert!(!tick.is_raised());
    }
}
