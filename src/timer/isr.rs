use super::{SymbolTimer, SymbolTiming};
use crate::logging::log_debug;

/// `WGMn2` in control register B: clear timer on compare match (CTC, mode 4).
pub const WGM_CTC: u8 = 1 << 3;

/// `OCIEnA` in the interrupt mask register: compare match A interrupt enable.
pub const OCIE_A: u8 = 1 << 1;

/// Register access for one 16-bit compare-match timer (AVR Timer1 layout).
///
/// Platform adapters implement this over their memory-mapped registers; the
/// configuration sequence itself lives in [`CtcTimer`] and is shared by all of them.
pub trait CompareMatchRegisters {
    /// Writes control register A (`TCCRnA`).
    fn write_control_a(&mut self, value: u8);
    /// Writes control register B (`TCCRnB`).
    fn write_control_b(&mut self, value: u8);
    /// Reads control register B (`TCCRnB`).
    fn read_control_b(&self) -> u8;
    /// Writes the running counter (`TCNTn`).
    fn write_counter(&mut self, value: u16);
    /// Writes output compare register A (`OCRnA`).
    fn write_compare_a(&mut self, value: u16);
    /// Reads the interrupt mask (`TIMSKn`).
    fn read_interrupt_mask(&self) -> u8;
    /// Writes the interrupt mask (`TIMSKn`).
    fn write_interrupt_mask(&mut self, value: u8);
    /// Sets the global interrupt enable bit.
    fn enable_global_interrupts(&mut self);
}

/// A [`SymbolTimer`] on a hardware compare-match timer in CTC mode.
///
/// Configuration runs inside `critical_section::with`, so the compare-match ISR never sees a
/// half-written timer. Once the section closes, global interrupts are enabled
/// unconditionally: at reset they start disabled, and the symbol clock is the first thing
/// that needs them.
///
/// # Example
/// ```rust,ignore
/// use horus4fsk::timer::{CtcTimer, atmega328p::Timer1};
///
/// let timer = CtcTimer::new(unsafe { Timer1::steal() });
/// ```
#[derive(Debug)]
pub struct CtcTimer<R: CompareMatchRegisters> {
    regs: R,
    armed: bool,
}

impl<R: CompareMatchRegisters> CtcTimer<R> {
    /// Wraps the timer's registers. The timer is left untouched until configured.
    pub fn new(regs: R) -> Self {
        Self { regs, armed: false }
    }

    /// Borrows the underlying registers.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Gives the registers back.
    pub fn release(self) -> R {
        self.regs
    }
}

impl<R: CompareMatchRegisters> SymbolTimer for CtcTimer<R> {
    fn configure(&mut self, timing: &SymbolTiming) {
        critical_section::with(|_| {
            let mask = self.regs.read_interrupt_mask();
            self.regs.write_interrupt_mask(mask & !OCIE_A);

            // Stop the clock and zero the count
            self.regs.write_control_a(0);
            self.regs.write_control_b(0);
            self.regs.write_counter(0);

            // The counter resets to 0 after matching OCRnA
            self.regs.write_compare_a(timing.tick_count());
            let control_b = self.regs.read_control_b();
            self.regs.write_control_b(control_b | WGM_CTC);
            let control_b = self.regs.read_control_b();
            self.regs
                .write_control_b(control_b | timing.prescaler().clock_select_bits());

            let mask = self.regs.read_interrupt_mask();
            self.regs.write_interrupt_mask(mask | OCIE_A);
        });
        self.regs.enable_global_interrupts();
        self.armed = true;
        log_debug!(
            "symbol timer armed: compare {}, prescaler /{}",
            timing.tick_count(),
            timing.prescaler().divisor()
        );
    }

    fn disable(&mut self) {
        critical_section::with(|_| {
            let mask = self.regs.read_interrupt_mask();
            self.regs.write_interrupt_mask(mask & !OCIE_A);
            // No clock source selected: the counter stops where it is
            self.regs.write_control_b(0);
        });
        self.armed = false;
        log_debug!("symbol timer disabled");
    }

    fn is_armed(&self) -> bool {
        self.armed
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Recording register fake for host tests.

    use super::CompareMatchRegisters;

    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub(crate) enum RegWrite {
        ControlA(u8),
        ControlB(u8),
        Counter(u16),
        CompareA(u16),
        InterruptMask(u8),
        GlobalEnable,
    }

    #[derive(Debug, Default)]
    pub(crate) struct FakeRegisters {
        pub(crate) control_a: u8,
        pub(crate) control_b: u8,
        pub(crate) counter: u16,
        pub(crate) compare_a: u16,
        pub(crate) interrupt_mask: u8,
        pub(crate) global_enabled: bool,
        pub(crate) log: Vec<RegWrite>,
    }

    impl CompareMatchRegisters for FakeRegisters {
        fn write_control_a(&mut self, value: u8) {
            self.control_a = value;
            self.log.push(RegWrite::ControlA(value));
        }
        fn write_control_b(&mut self, value: u8) {
            self.control_b = value;
            self.log.push(RegWrite::ControlB(value));
        }
        fn read_control_b(&self) -> u8 {
            self.control_b
        }
        fn write_counter(&mut self, value: u16) {
            self.counter = value;
            self.log.push(RegWrite::Counter(value));
        }
        fn write_compare_a(&mut self, value: u16) {
            self.compare_a = value;
            self.log.push(RegWrite::CompareA(value));
        }
        fn read_interrupt_mask(&self) -> u8 {
            self.interrupt_mask
        }
        fn write_interrupt_mask(&mut self, value: u8) {
            self.interrupt_mask = value;
            self.log.push(RegWrite::InterruptMask(value));
        }
        fn enable_global_interrupts(&mut self) {
            self.global_enabled = true;
            self.log.push(RegWrite::GlobalEnable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeRegisters, RegWrite};
    use super::*;
    use crate::config::{PRO_MINI_8MHZ, UNO_16MHZ};

    #[test]
    fn test_configure_follows_timer1_sequence() {
        let timing = PRO_MINI_8MHZ.validate().unwrap();
        let mut timer = CtcTimer::new(FakeRegisters::default());
        timer.configure(&timing);

        assert!(timer.is_armed());
        assert_eq!(
            timer.registers().log,
            vec![
                RegWrite::InterruptMask(0),
                RegWrite::ControlA(0),
                RegWrite::ControlB(0),
                RegWrite::Counter(0),
                RegWrite::CompareA(625),
                RegWrite::ControlB(WGM_CTC),
                RegWrite::ControlB(WGM_CTC | 0b100),
                RegWrite::InterruptMask(OCIE_A),
                RegWrite::GlobalEnable,
            ]
        );
    }

    #[test]
    fn test_configure_preserves_other_interrupt_bits() {
        let timing = UNO_16MHZ.with_tick_override(310).validate().unwrap();
        let regs = FakeRegisters {
            interrupt_mask: 0b0000_0101,
            ..Default::default()
        };
        let mut timer = CtcTimer::new(regs);
        timer.configure(&timing);
        let regs = timer.release();
        assert_eq!(regs.interrupt_mask, 0b0000_0101 | OCIE_A);
        assert_eq!(regs.compare_a, 310);
        assert_eq!(regs.control_a, 0);
        assert_eq!(regs.counter, 0);
        assert!(regs.global_enabled);
    }

    #[test]
    fn test_disable_masks_interrupt_and_stops_clock() {
        let timing = UNO_16MHZ.validate().unwrap();
        let mut timer = CtcTimer::new(FakeRegisters::default());
        timer.configure(&timing);
        timer.disable();
        assert!(!timer.is_armed());
        assert_eq!(timer.registers().interrupt_mask & OCIE_A, 0);
        assert_eq!(timer.registers().control_b, 0);
    }

    #[test]
    fn test_reconfigure_is_idempotent() {
        let timing = PRO_MINI_8MHZ.with_tick_override(620).validate().unwrap();
        let mut timer = CtcTimer::new(FakeRegisters::default());

        timer.disable();
        timer.configure(&timing);
        let first = (
            timer.registers().compare_a,
            timer.registers().control_b,
            timer.registers().interrupt_mask,
        );
        let first_len = timer.registers().log.len();

        timer.disable();
        timer.configure(&timing);
        let second = (
            timer.registers().compare_a,
            timer.registers().control_b,
            timer.registers().interrupt_mask,
        );

        assert_eq!(first, second);
        assert_eq!(first, (620, WGM_CTC | 0b100, OCIE_A));
        assert_eq!(timer.registers().log[..first_len], timer.registers().log[first_len..]);
    }
}
