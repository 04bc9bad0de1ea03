//! ATmega328P Timer1 register adapter.
//!
//! Plugs the 16-bit Timer1 into [`CtcTimer`](super::CtcTimer). Register
//! addresses are the data-space addresses from the ATmega328P datasheet.
//! Bind the compare-match vector (`TIMER1_COMPA`) to
//! [`raise_symbol_tick!`](crate::raise_symbol_tick) in the application.

use core::ptr::{read_volatile, write_volatile};

use super::CompareMatchRegisters;

const TCCR1A: *mut u8 = 0x80 as *mut u8;
const TCCR1B: *mut u8 = 0x81 as *mut u8;
const TCNT1L: *mut u8 = 0x84 as *mut u8;
const TCNT1H: *mut u8 = 0x85 as *mut u8;
const OCR1AL: *mut u8 = 0x88 as *mut u8;
const OCR1AH: *mut u8 = 0x89 as *mut u8;
const TIMSK1: *mut u8 = 0x6F as *mut u8;
const SREG: *mut u8 = 0x5F as *mut u8;

/// Global interrupt enable bit in `SREG`.
const SREG_I: u8 = 1 << 7;

/// Exclusive handle on Timer1.
#[derive(Debug)]
pub struct Timer1 {
    _private: (),
}

impl Timer1 {
    /// Takes Timer1.
    ///
    /// # Safety
    /// Only one `Timer1` may exist, and nothing else (PWM on pins 9/10, `millis`-style
    /// libraries) may touch Timer1 while it does.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }

    // 16-bit registers go through the shared TEMP latch: high byte first on write.
    fn write_wide(high: *mut u8, low: *mut u8, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        unsafe {
            write_volatile(high, hi);
            write_volatile(low, lo);
        }
    }
}

impl CompareMatchRegisters for Timer1 {
    fn write_control_a(&mut self, value: u8) {
        unsafe { write_volatile(TCCR1A, value) }
    }

    fn write_control_b(&mut self, value: u8) {
        unsafe { write_volatile(TCCR1B, value) }
    }

    fn read_control_b(&self) -> u8 {
        unsafe { read_volatile(TCCR1B) }
    }

    fn write_counter(&mut self, value: u16) {
        Self::write_wide(TCNT1H, TCNT1L, value);
    }

    fn write_compare_a(&mut self, value: u16) {
        Self::write_wide(OCR1AH, OCR1AL, value);
    }

    fn read_interrupt_mask(&self) -> u8 {
        unsafe { read_volatile(TIMSK1) }
    }

    fn write_interrupt_mask(&mut self, value: u8) {
        unsafe { write_volatile(TIMSK1, value) }
    }

    fn enable_global_interrupts(&mut self) {
        unsafe {
            let sreg = read_volatile(SREG);
            write_volatile(SREG, sreg | SREG_I);
        }
    }
}
