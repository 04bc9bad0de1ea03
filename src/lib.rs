//! # horus4fsk
//!
//! A portable, no_std Rust symbol scheduler for Horus-binary 4FSK telemetry
//! transmitters, as flown on high-altitude balloons.
//!
//! This crate implements the timing core of a 4FSK transmitter using:
//! - a hardware compare-match timer (CTC mode) as a free-running symbol clock
//! - a single atomic [`TickFlag`](tick::TickFlag) between the timer ISR and the main loop
//! - a non-blocking state machine that emits exactly one tone per observed tick
//! - `embedded-hal` traits for tone-select and push-to-talk pins
//!
//! GPS parsing, Horus frame encoding and radio register programming stay outside:
//! the scheduler consumes finished frames and hands tones to a [`ToneSink`](tone::ToneSink).
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support and replaces `heapless::Vec`s with
//! `std::vec::Vec`s |
//! | `timer-isr` (default) | Hardware compare-match symbol timer, configured under `critical_section::with` |
//! | `atmega328p`          | ATmega328P Timer1 register adapter (implies `timer-isr`) |
//! | `delay-loop`          | Uses `embedded_hal::delay::DelayNs` as a software symbol clock |
//! | `defmt-0-3`           | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use horus4fsk::config::PRO_MINI_8MHZ;
//! use horus4fsk::scheduler::SymbolScheduler;
//! use horus4fsk::timer::{CtcTimer, atmega328p::Timer1};
//!
//! horus4fsk::init_symbol_tick!();
//!
//! #[avr_device::interrupt(atmega328p)]
//! fn TIMER1_COMPA() {
//!     horus4fsk::raise_symbol_tick!();
//! }
//!
//! let config = PRO_MINI_8MHZ.with_tick_override(620); // this board's calibration
//! let timer = CtcTimer::new(unsafe { Timer1::steal() });
//! let mut scheduler = SymbolScheduler::new(timer, radio, &SYMBOL_TICK, &config)?;
//! loop {
//!     if scheduler.state() == SchedulerState::Idle {
//!         // acquire a fix and encode the next frame here
//!         let _ = scheduler.arm(next_frame);
//!     }
//!     let _ = scheduler.poll();
//! }
//! ```
//!
//! ## Integration Notes
//!
//! - Symbol timing is 50 or 100 baud (20 ms or 10 ms per tick)
//! - The ISR must do nothing but raise the tick flag
//! - Keep the work between polls shorter than one symbol period; a late poll loses the tick
//! - Only one scheduler instance should consume a given tick flag
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

pub mod config;
pub mod consts;
pub mod error;
pub(crate) mod logging;
pub mod scheduler;
pub mod stream;
pub mod tick;
pub mod timer;
pub mod tone;
