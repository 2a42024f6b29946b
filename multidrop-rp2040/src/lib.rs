//! RP2040 implementation of the 9-bit multidrop UART
//!
//! PIO programs plus embassy-rp state machine wrappers implementing
//! the `multidrop-core` transmit/receive seams, so the same frame
//! driver that runs against the software engines on the host runs
//! against real pins here.
//!
//! Target-only: this crate is excluded from the workspace default
//! members and builds for thumbv6m.

#![no_std]

pub mod pio;

pub use pio::{PioFrameRx, PioFrameTx, UartRxProgram, UartTxProgram, CYCLES_PER_BIT};
