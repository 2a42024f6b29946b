//! Board-agnostic core of the 9-bit multidrop UART
//!
//! This crate contains everything between the frame model and the
//! physical pins:
//!
//! - Bit timing (`cycles_per_bit` derivation from clock and baud)
//! - Software transmit/receive engines: deterministic, cycle-ticked
//!   state machines mirroring the fixed-function PIO sequencers
//! - The host frame driver: parity, address-frame listen filtering,
//!   sticky error reporting
//! - The traits that let the driver run over either the software
//!   engines or the RP2040 PIO FIFOs
//!
//! Everything here is `no_std` and testable on the host.

#![no_std]
#![deny(unsafe_code)]

pub mod driver;
pub mod engine;
pub mod timing;
pub mod traits;

pub use driver::{Received, SendError, Uart9, UartConfig};
pub use engine::{Level, RxEngine, TxEngine};
pub use timing::{BitTiming, TimingError, DEFAULT_BAUD, SYS_CLK_HZ};
pub use traits::{RawFrameRx, RawFrameTx};
