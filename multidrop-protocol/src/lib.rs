//! Frame model for the 9-bit multidrop UART
//!
//! Legacy vending/industrial buses (MDB, some RS485 deployments) use a
//! "9 Odd 1" UART profile: eight data bits plus a ninth address/data
//! flag that lets sleeping peripherals ignore traffic that is not for
//! them. This crate defines the host-level payload word, the parity
//! rule, and the bit-exact wire frame shared by the transmit and
//! receive engines:
//!
//! ```text
//! ┌──────┬───────┬──────────────────┬────────┬──────┐
//! │ IDLE │ START │ D0..D8           │ PARITY │ STOP │
//! │ high │ low   │ LSB first, 9 bit │ 1 bit  │ high │
//! └──────┴───────┴──────────────────┴────────┴──────┘
//! ```
//!
//! D0 carries the address/data flag, D1..D8 the payload byte. The
//! parity bit covers all nine data bits and is recomputed identically
//! on both ends; it is derived, never stored.

#![no_std]
#![deny(unsafe_code)]

pub mod frame;
pub mod parity;

pub use frame::{
    decode, encode, wire_bits, LineError, PayloadWord, MAX_WIRE_BITS, PARITY_BIT, PAYLOAD_BITS,
    PAYLOAD_MASK,
};
pub use parity::{parity_bit, ParityMode};
