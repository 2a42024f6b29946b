//! Frame encoding and decoding for the 9-bit multidrop UART.
//!
//! A raw FIFO word is the unit exchanged with the bit engines: payload
//! bits 0..=8 (D0 = address/data flag, D1..D8 = data byte, LSB first on
//! the wire) and the parity bit at position 9 when parity is enabled.
//! The same layout is used in both directions so sender and receiver
//! recompute parity over identical bits.
//!
//! An earlier draft of this design folded parity into an unused high
//! bit of a 16-bit container and shifted only 9 bits; that layout is
//! superseded by the explicit parity bit implemented here.

use heapless::Vec;

use crate::parity::{parity_bit, ParityMode};

/// Number of payload bits per frame (address flag + data byte)
pub const PAYLOAD_BITS: usize = 9;

/// Mask covering the 9 payload bits of a raw word
pub const PAYLOAD_MASK: u16 = 0x01FF;

/// Position of the parity bit in a raw FIFO word
pub const PARITY_BIT: u16 = 1 << 9;

/// Maximum wire frame length in bit periods
/// (start + 9 data + parity + stop)
pub const MAX_WIRE_BITS: usize = 12;

/// Line-level errors shared by the receive engine and the frame driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Stop bit not observed high at the expected position, or a break
    /// condition (extended low)
    Framing,
    /// Received parity bit disagrees with the recomputed one
    Parity,
}

/// The 9-bit host-level payload: address/data flag plus one byte.
///
/// An address frame (`is_address` set) selects which downstream
/// listener accepts subsequent data frames; a data frame carries a
/// byte for the currently addressed listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PayloadWord {
    /// Address frame (true) or data frame (false)
    pub is_address: bool,
    /// The application byte
    pub data: u8,
}

impl PayloadWord {
    /// Pack into the 9 payload bits of a raw word.
    ///
    /// The address flag occupies bit 0 and is therefore the first bit
    /// on the wire; the data byte follows in bits 1..=8.
    pub fn pack(self) -> u16 {
        (self.is_address as u16) | ((self.data as u16) << 1)
    }

    /// Unpack from the low 9 bits of a raw word, ignoring the rest.
    pub fn unpack(raw: u16) -> Self {
        Self {
            is_address: raw & 1 != 0,
            data: (raw >> 1) as u8,
        }
    }
}

/// Build the raw FIFO word for a payload: payload in bits 0..=8,
/// parity (if the mode carries one) in bit 9.
pub fn encode(word: PayloadWord, mode: ParityMode) -> u16 {
    let payload = word.pack();
    match parity_bit(mode, payload) {
        Some(true) => payload | PARITY_BIT,
        Some(false) | None => payload,
    }
}

/// Decode a raw word pulled from the receive engine, validating parity.
///
/// A parity mismatch yields [`LineError::Parity`] and the payload is
/// withheld; the caller must not act on the frame.
pub fn decode(raw: u16, mode: ParityMode) -> Result<PayloadWord, LineError> {
    if let Some(expected) = parity_bit(mode, raw) {
        if (raw & PARITY_BIT != 0) != expected {
            return Err(LineError::Parity);
        }
    }
    Ok(PayloadWord::unpack(raw))
}

/// Expand a raw word into the full sequence of wire levels, one entry
/// per bit period: start (low), shift bits LSB first, stop (high).
/// `true` is the high/idle level.
pub fn wire_bits(raw: u16, mode: ParityMode) -> Vec<bool, MAX_WIRE_BITS> {
    let mut bits = Vec::new();
    // Capacity covers the longest frame, pushes cannot fail
    let _ = bits.push(false); // start
    for n in 0..mode.shift_bits() {
        let _ = bits.push(raw >> n & 1 != 0);
    }
    let _ = bits.push(true); // stop
    bits
}
