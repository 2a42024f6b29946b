//! Parity computation over the 9-bit payload.
//!
//! The parity bit covers all nine payload bits (address flag plus the
//! eight data bits): `parity = base ^ xor_reduce(payload)`, where
//! `base` is 1 for odd polarity and 0 for even polarity.

use crate::frame::PAYLOAD_MASK;

/// Parity polarity for the wire frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParityMode {
    /// No parity bit; the frame shortens by one bit period
    None,
    /// Parity bit makes the total number of set bits odd (the "9 Odd 1"
    /// profile used by MDB)
    #[default]
    Odd,
    /// Parity bit makes the total number of set bits even
    Even,
}

impl ParityMode {
    /// Number of bits shifted on the wire between start and stop:
    /// 9 payload bits, plus the parity bit when enabled.
    pub fn shift_bits(self) -> usize {
        match self {
            ParityMode::None => 9,
            ParityMode::Odd | ParityMode::Even => 10,
        }
    }
}

/// Compute the parity bit for a 9-bit payload, if the mode carries one.
///
/// Bits above the payload mask are ignored so callers can pass a raw
/// FIFO word directly.
pub fn parity_bit(mode: ParityMode, payload: u16) -> Option<bool> {
    let reduce = (payload & PAYLOAD_MASK).count_ones() & 1 == 1;
    match mode {
        ParityMode::None => None,
        ParityMode::Odd => Some(!reduce),
        ParityMode::Even => Some(reduce),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_parity_of_empty_payload() {
        // Zero set bits: odd parity must add one
        assert_eq!(parity_bit(ParityMode::Odd, 0x000), Some(true));
        assert_eq!(parity_bit(ParityMode::Even, 0x000), Some(false));
    }

    #[test]
    fn test_parity_covers_address_flag() {
        // Same data byte, different address flag must flip the parity
        let data_frame = 0x2A << 1;
        let addr_frame = data_frame | 1;
        assert_ne!(
            parity_bit(ParityMode::Odd, data_frame),
            parity_bit(ParityMode::Odd, addr_frame)
        );
    }

    #[test]
    fn test_none_mode_has_no_parity() {
        assert_eq!(parity_bit(ParityMode::None, 0x1FF), None);
        assert_eq!(ParityMode::None.shift_bits(), 9);
        assert_eq!(ParityMode::Odd.shift_bits(), 10);
    }

    #[test]
    fn test_bits_above_payload_ignored() {
        assert_eq!(
            parity_bit(ParityMode::Odd, 0x0155),
            parity_bit(ParityMode::Odd, 0xFE00 | 0x0155)
        );
    }
}
