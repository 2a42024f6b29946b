//! Transmit engine: serializes one frame at a time onto the line.

use heapless::Vec;
use multidrop_protocol::{wire_bits, ParityMode, MAX_WIRE_BITS};

use crate::engine::Level;
use crate::timing::BitTiming;
use crate::traits::RawFrameTx;

/// Cycle-ticked transmitter with a single-frame buffer.
///
/// While idle the line is held at the stop/idle level (high). A
/// submitted frame is played back bit by bit, each level held for
/// exactly one bit period: start (low), the shift bits LSB first,
/// stop (high). A second submission while shifting is refused until
/// the frame has fully drained; there is no queue.
#[derive(Debug, Clone)]
pub struct TxEngine {
    timing: BitTiming,
    parity: ParityMode,
    bits: Vec<bool, MAX_WIRE_BITS>,
    index: usize,
    countdown: u32,
}

impl TxEngine {
    pub fn new(timing: BitTiming, parity: ParityMode) -> Self {
        Self {
            timing,
            parity,
            bits: Vec::new(),
            index: 0,
            countdown: 0,
        }
    }

    /// True when no frame is draining and the line sits at idle.
    pub fn is_idle(&self) -> bool {
        self.index >= self.bits.len()
    }

    /// Advance one clock tick and return the level to drive.
    pub fn tick(&mut self) -> Level {
        if self.is_idle() {
            return Level::High;
        }
        let level = Level::from_bit(self.bits[self.index]);
        self.countdown -= 1;
        if self.countdown == 0 {
            self.index += 1;
            self.countdown = self.timing.cycles_per_bit();
        }
        level
    }
}

impl RawFrameTx for TxEngine {
    fn try_submit(&mut self, raw: u16) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.bits = wire_bits(raw, self.parity);
        self.index = 0;
        self.countdown = self.timing.cycles_per_bit();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPB: u32 = 8;

    fn engine() -> TxEngine {
        TxEngine::new(BitTiming::new(CPB * 1000, 1000).unwrap(), ParityMode::Odd)
    }

    // One full frame at 8 ticks per bit
    fn drain(tx: &mut TxEngine) -> Vec<Level, 96> {
        let mut levels = Vec::new();
        while !tx.is_idle() {
            levels.push(tx.tick()).unwrap();
        }
        levels
    }

    #[test]
    fn test_idle_line_is_high() {
        let mut tx = engine();
        for _ in 0..32 {
            assert_eq!(tx.tick(), Level::High);
        }
    }

    #[test]
    fn test_frame_timing() {
        let mut tx = engine();
        assert!(tx.try_submit(0x155));
        let levels = drain(&mut tx);

        // 12 bit periods, each held for one full bit
        assert_eq!(levels.len(), (MAX_WIRE_BITS as u32 * CPB) as usize);
        // Start bit low for a whole period
        assert!(levels[..CPB as usize].iter().all(|l| l.is_low()));
        // Stop bit high for a whole period
        assert!(levels[levels.len() - CPB as usize..]
            .iter()
            .all(|l| l.is_high()));
        // D0 (bit 0 of the raw word, set) right after the start bit
        assert!(levels[CPB as usize].is_high());
    }

    #[test]
    fn test_refuses_second_frame_while_shifting() {
        let mut tx = engine();
        assert!(tx.try_submit(0x0AA));
        tx.tick();
        assert!(!tx.try_submit(0x055), "busy transmitter must refuse");
        drain(&mut tx);
        assert!(tx.try_submit(0x055), "drained transmitter must accept");
    }
}
