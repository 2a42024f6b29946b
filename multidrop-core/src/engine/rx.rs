//! Receive engine: start-edge detection, centre sampling, framing
//! error recovery.

use multidrop_protocol::ParityMode;

use crate::engine::Level;
use crate::timing::BitTiming;
use crate::traits::RawFrameRx;

/// Receiver states. The sequencer never branches beyond these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum RxState {
    /// Watching the idle (high) line for the start-bit falling edge
    Idle,
    /// Collecting the shift bits, one sample per bit centre
    Sampling,
    /// Verifying the stop position is high
    StopCheck,
    /// After a framing error or break: discard everything until the
    /// line returns to idle, so the next real start bit is not
    /// mis-framed
    WaitIdle,
}

/// Cycle-ticked receiver with a single-slot frame buffer.
///
/// Feed it the observed line level once per clock tick. On a falling
/// edge it schedules the first sample for the centre of D0 (1.5 bit
/// periods later), samples every following bit at its centre, then
/// checks the stop position. A good frame lands in the slot,
/// overwriting any frame the host has not drained yet; a bad stop bit
/// raises the sticky framing flag, delivers nothing, and the engine
/// waits for idle before rescanning.
#[derive(Debug, Clone)]
pub struct RxEngine {
    timing: BitTiming,
    shift_bits: u8,
    state: RxState,
    countdown: u32,
    shifter: u16,
    collected: u8,
    slot: Option<u16>,
    framing_error: bool,
}

impl RxEngine {
    pub fn new(timing: BitTiming, parity: ParityMode) -> Self {
        Self {
            timing,
            shift_bits: parity.shift_bits() as u8,
            state: RxState::Idle,
            countdown: 0,
            shifter: 0,
            collected: 0,
            slot: None,
            framing_error: false,
        }
    }

    /// Advance one clock tick with the currently observed line level.
    pub fn tick(&mut self, line: Level) {
        match self.state {
            RxState::Idle => {
                if line.is_low() {
                    self.state = RxState::Sampling;
                    self.countdown = self.timing.start_to_first_sample();
                    self.shifter = 0;
                    self.collected = 0;
                }
            }
            RxState::Sampling => {
                self.countdown -= 1;
                if self.countdown == 0 {
                    if line.is_high() {
                        self.shifter |= 1 << self.collected;
                    }
                    self.collected += 1;
                    self.countdown = self.timing.cycles_per_bit();
                    if self.collected == self.shift_bits {
                        self.state = RxState::StopCheck;
                    }
                }
            }
            RxState::StopCheck => {
                self.countdown -= 1;
                if self.countdown == 0 {
                    if line.is_high() {
                        // Single-slot handoff: a frame the host never
                        // drained is overwritten here
                        self.slot = Some(self.shifter);
                        self.state = RxState::Idle;
                    } else {
                        self.framing_error = true;
                        self.state = RxState::WaitIdle;
                    }
                }
            }
            RxState::WaitIdle => {
                if line.is_high() {
                    self.state = RxState::Idle;
                }
            }
        }
    }
}

impl RawFrameRx for RxEngine {
    fn poll_frame(&mut self) -> Option<u16> {
        self.slot.take()
    }

    fn take_framing_error(&mut self) -> bool {
        core::mem::replace(&mut self.framing_error, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multidrop_protocol::{encode, wire_bits, PayloadWord};

    const CPB: u32 = 8;

    fn engine() -> RxEngine {
        RxEngine::new(BitTiming::new(CPB * 1000, 1000).unwrap(), ParityMode::Odd)
    }

    fn idle(rx: &mut RxEngine, bits: u32) {
        for _ in 0..bits * CPB {
            rx.tick(Level::High);
        }
    }

    fn feed(rx: &mut RxEngine, bits: &[bool]) {
        for &bit in bits {
            for _ in 0..CPB {
                rx.tick(Level::from_bit(bit));
            }
        }
    }

    fn raw(is_address: bool, data: u8) -> u16 {
        encode(PayloadWord { is_address, data }, ParityMode::Odd)
    }

    #[test]
    fn test_delivers_well_formed_frame() {
        let mut rx = engine();
        let word = raw(true, 0x05);

        idle(&mut rx, 2);
        feed(&mut rx, &wire_bits(word, ParityMode::Odd));
        idle(&mut rx, 1);

        assert_eq!(rx.poll_frame(), Some(word));
        assert!(!rx.take_framing_error());
        assert_eq!(rx.poll_frame(), None, "slot drains on poll");
    }

    #[test]
    fn test_low_stop_bit_raises_framing_error() {
        let mut rx = engine();
        let mut bits = wire_bits(raw(false, 0x2A), ParityMode::Odd);
        let stop = bits.len() - 1;
        bits[stop] = false;

        idle(&mut rx, 1);
        feed(&mut rx, &bits);
        idle(&mut rx, 1);

        assert_eq!(rx.poll_frame(), None, "no partial data on framing error");
        assert!(rx.take_framing_error());
        assert!(!rx.take_framing_error(), "flag clears once taken");
    }

    #[test]
    fn test_resynchronizes_after_framing_error() {
        let mut rx = engine();
        let mut bad = wire_bits(raw(false, 0x11), ParityMode::Odd);
        let stop = bad.len() - 1;
        bad[stop] = false;
        let good = raw(false, 0x22);

        idle(&mut rx, 1);
        feed(&mut rx, &bad);
        idle(&mut rx, 1);
        feed(&mut rx, &wire_bits(good, ParityMode::Odd));
        idle(&mut rx, 1);

        assert!(rx.take_framing_error());
        assert_eq!(rx.poll_frame(), Some(good));
    }

    #[test]
    fn test_break_condition_waits_for_idle() {
        let mut rx = engine();

        idle(&mut rx, 1);
        // Line held low for three full frame times
        for _ in 0..3 * 12 * CPB {
            rx.tick(Level::Low);
        }
        assert!(rx.take_framing_error());
        assert_eq!(rx.poll_frame(), None);

        // Return to idle, then a normal frame decodes
        idle(&mut rx, 2);
        let word = raw(true, 0x40);
        feed(&mut rx, &wire_bits(word, ParityMode::Odd));
        idle(&mut rx, 1);
        assert_eq!(rx.poll_frame(), Some(word));
    }

    #[test]
    fn test_starved_host_keeps_latest_frame() {
        let mut rx = engine();
        let first = raw(false, 0x01);
        let second = raw(false, 0x02);

        idle(&mut rx, 1);
        feed(&mut rx, &wire_bits(first, ParityMode::Odd));
        idle(&mut rx, 1);
        feed(&mut rx, &wire_bits(second, ParityMode::Odd));
        idle(&mut rx, 1);

        // Accepted data-loss mode: the slot holds only the newest frame
        assert_eq!(rx.poll_frame(), Some(second));
        assert_eq!(rx.poll_frame(), None);
    }

    #[test]
    fn test_parity_none_shifts_nine_bits() {
        let mut rx = RxEngine::new(
            BitTiming::new(CPB * 1000, 1000).unwrap(),
            ParityMode::None,
        );
        let word = encode(
            PayloadWord {
                is_address: true,
                data: 0x05,
            },
            ParityMode::None,
        );

        idle(&mut rx, 1);
        feed(&mut rx, &wire_bits(word, ParityMode::None));
        idle(&mut rx, 1);

        assert_eq!(rx.poll_frame(), Some(word));
    }
}
