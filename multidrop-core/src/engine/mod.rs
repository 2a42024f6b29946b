//! Software bit engines.
//!
//! The reference design runs transmit and receive as two physically
//! parallel, instruction-limited PIO sequencers. Here each direction
//! is a deterministic, cycle-ticked state machine: the caller advances
//! it one clock tick at a time and wires the TX output level into the
//! RX input. No mutable state crosses the TX/RX boundary; the engines
//! share only their (read-mostly) timing and parity configuration.

pub mod rx;
pub mod tx;

pub use rx::RxEngine;
pub use tx::TxEngine;

/// A line level. The bus idles high; a start bit pulls it low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Level::High
    }

    pub fn is_low(self) -> bool {
        self == Level::Low
    }

    /// Map a wire bit (`true` = high) to a level.
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Level::High
        } else {
            Level::Low
        }
    }
}
