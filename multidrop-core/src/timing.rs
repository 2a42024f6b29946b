//! Bit-timing engine.
//!
//! Both state machines hold or sample the line for a fixed number of
//! clock ticks per bit: `cycles_per_bit = clock_hz / baud`. The value
//! is computed once per configuration change, never per frame. Each
//! protocol instance owns its own timing, so independent instances can
//! run at different rates off the same system clock; nothing here is
//! shared mutable state.
//!
//! No drift correction or 16x oversampling is applied: each bit is
//! sampled once at its centre, matching the PIO reference design.
//! Changing the timing while frames are in flight is a precondition
//! violation, not something the engines detect.

/// RP2040 default system clock
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Reference bit rate of the motivating MDB-style bus
pub const DEFAULT_BAUD: u32 = 250_000;

/// Errors constructing a bit timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Baud rate of zero
    ZeroBaud,
    /// Baud rate faster than the driving clock
    BaudExceedsClock,
}

/// Per-instance bit period, in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitTiming {
    cycles_per_bit: u32,
}

impl BitTiming {
    /// Derive the bit period from a clock frequency and baud rate.
    ///
    /// Integer truncation, as in the reference `clock / baud`
    /// computation; the fractional remainder is not compensated.
    pub fn new(clock_hz: u32, baud: u32) -> Result<Self, TimingError> {
        if baud == 0 {
            return Err(TimingError::ZeroBaud);
        }
        let cycles_per_bit = clock_hz / baud;
        if cycles_per_bit == 0 {
            return Err(TimingError::BaudExceedsClock);
        }
        Ok(Self { cycles_per_bit })
    }

    /// Ticks each bit is held or, on receive, between samples
    pub fn cycles_per_bit(&self) -> u32 {
        self.cycles_per_bit
    }

    /// Half a bit period, used to land samples at bit centres
    pub fn half_bit(&self) -> u32 {
        self.cycles_per_bit / 2
    }

    /// Ticks from the start-bit falling edge to the centre of D0
    pub fn start_to_first_sample(&self) -> u32 {
        self.cycles_per_bit + self.half_bit()
    }
}

impl Default for BitTiming {
    fn default() -> Self {
        Self {
            cycles_per_bit: SYS_CLK_HZ / DEFAULT_BAUD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_timing() {
        // 125 MHz / 250 kbit/s = 500 ticks per bit
        let timing = BitTiming::new(SYS_CLK_HZ, DEFAULT_BAUD).unwrap();
        assert_eq!(timing.cycles_per_bit(), 500);
        assert_eq!(timing.half_bit(), 250);
        assert_eq!(timing.start_to_first_sample(), 750);
        assert_eq!(timing, BitTiming::default());
    }

    #[test]
    fn test_rejects_zero_baud() {
        assert_eq!(BitTiming::new(SYS_CLK_HZ, 0), Err(TimingError::ZeroBaud));
    }

    #[test]
    fn test_rejects_baud_above_clock() {
        assert_eq!(
            BitTiming::new(1_000, 2_000),
            Err(TimingError::BaudExceedsClock)
        );
    }

    #[test]
    fn test_truncating_division() {
        // 100 kHz clock at 9600 baud: 10.41... truncates to 10
        let timing = BitTiming::new(100_000, 9600).unwrap();
        assert_eq!(timing.cycles_per_bit(), 10);
    }
}
